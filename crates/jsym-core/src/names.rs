//! Helpers for comparing Java names that may or may not be qualified.

/// Returns the last `.`-separated segment of `name`.
#[must_use]
pub fn simple_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Returns everything before the last `.` of `name`, or `""` for a simple name.
#[must_use]
pub fn package_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => "",
    }
}

/// Name-match rule used for annotation and declaration lookups.
///
/// An exact match always wins. When only one side is qualified the simple
/// names are compared; two qualified names that differ never match.
#[must_use]
pub fn is_match(test: &str, target: &str) -> bool {
    if test == target {
        return true;
    }
    if test.contains('.') && target.contains('.') {
        return false;
    }
    simple_name(test) == simple_name(target)
}

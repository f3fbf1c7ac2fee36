use std::path::PathBuf;

use jsym_config::{ConfigError, ErrorPolicy, LoggingConfig, ResolverConfig, SolverEntry};
use pretty_assertions::assert_eq;

#[test]
fn empty_config_uses_defaults() {
    let config = ResolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, ResolverConfig::default());
    assert_eq!(config.solver.cache_size_limit, 1024);
    assert_eq!(config.solver.error_policy, ErrorPolicy::Propagate);
    assert!(config.solver.entries.is_empty());
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn parses_solver_entries_in_order() {
    let config = ResolverConfig::from_toml_str(
        r#"
[solver]
cache_size_limit = 0
error_policy = "skip-failing"

[[solver.entries]]
kind = "reflection"
jre_only = true

[[solver.entries]]
kind = "source-archive"
path = "/deps/lib-sources.jar"

[[solver.entries]]
kind = "class-archive"
path = "/deps/lib.jar"

[[solver.entries]]
kind = "memory"

[logging]
level = "debug"
json = true
"#,
    )
    .unwrap();

    assert_eq!(config.solver.cache_size_limit, 0);
    assert_eq!(config.solver.error_policy, ErrorPolicy::SkipFailing);
    assert_eq!(
        config.solver.entries,
        vec![
            SolverEntry::Reflection { jre_only: true },
            SolverEntry::SourceArchive {
                path: PathBuf::from("/deps/lib-sources.jar")
            },
            SolverEntry::ClassArchive {
                path: PathBuf::from("/deps/lib.jar")
            },
            SolverEntry::Memory,
        ]
    );
    assert!(config.logging.json);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn relative_paths_resolve_against_the_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jsym.toml");
    std::fs::write(
        &path,
        r#"
[[solver.entries]]
kind = "source-dir"
path = "src/main/java"

[[solver.entries]]
kind = "class-archive"
path = "/abs/lib.jar"
"#,
    )
    .unwrap();

    let config = ResolverConfig::load_from_path(&path).unwrap();

    assert_eq!(
        config.solver.entries[0].path(),
        Some(dir.path().join("src/main/java").as_path())
    );
    assert_eq!(
        config.solver.entries[1].path(),
        Some(PathBuf::from("/abs/lib.jar").as_path())
    );
}

#[test]
fn reports_unknown_keys_and_missing_files() {
    let err = ResolverConfig::from_toml_str("[solver]\ncache_limit = 3\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");

    let err = ResolverConfig::from_toml_str("[[solver.entries]]\nkind = \"bogus\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err}");

    let dir = tempfile::tempdir().unwrap();
    let err = ResolverConfig::load_from_path(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err}");
}

#[test]
fn init_tracing_twice_is_harmless() {
    let config = LoggingConfig {
        level: "warn".to_owned(),
        json: false,
    };
    jsym_config::init_tracing(&config);
    jsym_config::init_tracing(&config);
    tracing::warn!(target = "jsym.config", "still logging");
}

//! Documentation comment model: description text with inline tags, followed
//! by block tags.

use std::fmt;

use crate::error::JavadocError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Javadoc {
    pub description: Description,
    pub block_tags: Vec<BlockTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Description {
    pub elements: Vec<DescriptionElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionElement {
    Text(String),
    Inline(InlineTag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineTagKind {
    Code,
    DocRoot,
    InheritDoc,
    Link,
    LinkPlain,
    Literal,
    Value,
    SystemProperty,
    Unknown,
}

impl InlineTagKind {
    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "code" => InlineTagKind::Code,
            "docroot" => InlineTagKind::DocRoot,
            "inheritdoc" => InlineTagKind::InheritDoc,
            "link" => InlineTagKind::Link,
            "linkplain" => InlineTagKind::LinkPlain,
            "literal" => InlineTagKind::Literal,
            "value" => InlineTagKind::Value,
            "systemproperty" => InlineTagKind::SystemProperty,
            _ => InlineTagKind::Unknown,
        }
    }

    #[must_use]
    pub fn has_content(self) -> bool {
        matches!(
            self,
            InlineTagKind::Code
                | InlineTagKind::Link
                | InlineTagKind::LinkPlain
                | InlineTagKind::Literal
                | InlineTagKind::Value
        )
    }

    #[must_use]
    pub fn has_label(self) -> bool {
        matches!(self, InlineTagKind::Link | InlineTagKind::LinkPlain)
    }
}

/// `{@name content}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTag {
    pub kind: InlineTagKind,
    pub name: String,
    pub content: String,
}

impl InlineTag {
    /// Parse a complete inline tag such as `{@link List#add label}`.
    pub fn from_text(text: &str) -> Result<Self, JavadocError> {
        let inner = text
            .strip_prefix("{@")
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| JavadocError::MalformedInlineTag(text.to_string()))?;
        let (name, content) = match inner.find(char::is_whitespace) {
            Some(idx) => (&inner[..idx], inner[idx..].trim_start()),
            None => (inner, ""),
        };
        Ok(Self {
            kind: InlineTagKind::from_name(name),
            name: name.to_string(),
            content: content.to_string(),
        })
    }
}

impl fmt::Display for InlineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.content.is_empty() {
            write!(f, "{{@{}}}", self.name)
        } else {
            write!(f, "{{@{} {}}}", self.name, self.content)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockTagKind {
    Author,
    Deprecated,
    Exception,
    Param,
    Return,
    See,
    Serial,
    SerialData,
    SerialField,
    Since,
    Throws,
    Version,
    Unknown(String),
}

impl BlockTagKind {
    fn from_name(name: &str) -> Self {
        match name {
            "author" => BlockTagKind::Author,
            "deprecated" => BlockTagKind::Deprecated,
            "exception" => BlockTagKind::Exception,
            "param" => BlockTagKind::Param,
            "return" => BlockTagKind::Return,
            "see" => BlockTagKind::See,
            "serial" => BlockTagKind::Serial,
            "serialData" => BlockTagKind::SerialData,
            "serialField" => BlockTagKind::SerialField,
            "since" => BlockTagKind::Since,
            "throws" => BlockTagKind::Throws,
            "version" => BlockTagKind::Version,
            other => BlockTagKind::Unknown(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        match self {
            BlockTagKind::Author => "author",
            BlockTagKind::Deprecated => "deprecated",
            BlockTagKind::Exception => "exception",
            BlockTagKind::Param => "param",
            BlockTagKind::Return => "return",
            BlockTagKind::See => "see",
            BlockTagKind::Serial => "serial",
            BlockTagKind::SerialData => "serialData",
            BlockTagKind::SerialField => "serialField",
            BlockTagKind::Since => "since",
            BlockTagKind::Throws => "throws",
            BlockTagKind::Version => "version",
            BlockTagKind::Unknown(name) => name,
        }
    }

    fn takes_name(&self) -> bool {
        matches!(
            self,
            BlockTagKind::Param | BlockTagKind::Throws | BlockTagKind::Exception
        )
    }
}

/// `@tag [name] content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTag {
    pub kind: BlockTagKind,
    /// Parameter or exception name for `@param`, `@throws` and `@exception`.
    pub name: Option<String>,
    pub content: Description,
}

impl BlockTag {
    pub fn new(kind: BlockTagKind, name: Option<&str>, content: &str) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
            content: Description::parse(content),
        }
    }
}

impl Description {
    /// Split text into plain runs and `{@...}` inline tags. Unbalanced
    /// braces are kept as text.
    pub fn parse(text: &str) -> Self {
        let mut elements = Vec::new();
        let mut rest = text;
        while let Some(start) = rest.find("{@") {
            let Some(len) = inline_tag_len(&rest[start..]) else {
                break;
            };
            if start > 0 {
                elements.push(DescriptionElement::Text(rest[..start].to_string()));
            }
            match InlineTag::from_text(&rest[start..start + len]) {
                Ok(tag) => elements.push(DescriptionElement::Inline(tag)),
                Err(_) => elements.push(DescriptionElement::Text(
                    rest[start..start + len].to_string(),
                )),
            }
            rest = &rest[start + len..];
        }
        if !rest.is_empty() {
            elements.push(DescriptionElement::Text(rest.to_string()));
        }
        Self { elements }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            match element {
                DescriptionElement::Text(text) => f.write_str(text)?,
                DescriptionElement::Inline(tag) => write!(f, "{tag}")?,
            }
        }
        Ok(())
    }
}

/// Length of the brace-balanced tag at the start of `text`.
fn inline_tag_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

impl Javadoc {
    pub fn new(description: &str) -> Self {
        Self {
            description: Description::parse(description),
            block_tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: BlockTag) -> Self {
        self.block_tags.push(tag);
        self
    }

    /// Parse the text of a doc comment, with or without the `/**`/`*/`
    /// delimiters and leading `*` gutters.
    pub fn parse(comment: &str) -> Self {
        let body = comment.trim();
        let body = body.strip_prefix("/**").unwrap_or(body);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let lines: Vec<&str> = body
            .lines()
            .map(|line| {
                let line = line.trim_start();
                match line.strip_prefix('*') {
                    Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                    None => line,
                }
            })
            .collect();

        let mut description = Vec::new();
        let mut tags: Vec<(String, Vec<&str>)> = Vec::new();
        for line in lines {
            let trimmed = line.trim_start();
            if let Some(tag) = trimmed.strip_prefix('@') {
                let name_len = tag.find(char::is_whitespace).unwrap_or(tag.len());
                tags.push((tag[..name_len].to_string(), vec![tag[name_len..].trim_start()]));
            } else if let Some((_, body)) = tags.last_mut() {
                body.push(line);
            } else {
                description.push(line);
            }
        }

        let block_tags = tags
            .into_iter()
            .map(|(name, body)| {
                let kind = BlockTagKind::from_name(&name);
                let text = body.join("\n").trim().to_string();
                if kind.takes_name() {
                    let (tag_name, rest) = match text.find(char::is_whitespace) {
                        Some(idx) => (&text[..idx], text[idx..].trim_start()),
                        None => (text.as_str(), ""),
                    };
                    BlockTag::new(kind, Some(tag_name), rest)
                } else {
                    BlockTag::new(kind, None, &text)
                }
            })
            .collect();

        Self {
            description: Description::parse(description.join("\n").trim()),
            block_tags,
        }
    }

    /// Render as a doc comment. Lines after the first are prefixed with
    /// `indent`; the first line is not, so the result can be spliced in at an
    /// already-indented position.
    pub fn to_comment(&self, indent: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        let description = self.description.to_string();
        if !description.is_empty() {
            lines.extend(description.lines().map(str::to_string));
        }
        if !self.block_tags.is_empty() && !lines.is_empty() {
            lines.push(String::new());
        }
        for tag in &self.block_tags {
            let mut line = format!("@{}", tag.kind.name());
            if let Some(name) = &tag.name {
                line.push(' ');
                line.push_str(name);
            }
            let content = tag.content.to_string();
            let mut content_lines = content.lines();
            if let Some(first) = content_lines.next() {
                line.push(' ');
                line.push_str(first);
            }
            lines.push(line);
            lines.extend(content_lines.map(str::to_string));
        }

        let mut out = String::from("/**\n");
        for line in lines {
            out.push_str(indent);
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                out.push_str(" * ");
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str(indent);
        out.push_str(" */");
        out
    }
}

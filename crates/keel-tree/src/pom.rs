//! Build-descriptor tree backed by the original POM text.
//!
//! Mutations are span replacements computed from the parsed element ranges
//! and applied straight back to the source string, so everything outside an
//! edited slot survives byte for byte, comments and indentation included.
//! Re-serializing is just handing the text back.

use std::ops::Range;

use crate::{joined, PropertyTree, TreeError};

pub struct PomDocument {
    text: String,
}

impl PomDocument {
    /// Parses `text` as XML, failing on malformed input. The text is kept as
    /// the single source of truth; every mutation re-locates its target span
    /// in the current text.
    pub fn parse(text: impl Into<String>) -> Result<Self, TreeError> {
        let text = text.into();
        roxmltree::Document::parse(&text)?;
        Ok(Self { text })
    }

    /// The descriptor text with all mutations applied.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl PropertyTree for PomDocument {
    fn get(&self, path: &[&str]) -> Option<String> {
        let doc = roxmltree::Document::parse(&self.text).ok()?;
        let node = locate(&doc, path)?;
        node.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    fn set(&mut self, path: &[&str], value: &str) -> Result<(), TreeError> {
        let (range, replacement) = {
            let doc = roxmltree::Document::parse(&self.text)?;
            let node = locate(&doc, path).ok_or_else(|| TreeError::MissingElement {
                path: joined(path),
            })?;

            if node.children().any(|child| child.is_element()) {
                return Err(TreeError::NotScalar {
                    path: joined(path),
                });
            }

            match (node.first_child(), node.last_child()) {
                (Some(first), Some(last)) => {
                    (first.range().start..last.range().end, escape_text(value))
                }
                // `<name/>` or `<name></name>`: rebuild the whole element.
                _ => {
                    let tag = node.tag_name().name().to_string();
                    (
                        node.range(),
                        format!("<{tag}>{}</{tag}>", escape_text(value)),
                    )
                }
            }
        };

        self.text.replace_range(range, &replacement);
        Ok(())
    }

    fn remove(&mut self, path: &[&str]) -> Result<bool, TreeError> {
        let range = {
            let doc = roxmltree::Document::parse(&self.text)?;
            locate(&doc, path).map(|node| expand_to_owned_lines(&self.text, node.range()))
        };

        match range {
            Some(range) => {
                self.text.replace_range(range, "");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn locate<'a, 'i>(
    doc: &'a roxmltree::Document<'i>,
    path: &[&str],
) -> Option<roxmltree::Node<'a, 'i>> {
    let mut node = doc.root_element();
    for key in path {
        node = child_element(&node, key)?;
    }
    Some(node)
}

fn child_element<'a, 'i>(
    node: &roxmltree::Node<'a, 'i>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Widens a deletion to cover the element's surrounding indentation and
/// trailing newline, but only when the element owns its line on both sides;
/// inline siblings stay untouched.
fn expand_to_owned_lines(text: &str, range: Range<usize>) -> Range<usize> {
    let line_start = text[..range.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let indent_only = text[line_start..range.start]
        .chars()
        .all(|c| c == ' ' || c == '\t');

    let rest = &text[range.end..];
    let newline_len = if rest.starts_with("\r\n") {
        Some(2)
    } else if rest.starts_with('\n') {
        Some(1)
    } else {
        None
    };

    match (indent_only, newline_len) {
        (true, Some(len)) => line_start..range.end + len,
        _ => range,
    }
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

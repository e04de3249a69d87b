//! Plain-text views of menu attributes.
//!
//! Two layouts are supported. The block layout puts the key on its own line
//! and each value on a tab-indented line below it, with a blank line between
//! attribute lines:
//!
//! ```text
//! priority
//! 	10
//!
//! tag
//! 	x
//! 	y
//! ```
//!
//! The inline layout is one attribute line per text line:
//!
//! ```text
//! priority: 10
//! tag: x, y
//! ```
//!
//! Parsing either layout trims whitespace around keys and values, so values
//! with meaningful leading or trailing whitespace do not survive. The inline
//! layout also cannot hold a comma inside a value. Empty values do not survive
//! the block layout, and neither does a line whose key is empty: its key line
//! reads back as blank and its values are dropped.
//!
//! [`to_document`] and [`from_document`] wrap the inline layout with the
//! scalar fields of a whole [`MenuRecord`].

use crate::error::{Error, Result};
use crate::menu::{Attrs, MenuRecord};

const LABEL_VERSION: &str = "Version";
const LABEL_TEXT_PATH: &str = "Text Path";
const LABEL_NAME: &str = "Name";
const LABEL_CATEGORY: &str = "Category";
const LABEL_DESCRIPTION: &str = "Description";
const LABEL_ATTRIBUTES: &str = "Attributes:";

pub fn to_block(attrs: &Attrs) -> String {
    attrs
        .iter_lines()
        .map(|(key, values)| {
            let mut block = key.to_string();
            for value in values {
                block.push_str("\n\t");
                block.push_str(value);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn from_block(text: &str) -> Attrs {
    let mut attrs = Attrs::new();
    let mut pending: Option<(String, Vec<String>)> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            if let Some((key, values)) = pending.take() {
                attrs.push_line(key, values);
            }
        } else if line.starts_with('\t') {
            // A value with no key above it has nowhere to go.
            if let Some((_, values)) = pending.as_mut() {
                values.push(line.trim().to_string());
            }
        } else {
            if let Some((key, values)) = pending.take() {
                attrs.push_line(key, values);
            }
            pending = Some((line.trim().to_string(), Vec::new()));
        }
    }

    if let Some((key, values)) = pending {
        attrs.push_line(key, values);
    }

    attrs
}

fn inline_line(key: &str, values: &[String]) -> String {
    format!("{}: {}", key, values.join(", "))
}

pub fn to_inline(attrs: &Attrs) -> String {
    attrs
        .iter_lines()
        .map(|(key, values)| inline_line(key, values))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines without a colon are skipped.
pub fn from_inline(text: &str) -> Attrs {
    let mut attrs = Attrs::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let (key, rest) = match line.split_once(':') {
            Some(parts) => parts,
            None => {
                tracing::debug!(line, "skipping inline attribute line without a colon");
                continue;
            }
        };

        let rest = rest.trim();
        let values = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(|v| v.trim().to_string()).collect()
        };
        attrs.push_line(key.trim(), values);
    }

    attrs
}

/// Renders the whole record: labelled scalar fields, then the inline attribute lines.
pub fn to_document(menu: &MenuRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", LABEL_VERSION, menu.version));
    out.push_str(&format!("{}: {}\n", LABEL_TEXT_PATH, menu.text_path));
    out.push_str(&format!("{}: {}\n", LABEL_NAME, menu.name));
    out.push_str(&format!("{}: {}\n", LABEL_CATEGORY, menu.category));
    out.push_str(&format!("{}: {}\n", LABEL_DESCRIPTION, menu.description));
    out.push_str(LABEL_ATTRIBUTES);
    out.push('\n');
    for (key, values) in menu.attrs.iter_lines() {
        out.push_str("  ");
        out.push_str(&inline_line(key, values));
        out.push('\n');
    }
    out
}

pub fn from_document(text: &str) -> Result<MenuRecord> {
    let mut lines = text.lines().enumerate();

    let mut field = |label: &'static str| -> Result<String> {
        let (index, line) = lines.next().ok_or_else(|| Error::MalformedText {
            line: 0,
            reason: format!("missing '{}' line", label),
        })?;

        line.strip_prefix(label)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|rest| rest.strip_prefix(' ').unwrap_or(rest).to_string())
            .ok_or_else(|| Error::MalformedText {
                line: index + 1,
                reason: format!("expected '{}: ...'", label),
            })
    };

    let version_text = field(LABEL_VERSION)?;
    let version = version_text
        .trim()
        .parse::<i32>()
        .map_err(|e| Error::MalformedText {
            line: 1,
            reason: format!("invalid version '{}': {}", version_text, e),
        })?;
    let text_path = field(LABEL_TEXT_PATH)?;
    let name = field(LABEL_NAME)?;
    let category = field(LABEL_CATEGORY)?;
    let description = field(LABEL_DESCRIPTION)?;

    match lines.next() {
        Some((_, line)) if line.trim() == LABEL_ATTRIBUTES => {}
        Some((index, _)) => {
            return Err(Error::MalformedText {
                line: index + 1,
                reason: format!("expected '{}'", LABEL_ATTRIBUTES),
            })
        }
        None => {
            return Err(Error::MalformedText {
                line: 0,
                reason: format!("missing '{}' line", LABEL_ATTRIBUTES),
            })
        }
    }

    let rest = lines.map(|(_, line)| line).collect::<Vec<_>>().join("\n");

    Ok(MenuRecord {
        version,
        text_path,
        name,
        category,
        description,
        attrs: from_inline(&rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> Attrs {
        let mut attrs = Attrs::new();
        attrs.push_line("a", line(&["1", "2"]));
        attrs.push_line("b", vec![]);
        attrs
    }

    #[test]
    fn inline_render_and_parse() {
        let text = to_inline(&sample());
        assert_eq!(text, "a: 1, 2\nb: ");
        assert_eq!(from_inline(&text), sample());
    }

    #[test]
    fn inline_parse_is_lenient() {
        let attrs = from_inline("  a :1 ,  2  \n\nno colon here\nc: x: y\n");
        assert_eq!(attrs.lines("a").unwrap(), &[line(&["1", "2"])]);
        assert_eq!(attrs.lines("c").unwrap(), &[line(&["x: y"])]);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn inline_commas_split_values() {
        let mut attrs = Attrs::new();
        attrs.push_line("k", line(&["a,b"]));
        let parsed = from_inline(&to_inline(&attrs));
        assert_eq!(parsed.lines("k").unwrap(), &[line(&["a", "b"])]);
    }

    #[test]
    fn block_render_and_parse() {
        let mut attrs = sample();
        attrs.push_line("a", line(&["3"]));

        let text = to_block(&attrs);
        assert_eq!(text, "a\n\t1\n\t2\n\na\n\t3\n\nb");
        assert_eq!(from_block(&text), attrs);
    }

    #[test]
    fn block_new_key_commits_pending_one() {
        let attrs = from_block("a\n\t1\nb\n\t2\n\t3\n\n\n");
        assert_eq!(attrs.lines("a").unwrap(), &[line(&["1"])]);
        assert_eq!(attrs.lines("b").unwrap(), &[line(&["2", "3"])]);
    }

    #[test]
    fn block_orphan_values_are_dropped() {
        let attrs = from_block("\torphan\n\nkey\n\t value \r\n");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.lines("key").unwrap(), &[line(&["value"])]);
    }

    #[test]
    fn block_drops_line_with_empty_key() {
        let mut attrs = Attrs::new();
        attrs.push_line("", line(&["v"]));
        attrs.push_line("k", line(&["w"]));

        let text = to_block(&attrs);
        assert_eq!(text, "\n\tv\n\nk\n\tw");

        let parsed = from_block(&text);
        assert_eq!(parsed.len(), 1);
        assert!(!parsed.contains_key(""));
        assert_eq!(parsed.lines("k").unwrap(), &[line(&["w"])]);
    }

    #[test]
    fn empty_inputs() {
        assert!(from_block("").is_empty());
        assert!(from_inline("\n \n").is_empty());
        assert_eq!(to_block(&Attrs::new()), "");
        assert_eq!(to_inline(&Attrs::new()), "");
    }

    #[test]
    fn document_round_trip() {
        let menu = MenuRecord {
            version: 1000,
            text_path: "tex/a.png".into(),
            name: "Item".into(),
            category: "cat".into(),
            description: "two words".into(),
            attrs: sample(),
        };

        let text = to_document(&menu);
        assert!(text.starts_with("Version: 1000\nText Path: tex/a.png\n"));
        assert!(text.contains("Attributes:\n  a: 1, 2\n  b: \n"));
        assert_eq!(from_document(&text).unwrap(), menu);
    }

    #[test]
    fn document_allows_empty_scalars() {
        let menu = MenuRecord::default();
        let text = to_document(&menu).replace(": \n", ":\n");
        assert_eq!(from_document(&text).unwrap(), menu);
    }

    #[test]
    fn document_errors() {
        match from_document("Version: x\n") {
            Err(Error::MalformedText { line: 1, .. }) => {}
            other => panic!("expected bad version, got {:?}", other),
        }

        match from_document("Version: 1\nName: n\n") {
            Err(Error::MalformedText { line: 2, .. }) => {}
            other => panic!("expected wrong label, got {:?}", other),
        }

        let no_attrs = "Version: 1\nText Path: \nName: \nCategory: \nDescription: \n";
        match from_document(no_attrs) {
            Err(Error::MalformedText { line: 0, .. }) => {}
            other => panic!("expected missing attributes, got {:?}", other),
        }
    }
}

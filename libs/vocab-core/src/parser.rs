//! Parser for raw vocabulary entry syntax.
//!
//! # Format
//! ```text
//! niño/niña | chico/chica (informal)
//! ```
//! Alternative meanings are separated by `|`, grammatical gender variants
//! within a meaning by `/`, and a free-text annotation is given in
//! parentheses.

use regex::Regex;
use std::sync::OnceLock;

/// A parsed vocabulary entry side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWord {
    /// Alternative meanings, each a list of gender variants that belong
    /// together. Order follows the written entry.
    pub meanings: Vec<Vec<String>>,
    /// Content of the first parenthesized group, trimmed.
    pub annotation: Option<String>,
}

impl ParsedWord {
    /// Render the entry the way it is shown to the learner: meanings joined
    /// by `, `, variants joined by `/`.
    pub fn display(&self) -> String {
        self.meanings
            .iter()
            .map(|variants| variants.join("/"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn annotation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]*)\)").expect("annotation pattern"))
}

/// Parse a raw entry into meanings, gender variants and annotation.
///
/// Never fails: malformed input degrades to best effort. The result always
/// contains at least one meaning list, which may be empty for degenerate
/// input such as a blank string.
pub fn parse(raw: &str) -> ParsedWord {
    let annotation = annotation_re()
        .captures(raw)
        .map(|caps| caps[1].trim().to_string());
    let working = annotation_re().replace_all(raw, "");

    let mut meanings: Vec<Vec<String>> = working
        .split('|')
        .map(|meaning| {
            meaning
                .split('/')
                .map(str::trim)
                .filter(|variant| !variant.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|variants: &Vec<String>| !variants.is_empty())
        .collect();

    if meanings.is_empty() {
        meanings.push(Vec::new());
    }

    ParsedWord {
        meanings,
        annotation,
    }
}

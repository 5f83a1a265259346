//! Reference placeholder scan

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// `@ref:<name>` with an optional `:<option>`
pub static REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@ref:([\w\-]+)(?::([A-Za-z0-9_]+))?").expect("Invalid REF_RE regex")
});

/// One placeholder occurrence inside a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    pub name: &'a str,
    /// `None` asks for the default view
    pub option: Option<&'a str>,
    /// Byte range of the whole placeholder within the line
    pub span: Range<usize>,
}

/// Placeholders of `line`, left to right.
///
/// A match directly followed by an alphanumeric character or ':' is not a
/// placeholder; it belongs to some longer token and is left untouched.
pub fn references(line: &str) -> impl Iterator<Item = Reference<'_>> {
    REF_RE.captures_iter(line).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let next = line[whole.end()..].chars().next();
        if next.is_some_and(|c| c.is_alphanumeric() || c == ':') {
            return None;
        }

        Some(Reference {
            name: caps.get(1)?.as_str(),
            option: caps.get(2).map(|m| m.as_str()),
            span: whole.range(),
        })
    })
}

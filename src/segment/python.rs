//! Python logical lines
//!
//! A logical line ends at a newline that is outside any bracket, outside any
//! string and not escaped by a trailing backslash. Comment-only lines that sit
//! between statements become single-line units of their own. Enclosing
//! `def`/`class` names are tracked by indentation; a header belongs to the
//! scope it opens.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{render_block, LogicalLine, SegmentError, Segmenter};

static DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid DEF_RE regex")
});

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^class\s+([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid CLASS_RE regex")
});

const TAB_WIDTH: usize = 8;

/// Segmenter for `.py` sources
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSegmenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Function,
    Class,
}

#[derive(Debug)]
struct Scope {
    indent: usize,
    kind: ScopeKind,
    name: String,
}

#[derive(Debug)]
struct OpenString {
    quote: char,
    triple: bool,
    line: usize,
}

impl Segmenter for PythonSegmenter {
    fn segment(&self, source: &str) -> Result<Vec<LogicalLine>, SegmentError> {
        let lines: Vec<&str> = source.lines().collect();
        let mut units = Vec::new();
        let mut scopes: Vec<Scope> = Vec::new();
        let mut brackets: Vec<(char, usize)> = Vec::new();
        let mut string: Option<OpenString> = None;
        let mut start: Option<usize> = None;

        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let chars: Vec<char> = line.chars().collect();
            let mut i = 0;
            let mut comment_only = false;
            let mut continued = false;
            let mut escaped_newline = false;

            while i < chars.len() {
                let c = chars[i];

                if let Some(open) = &string {
                    if c == '\\' {
                        escaped_newline = i + 1 == chars.len();
                        i += 2;
                        continue;
                    }
                    if c == open.quote {
                        if !open.triple {
                            string = None;
                            i += 1;
                            continue;
                        }
                        if chars[i..].starts_with(&[c, c, c]) {
                            string = None;
                            i += 3;
                            continue;
                        }
                    }
                    i += 1;
                    continue;
                }

                match c {
                    '#' => {
                        if start.is_none() {
                            comment_only = true;
                        }
                        break;
                    }
                    '\'' | '"' => {
                        start.get_or_insert(line_no);
                        let triple = chars[i..].starts_with(&[c, c, c]);
                        string = Some(OpenString {
                            quote: c,
                            triple,
                            line: line_no,
                        });
                        i += if triple { 3 } else { 1 };
                        continue;
                    }
                    '(' | '[' | '{' => {
                        start.get_or_insert(line_no);
                        brackets.push((c, line_no));
                    }
                    ')' | ']' | '}' => {
                        let (open, _) = brackets.pop().ok_or(SegmentError::UnexpectedClose {
                            line: line_no,
                            found: c,
                        })?;
                        if closing(open) != c {
                            return Err(SegmentError::MismatchedBracket {
                                line: line_no,
                                open,
                                close: c,
                            });
                        }
                    }
                    '\\' if i + 1 == chars.len() => continued = true,
                    c if c.is_whitespace() => {}
                    _ => {
                        start.get_or_insert(line_no);
                    }
                }
                i += 1;
            }

            if let Some(open) = &string {
                if !open.triple && !escaped_newline {
                    return Err(SegmentError::UnterminatedString { line: open.line });
                }
                continue;
            }

            match start {
                Some(first) if brackets.is_empty() && !continued => {
                    units.push(code_unit(&lines, first, line_no, &mut scopes));
                    start = None;
                }
                Some(_) => {}
                None if comment_only => units.push(comment_unit(line, line_no, &scopes)),
                None => {}
            }
        }

        if let Some(open) = string {
            return Err(SegmentError::UnterminatedString { line: open.line });
        }
        if let Some(&(open, line)) = brackets.first() {
            return Err(SegmentError::UnclosedBracket { line, open });
        }
        if start.is_some() {
            return Err(SegmentError::DanglingContinuation { line: lines.len() });
        }

        Ok(units)
    }
}

fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => break,
        }
    }
    width
}

fn enclosing(scopes: &[&Scope]) -> (Option<String>, Option<String>) {
    let find = |kind: ScopeKind| {
        scopes
            .iter()
            .rev()
            .find(|s| s.kind == kind)
            .map(|s| s.name.clone())
    };
    (find(ScopeKind::Function), find(ScopeKind::Class))
}

fn code_unit(lines: &[&str], start: usize, end: usize, scopes: &mut Vec<Scope>) -> LogicalLine {
    let indent = indent_width(lines[start - 1]);
    while scopes.last().is_some_and(|s| s.indent >= indent) {
        scopes.pop();
    }

    let text = render_block(lines, start, end);
    if let Some(caps) = DEF_RE.captures(&text) {
        scopes.push(Scope {
            indent,
            kind: ScopeKind::Function,
            name: caps[1].to_string(),
        });
    } else if let Some(caps) = CLASS_RE.captures(&text) {
        scopes.push(Scope {
            indent,
            kind: ScopeKind::Class,
            name: caps[1].to_string(),
        });
    }

    let visible: Vec<&Scope> = scopes.iter().collect();
    let (function, class) = enclosing(&visible);
    LogicalLine {
        text,
        start,
        end,
        function,
        class,
    }
}

// Comments do not take part in indentation, so they never close a scope
fn comment_unit(line: &str, line_no: usize, scopes: &[Scope]) -> LogicalLine {
    let indent = indent_width(line);
    let visible: Vec<&Scope> = scopes.iter().filter(|s| s.indent < indent).collect();
    let (function, class) = enclosing(&visible);
    LogicalLine {
        text: line.trim().to_string(),
        start: line_no,
        end: line_no,
        function,
        class,
    }
}

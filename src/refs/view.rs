//! Views of a tag
//!
//! Every option a reference may ask for is a row of [`OPTIONS`]. The `p`
//! family (`p`, `pp`, `ppp`, ...) is open-ended and handled beside the table.

use once_cell::sync::Lazy;
use std::path::Path;

use crate::core::error::{RefersError, Result};
use crate::core::language::Language;
use crate::core::model::{Warning, WarningCode};
use crate::core::paths::{ancestor_relative, file_name, make_relative, normalize_path, strip_root};
use crate::tags::registry::{Tag, TagRegistry};

/// Substituted for references to unknown tags when those are allowed
pub const TAG_NOT_FOUND: &str = "TAG-NOT-FOUND";

/// Option used when a reference names none
pub const DEFAULT_OPTION: &str = "default";

/// What a view needs beyond the tag itself
pub struct ViewContext<'a> {
    /// Scan root that `link`/`linkline` are relative to
    pub root: &'a Path,
    pub warnings: &'a mut Vec<Warning>,
}

type Handler = fn(&Tag, &mut ViewContext) -> String;

/// A named view
pub struct ViewOption {
    pub name: &'static str,
    pub description: &'static str,
    handler: Handler,
}

pub static OPTIONS: &[ViewOption] = &[
    ViewOption {
        name: DEFAULT_OPTION,
        description: "File name and line, e.g. `suvat.py L12`",
        handler: |tag, _| format!("{} L{}", file_name(tag.file()), tag.line()),
    },
    ViewOption {
        name: "line",
        description: "Line of the tag comment",
        handler: |tag, _| tag.line().to_string(),
    },
    ViewOption {
        name: "file",
        description: "File name of the defining file",
        handler: |tag, _| file_name(tag.file()),
    },
    ViewOption {
        name: "quote",
        description: "Full statement the tag belongs to",
        handler: |tag, _| tag.logical_text().to_string(),
    },
    ViewOption {
        name: "quotecode",
        description: "Full statement with trailing comments removed",
        handler: quotecode,
    },
    ViewOption {
        name: "fulllink",
        description: "Absolute path of the defining file",
        handler: |tag, ctx| full_link(tag, ctx.root),
    },
    ViewOption {
        name: "fulllinkline",
        description: "Absolute path with a `#L<line>` anchor",
        handler: |tag, ctx| format!("{}#L{}", full_link(tag, ctx.root), tag.line()),
    },
    ViewOption {
        name: "link",
        description: "Path relative to the scan root",
        handler: |tag, ctx| link(tag, ctx.root),
    },
    ViewOption {
        name: "linkline",
        description: "Path relative to the scan root with a `#L<line>` anchor",
        handler: |tag, ctx| format!("{}#L{}", link(tag, ctx.root), tag.line()),
    },
    ViewOption {
        name: "name",
        description: "Name of the tag",
        handler: |tag, _| tag.name().to_string(),
    },
    ViewOption {
        name: "start",
        description: "First line of the statement",
        handler: |tag, _| tag.logical_start().to_string(),
    },
    ViewOption {
        name: "end",
        description: "Last line of the statement",
        handler: |tag, _| tag.logical_end().to_string(),
    },
    ViewOption {
        name: "func",
        description: "Enclosing function (Python sources)",
        handler: |tag, ctx| scope(tag, tag.function(), "function", ctx),
    },
    ViewOption {
        name: "class",
        description: "Enclosing class (Python sources)",
        handler: |tag, ctx| scope(tag, tag.class(), "class", ctx),
    },
    ViewOption {
        name: "line_num",
        description: "Same as `line`",
        handler: |tag, _| tag.line().to_string(),
    },
    ViewOption {
        name: "full_line",
        description: "Same as `quote`",
        handler: |tag, _| tag.logical_text().to_string(),
    },
    ViewOption {
        name: "line_num_start",
        description: "Same as `start`",
        handler: |tag, _| tag.logical_start().to_string(),
    },
    ViewOption {
        name: "line_num_end",
        description: "Same as `end`",
        handler: |tag, _| tag.logical_end().to_string(),
    },
];

/// Name and description of the open-ended ancestor option
pub const ANCESTOR_OPTION: (&str, &str) = (
    "p, pp, ppp, ...",
    "File name prefixed by as many parent directories as there are `p`",
);

static KNOWN_OPTIONS: Lazy<String> = Lazy::new(|| {
    OPTIONS
        .iter()
        .map(|o| o.name)
        .chain(std::iter::once(ANCESTOR_OPTION.0))
        .collect::<Vec<_>>()
        .join(", ")
});

/// Every option name, in table order
pub fn known_options() -> &'static str {
    &KNOWN_OPTIONS
}

fn full_link(tag: &Tag, root: &Path) -> String {
    if tag.file().is_absolute() {
        normalize_path(tag.file())
    } else {
        normalize_path(&root.join(tag.file()))
    }
}

fn link(tag: &Tag, root: &Path) -> String {
    if tag.file().is_relative() {
        return normalize_path(tag.file());
    }
    make_relative(tag.file(), root).unwrap_or_else(|| full_link(tag, root))
}

fn quotecode(tag: &Tag, ctx: &mut ViewContext) -> String {
    let Some(marker) = Language::from_path(tag.file()).comment_marker() else {
        ctx.warnings.push(
            Warning::new(
                WarningCode::UnknownCommentMarker,
                format!(
                    "No comment marker known for {}; quoting tag {} with comments",
                    file_name(tag.file()),
                    tag.name()
                ),
            )
            .with_path(tag.file())
            .logged(),
        );
        return tag.logical_text().to_string();
    };

    tag.logical_text()
        .lines()
        .map(|line| match line.find(marker) {
            Some(idx) => line[..idx].trim_end(),
            None => line.trim_end(),
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn scope(tag: &Tag, name: Option<&str>, kind: &str, ctx: &mut ViewContext) -> String {
    match name {
        Some(name) => name.to_string(),
        None => {
            ctx.warnings.push(
                Warning::new(
                    WarningCode::MissingScope,
                    format!("Tag {} is not inside a {kind}", tag.name()),
                )
                .with_path(tag.file())
                .logged(),
            );
            String::new()
        }
    }
}

fn ancestors(tag: &Tag, levels: usize, ctx: &mut ViewContext) -> String {
    match ancestor_relative(tag.file(), levels) {
        Some(path) => path,
        None => {
            ctx.warnings.push(
                Warning::new(
                    WarningCode::AncestorOutOfRange,
                    format!(
                        "Tag {} has fewer than {levels} parent directories; using its full path",
                        tag.name()
                    ),
                )
                .with_path(tag.file())
                .logged(),
            );
            strip_root(tag.file())
        }
    }
}

/// `Some(n)` when `option` is `p` repeated `n` times
fn ancestor_levels(option: &str) -> Option<usize> {
    (!option.is_empty() && option.chars().all(|c| c == 'p')).then_some(option.len())
}

/// Turns `(tag name, option)` pairs into substitution text
pub struct ViewResolver<'a> {
    registry: &'a TagRegistry,
    root: &'a Path,
    allow_not_found: bool,
}

impl<'a> ViewResolver<'a> {
    pub fn new(registry: &'a TagRegistry, root: &'a Path, allow_not_found: bool) -> Self {
        Self {
            registry,
            root,
            allow_not_found,
        }
    }

    /// Substitution text for a reference; recoverable problems go to `warnings`
    pub fn resolve(
        &self,
        name: &str,
        option: Option<&str>,
        warnings: &mut Vec<Warning>,
    ) -> Result<String> {
        let tag = match self.registry.lookup(name) {
            Ok(tag) => tag,
            Err(_) if self.allow_not_found => {
                tracing::debug!(tag = name, "unknown tag allowed");
                return Ok(TAG_NOT_FOUND.to_string());
            }
            Err(err) => return Err(err),
        };

        let option = option.unwrap_or(DEFAULT_OPTION);
        let mut ctx = ViewContext {
            root: self.root,
            warnings,
        };

        if let Some(view) = OPTIONS.iter().find(|o| o.name == option) {
            return Ok((view.handler)(tag, &mut ctx));
        }
        if let Some(levels) = ancestor_levels(option) {
            return Ok(ancestors(tag, levels, &mut ctx));
        }

        Err(RefersError::OptionNotFound {
            option: option.to_string(),
            name: name.to_string(),
            site: None,
            known: known_options().to_string(),
        })
    }
}

//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut tags = Vec::new();
        let mut documents = Vec::new();
        let mut options = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Tag => tags.push(item),
                Kind::Document => documents.push(item),
                Kind::Option => options.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !documents.is_empty() {
            output.push_str("## Documents\n\n");
            for item in documents {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`", path));
                    if let Some(status) = item
                        .data
                        .as_ref()
                        .and_then(|d| d.get("status"))
                        .and_then(|s| s.as_str())
                    {
                        output.push_str(&format!(" ({})", status));
                    }
                    output.push('\n');
                }
                for error in item.errors.iter().chain(&item.warnings) {
                    output.push_str(&format!("  - **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !tags.is_empty() {
            output.push_str("## Tags\n\n");
            for item in tags {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        if !options.is_empty() {
            output.push_str("## Options\n\n");
            for item in options {
                let name = item
                    .data
                    .as_ref()
                    .and_then(|d| d.get("name"))
                    .and_then(|n| n.as_str())
                    .unwrap_or_default();
                output.push_str(&format!(
                    "- `{}`: {}\n",
                    name,
                    item.excerpt.as_deref().unwrap_or_default()
                ));
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        let name = item
            .data
            .as_ref()
            .and_then(|d| d.get("name"))
            .and_then(|n| n.as_str());

        if let Some(path) = &item.path {
            match name {
                Some(name) => output.push_str(&format!("### `{}` in `{}`", name, path)),
                None => output.push_str(&format!("### `{}`", path)),
            }
            if let Some(range) = &item.range {
                output.push_str(&format!(" (lines {}-{})", range.start, range.end));
            }
            output.push('\n');
        }

        if let Some(excerpt) = &item.excerpt {
            output.push_str("\n```\n");
            output.push_str(excerpt);
            if !excerpt.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n");
        }

        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ItemError, RangeLine, ResultItem};

    fn renderer(format: OutputFormat) -> Renderer {
        Renderer::with_config(RenderConfig::with_pretty(format, false))
    }

    #[test]
    fn test_render_jsonl() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::document("docs/a.md"));
        result_set.push(ResultItem::document("docs/b.md"));

        let output = renderer(OutputFormat::Jsonl).render(&result_set);

        assert!(output.contains("docs/a.md"));
        assert!(output.contains("docs/b.md"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::document("docs/a.md"));

        let output = renderer(OutputFormat::Json).render(&result_set);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("raw"
            .parse::<OutputFormat>()
            .unwrap_err()
            .contains("Unknown format"));
    }

    #[test]
    fn test_render_json_pretty() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::document("docs/a.md"));

        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&result_set);

        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown_sections() {
        let mut result_set = ResultSet::new();
        let mut tag = ResultItem::tag("src/a.py", RangeLine::new(7, 9))
            .with_data(serde_json::json!({ "name": "e" }));
        tag.excerpt = Some("e = (\n    1\n)".to_string());
        result_set.push(tag);
        result_set.push(
            ResultItem::document("docs/a.md").with_data(serde_json::json!({ "status": "written" })),
        );
        result_set.push(ResultItem::error(ItemError::new("TAG_NOT_FOUND", "Tag c not found")));

        let output = renderer(OutputFormat::Markdown).render(&result_set);

        assert!(output.contains("## Errors"));
        assert!(output.contains("TAG_NOT_FOUND"));
        assert!(output.contains("- `docs/a.md` (written)"));
        assert!(output.contains("### `e` in `src/a.py` (lines 7-9)"));
        assert!(output.contains("e = ("));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = renderer(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }
}

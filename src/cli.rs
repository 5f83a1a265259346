//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{ProjectConfig, Settings};
use crate::core::render::{OutputFormat, RenderConfig};

/// refers - resolve `@ref:` placeholders in documentation against `@tag:` comments in code.
#[derive(Parser, Debug)]
#[command(name = "refers")]
#[command(
    author,
    version,
    about,
    long_about = r#"refers keeps documentation in sync with the code it talks about.

Source files carry tags in comments:

    g = 9.81  # @tag:gravity

Documentation files reference them:

    Gravity is set on line @ref:gravity:line of @ref:gravity:file.

`refers format` writes a sibling `<name>_refers.<ext>` for every documentation
file that contains references, with each placeholder replaced by the requested
view of the tag. Run `refers options` for the list of views.

Each command prints a ResultSet in the selected format (default: jsonl).

Examples:
    refers format
    refers format --allow-not-found-tags --ref-ext .md
    refers tags --name gravity
    refers --format md options
"#
)]
pub struct Cli {
    /// Project root (skips settings discovery).
    #[arg(
        long,
        global = true,
        value_name = "ROOT",
        long_help = "Project root directory.\n\n\
When omitted, the root is the first directory, walking upward from the current\n\
directory, that contains refers.toml or a pyproject.toml. Settings are read from\n\
that directory either way."
    )]
    pub root: Option<PathBuf>,

    /// Output format (jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)"
    )]
    pub format: String,

    /// Disable colored output (also honors NO_COLOR).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only, no summary).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where tags and references are looked for. Every flag overrides the settings file.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Extensions of files scanned for tags (repeatable).
    #[arg(long = "tag-ext", value_name = "EXT")]
    pub tag_extensions: Vec<String>,

    /// Extensions of documentation files (repeatable).
    #[arg(long = "ref-ext", value_name = "EXT")]
    pub ref_extensions: Vec<String>,

    /// Directory to skip, relative to the root (repeatable).
    #[arg(long = "ignore-dir", value_name = "DIR")]
    pub dirs2ignore: Vec<PathBuf>,

    /// Only search these directories, relative to the root (repeatable).
    #[arg(long = "search-dir", value_name = "DIR")]
    pub dirs2search: Vec<PathBuf>,

    /// Scan exactly these files for tags instead of walking the root (repeatable).
    #[arg(long = "tag-file", value_name = "FILE")]
    pub tag_files: Vec<PathBuf>,

    /// Resolve exactly these documentation files (repeatable).
    #[arg(long = "ref-file", value_name = "FILE")]
    pub ref_files: Vec<PathBuf>,

    /// Also scan files excluded by .gitignore.
    #[arg(long)]
    pub no_gitignore: bool,
}

impl SourceArgs {
    fn into_settings(self) -> Settings {
        fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
            (!values.is_empty()).then_some(values)
        }

        Settings {
            tag_extensions: non_empty(self.tag_extensions),
            ref_extensions: non_empty(self.ref_extensions),
            dirs2ignore: non_empty(self.dirs2ignore),
            dirs2search: non_empty(self.dirs2search),
            tag_files: non_empty(self.tag_files),
            ref_files: non_empty(self.ref_files),
            respect_gitignore: self.no_gitignore.then_some(false),
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve references and write `_refers` outputs.
    #[command(long_about = "Build the tag registry from every source file, then rewrite each\n\
documentation file that contains references into its `_refers` sibling.\n\n\
Documentation files without references get no output, and a stale output from\n\
an earlier run is deleted. A document with a bad reference gets no output either;\n\
the remaining documents are still processed and the command exits non-zero.\n\n\
Examples:\n\
  refers format\n\
  refers format --ignore-dir build --ref-ext .md --ref-ext .tex\n\
  refers format --tag-file src/suvat.py --ref-file README.md\n")]
    Format {
        /// Substitute TAG-NOT-FOUND for unknown tags instead of failing.
        #[arg(long)]
        allow_not_found_tags: bool,

        #[command(flatten)]
        sources: SourceArgs,
    },

    /// List tags with their resolved statement and scope.
    #[command(long_about = "Run only the tag scan and print one item per tag: the defining\n\
file, the line span of its statement, the enclosing function and class (Python),\n\
and the statement text.\n\n\
Examples:\n\
  refers tags\n\
  refers --format md tags --name gravity\n")]
    Tags {
        /// Only show the tag with this name.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        #[command(flatten)]
        sources: SourceArgs,
    },

    /// List the views a reference can ask for.
    Options,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_else(|err| {
        tracing::warn!("{err}; using jsonl");
        OutputFormat::default()
    });
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    match cli.command {
        Commands::Format {
            allow_not_found_tags,
            sources,
        } => {
            let overrides = Settings {
                allow_not_found_tags: allow_not_found_tags.then_some(true),
                ..sources.into_settings()
            };
            let config = project_config(cli.root, overrides)?;
            crate::flows::format::run_format(&config, render_config, cli.quiet)
        }

        Commands::Tags { name, sources } => {
            let config = project_config(cli.root, sources.into_settings())?;
            crate::tags::api::run_tags(&config, name.as_deref(), render_config)
        }

        Commands::Options => crate::flows::options::run_options(render_config),
    }
}

fn project_config(root: Option<PathBuf>, overrides: Settings) -> Result<ProjectConfig> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let config = ProjectConfig::resolve(root.as_deref(), &cwd, overrides)?;
    Ok(config)
}

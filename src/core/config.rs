//! Project settings
//!
//! Settings are read from the first directory, walking upward, that contains
//! either `refers.toml` (keys at top level) or `pyproject.toml` (keys under
//! `[tool.refers]`). Command-line values take precedence over file values,
//! which take precedence over the built-in defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{RefersError, Result};
use crate::core::paths::resolve_against;

pub const SETTINGS_FILE: &str = "refers.toml";
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Extensions scanned for tags and references when nothing else is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".c", ".cpp", ".cs", ".go", ".html", ".java", ".js", ".py", ".ruby", ".sh", ".xml", ".txt",
    ".tex", ".md",
];

/// Raw settings as written in a settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Root to scan, relative to the settings file's directory
    pub refers_path: Option<PathBuf>,
    pub allow_not_found_tags: Option<bool>,
    #[serde(alias = "accepted_tag_extensions")]
    pub tag_extensions: Option<Vec<String>>,
    #[serde(alias = "accepted_ref_extensions")]
    pub ref_extensions: Option<Vec<String>>,
    pub dirs2ignore: Option<Vec<PathBuf>>,
    pub dirs2search: Option<Vec<PathBuf>>,
    pub tag_files: Option<Vec<PathBuf>>,
    pub ref_files: Option<Vec<PathBuf>>,
    pub respect_gitignore: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Pyproject {
    #[serde(default)]
    tool: PyprojectTool,
}

#[derive(Debug, Default, Deserialize)]
struct PyprojectTool {
    #[serde(default)]
    refers: Option<Settings>,
}

impl Settings {
    /// Load settings stored directly in `dir`, if any
    pub fn load_from_dir(dir: &Path) -> Result<Option<Settings>> {
        let settings_path = dir.join(SETTINGS_FILE);
        if settings_path.is_file() {
            let content = read(&settings_path)?;
            let settings = toml::from_str::<Settings>(&content).map_err(|source| {
                RefersError::Config {
                    path: settings_path.clone(),
                    source,
                }
            })?;
            return Ok(Some(settings));
        }

        let pyproject_path = dir.join(PYPROJECT_FILE);
        if pyproject_path.is_file() {
            let content = read(&pyproject_path)?;
            let pyproject = toml::from_str::<Pyproject>(&content).map_err(|source| {
                RefersError::Config {
                    path: pyproject_path.clone(),
                    source,
                }
            })?;
            return Ok(Some(pyproject.tool.refers.unwrap_or_default()));
        }

        Ok(None)
    }

    /// Fill every unset field of `self` from `fallback`
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            refers_path: self.refers_path.or(fallback.refers_path),
            allow_not_found_tags: self.allow_not_found_tags.or(fallback.allow_not_found_tags),
            tag_extensions: self.tag_extensions.or(fallback.tag_extensions),
            ref_extensions: self.ref_extensions.or(fallback.ref_extensions),
            dirs2ignore: self.dirs2ignore.or(fallback.dirs2ignore),
            dirs2search: self.dirs2search.or(fallback.dirs2search),
            tag_files: self.tag_files.or(fallback.tag_files),
            ref_files: self.ref_files.or(fallback.ref_files),
            respect_gitignore: self.respect_gitignore.or(fallback.respect_gitignore),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| RefersError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Walk upward from `start` to the first directory holding a settings file
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(SETTINGS_FILE).is_file() || dir.join(PYPROJECT_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| RefersError::ProjectRootNotFound {
            start: start.to_path_buf(),
        })
}

/// Fully resolved configuration used by the pipeline
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub allow_not_found_tags: bool,
    pub tag_extensions: Vec<String>,
    pub ref_extensions: Vec<String>,
    pub dirs2ignore: Vec<PathBuf>,
    pub dirs2search: Option<Vec<PathBuf>>,
    pub tag_files: Option<Vec<PathBuf>>,
    pub ref_files: Option<Vec<PathBuf>>,
    pub respect_gitignore: bool,
}

impl ProjectConfig {
    /// Resolve configuration for a run.
    ///
    /// `root` skips discovery when given; otherwise the project root is
    /// searched upward from `cwd`. `overrides` holds command-line values.
    pub fn resolve(root: Option<&Path>, cwd: &Path, overrides: Settings) -> Result<Self> {
        let base = match root {
            Some(root) => resolve_against(cwd, root),
            None => find_project_root(cwd)?,
        };
        let base = base.canonicalize().unwrap_or(base);

        let file_settings = Settings::load_from_dir(&base)?.unwrap_or_default();
        let settings = overrides.or(file_settings);

        let root = match &settings.refers_path {
            Some(path) => {
                let joined = resolve_against(&base, path);
                joined.canonicalize().unwrap_or(joined)
            }
            None => base,
        };

        tracing::debug!(root = %root.display(), "resolved project root");
        Ok(Self::from_settings(root, settings))
    }

    /// Build a configuration for `root` from already merged settings
    pub fn from_settings(root: PathBuf, settings: Settings) -> Self {
        let under_root = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
            paths.iter().map(|p| resolve_against(&root, p)).collect()
        };

        Self {
            allow_not_found_tags: settings.allow_not_found_tags.unwrap_or(false),
            tag_extensions: normalize_extensions(settings.tag_extensions),
            ref_extensions: normalize_extensions(settings.ref_extensions),
            dirs2ignore: settings.dirs2ignore.map(under_root).unwrap_or_default(),
            dirs2search: settings.dirs2search.map(under_root),
            tag_files: settings.tag_files.map(under_root),
            ref_files: settings.ref_files.map(under_root),
            respect_gitignore: settings.respect_gitignore.unwrap_or(true),
            root,
        }
    }
}

/// Lowercase extensions without their leading dot
fn normalize_extensions(extensions: Option<Vec<String>>) -> Vec<String> {
    match extensions {
        Some(exts) => exts
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect(),
        None => DEFAULT_EXTENSIONS
            .iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::from_settings(PathBuf::from("/p"), Settings::default());
        assert!(!config.allow_not_found_tags);
        assert!(config.tag_extensions.contains(&"py".to_string()));
        assert!(config.ref_extensions.contains(&"md".to_string()));
        assert!(config.dirs2ignore.is_empty());
        assert!(config.dirs2search.is_none());
        assert!(config.respect_gitignore);
    }

    #[test]
    fn test_extensions_normalized() {
        let settings = Settings {
            tag_extensions: Some(vec![".PY".to_string(), "rs".to_string(), " ".to_string()]),
            ..Default::default()
        };
        let config = ProjectConfig::from_settings(PathBuf::from("/p"), settings);
        assert_eq!(config.tag_extensions, vec!["py", "rs"]);
    }

    #[test]
    fn test_dirs_resolved_under_root() {
        let settings = Settings {
            dirs2ignore: Some(vec![PathBuf::from("build")]),
            ..Default::default()
        };
        let config = ProjectConfig::from_settings(PathBuf::from("/p"), settings);
        assert_eq!(config.dirs2ignore, vec![PathBuf::from("/p/build")]);
    }

    #[test]
    fn test_load_refers_toml() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "allow_not_found_tags = true\nref_extensions = [\".md\"]\n",
        )
        .unwrap();

        let settings = Settings::load_from_dir(temp.path()).unwrap().unwrap();
        assert_eq!(settings.allow_not_found_tags, Some(true));
        assert_eq!(settings.ref_extensions, Some(vec![".md".to_string()]));
    }

    #[test]
    fn test_load_pyproject_tool_table() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(PYPROJECT_FILE),
            "[project]\nname = \"demo\"\n\n[tool.refers]\ndirs2ignore = [\"venv\"]\n",
        )
        .unwrap();

        let settings = Settings::load_from_dir(temp.path()).unwrap().unwrap();
        assert_eq!(settings.dirs2ignore, Some(vec![PathBuf::from("venv")]));
    }

    #[test]
    fn test_accepted_extension_keys() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(PYPROJECT_FILE),
            "[tool.refers]\naccepted_tag_extensions = [\".py\"]\naccepted_ref_extensions = [\".md\", \".tex\"]\n",
        )
        .unwrap();

        let settings = Settings::load_from_dir(temp.path()).unwrap().unwrap();
        assert_eq!(settings.tag_extensions, Some(vec![".py".to_string()]));
        assert_eq!(
            settings.ref_extensions,
            Some(vec![".md".to_string(), ".tex".to_string()])
        );
    }

    #[test]
    fn test_pyproject_without_tool_table() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(PYPROJECT_FILE), "[project]\nname = \"demo\"\n").unwrap();

        let settings = Settings::load_from_dir(temp.path()).unwrap().unwrap();
        assert!(settings.allow_not_found_tags.is_none());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), "no_such_key = 1\n").unwrap();

        let err = Settings::load_from_dir(temp.path()).unwrap_err();
        assert_eq!(err.code(), "INVALID_SETTINGS");
    }

    #[test]
    fn test_find_project_root_walks_up() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(PYPROJECT_FILE), "").unwrap();
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), temp.path());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "allow_not_found_tags = true\n",
        )
        .unwrap();

        let overrides = Settings {
            allow_not_found_tags: Some(false),
            ..Default::default()
        };
        let config = ProjectConfig::resolve(Some(temp.path()), temp.path(), overrides).unwrap();
        assert!(!config.allow_not_found_tags);
    }
}

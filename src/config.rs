use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// HTML backend settings. Defaults live only in `default_config.toml`;
/// user files override them key by key.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub container: ContainerConfig,
    pub classes: ClassConfig,
    pub marks: MarksConfig,
    pub links: LinksConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    pub class: String,
}

/// Class attribute per block element. Empty strings emit no attribute.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClassConfig {
    pub paragraph: String,
    pub heading: String,
    pub ordered_list: String,
    pub unordered_list: String,
    pub list_item: String,
    pub unsupported: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkStyle {
    /// `<span class="...">` with one class per active mark.
    Classes,
    /// Nested `<strong>`, `<em>` and `<u>`.
    Elements,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MarksConfig {
    pub style: MarkStyle,
    pub bold: String,
    pub italic: String,
    pub underline: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LinksConfig {
    pub class: String,
    pub target: String,
    pub rel: String,
    pub allow_unsafe_schemes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::compiled_default()
    }
}

impl Config {
    /// The configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        Self::from_toml("").expect("build.rs checks every key of default_config.toml")
    }

    /// Parse a user config, filling unset keys from the bundled defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
        let overrides: toml::Table = toml::from_str(content)?;
        merge(&mut table, overrides);
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::compiled_default())
            }
            Err(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Overlay `overrides` onto `base`, descending into tables.
fn merge(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(value) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge(existing, value);
                    continue;
                }
                base.insert(key, toml::Value::Table(value));
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_come_from_bundled_file() {
        let config = Config::default();
        assert_eq!(config.container.class, "rich-text-content");
        assert_eq!(config.classes.paragraph, "mb-4");
        assert_eq!(config.marks.style, MarkStyle::Classes);
        assert_eq!(config.links.rel, "noopener noreferrer");
        assert!(!config.links.allow_unsafe_schemes);
    }

    #[test]
    fn partial_file_keeps_bundled_values() {
        let config = Config::from_toml(
            r#"
            [marks]
            style = "elements"

            [links]
            target = ""
            "#,
        )
        .unwrap();
        let defaults = Config::default();
        assert_eq!(config.marks.style, MarkStyle::Elements);
        assert_eq!(config.marks.bold, defaults.marks.bold);
        assert_eq!(config.links.target, "");
        assert_eq!(config.links.rel, defaults.links.rel);
        assert_eq!(config.classes, defaults.classes);
        assert_eq!(config.container, defaults.container);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config =
            Config::from_toml("[page]\nnumbers = true\n[links]\ncolor = \"red\"").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("richtext.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[container]\nclass = \"\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.container.class, "");
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[marks]\nstyle = \"sparkly\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::Config(_))));
    }
}

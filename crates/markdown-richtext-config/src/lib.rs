use markdown_richtext_engine::{RenderStyle, TreeLayout};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Rendering settings read from `config.toml`. Every field is optional in
/// the file; missing ones take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Turn literal `\n` sequences in the input into line breaks.
    pub unescape_newlines: bool,
    pub style: RenderStyle,
    pub tree: TreeLayout,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-richtext");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and environment variables in a user-supplied path.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_richtext_engine::style::Color;
    use markdown_richtext_engine::{FontRef, ScopeStyle};
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-richtext/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.style.indent_size, 16.0);
        assert_eq!(config.tree.vertical_spacing, 8.0);
    }

    #[test]
    fn test_partial_style_keeps_other_defaults() {
        let config_content = r##"
unescape_newlines = true

[style]
font_size = 18
font_color = "#202020"
code_font = "JetBrains Mono"

[tree]
vertical_spacing = 4.0
"##;

        let config: Config = toml::from_str(config_content).unwrap();

        assert!(config.unescape_newlines);
        assert_eq!(config.style.font_size, 18.0);
        assert_eq!(config.style.font_color, Color::rgb(0x20, 0x20, 0x20));
        assert_eq!(config.style.code_font, Some(FontRef::new("JetBrains Mono")));
        assert!(config.style.indent_root_lists);
        assert_eq!(config.style.code_theme, RenderStyle::default().code_theme);
        assert_eq!(config.tree.vertical_spacing, 4.0);
        assert_eq!(config.tree.code_block_border_radius, 8.0);
    }

    #[test]
    fn test_code_theme_from_toml() {
        let config_content = r##"
[style.code_theme."keyword.control"]
foreground = "#FF000080"
bold = true
"##;

        let config: Config = toml::from_str(config_content).unwrap();
        let theme = &config.style.code_theme;

        assert_eq!(theme.len(), 1);
        assert_eq!(
            theme.lookup("keyword.control.rust"),
            Some(&ScopeStyle {
                foreground: Some(Color::rgba(0xFF, 0, 0, 0x80)),
                bold: true,
                italic: false,
            })
        );
    }

    #[test]
    fn test_invalid_color_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[style]\nfont_color = \"white\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/config.toml");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/config.toml"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("RICHTEXT_TEST_DIR", "/test/env/path");
        }

        let path = PathBuf::from("$RICHTEXT_TEST_DIR/config.toml");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, PathBuf::from("/test/env/path/config.toml"));

        unsafe {
            env::remove_var("RICHTEXT_TEST_DIR");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let mut test_config = Config::default();
        test_config.unescape_newlines = true;
        test_config.style.indent_root_lists = false;
        test_config.style.text_font = Some(FontRef::new("Inter"));
        test_config.tree.code_block_color = Some(Color::rgb(0x10, 0x20, 0x30));

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_saved_colors_are_hex_strings() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");

        Config::default().save_to_path(&config_file).unwrap();
        let content = std::fs::read_to_string(&config_file).unwrap();

        assert!(content.contains("font_color = \"#FFFFFFFF\""), "{content}");
    }
}

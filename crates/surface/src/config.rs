//! Surface configuration, loaded from `gutterline.toml`.

use std::path::{Path, PathBuf};

use core_types::{KeyCode, UnknownKey};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "gutterline.toml";

/// RGBA, unmultiplied.
pub type Rgba = [u8; 4];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid indent key: {0}")]
    IndentKey(#[from] UnknownKey),
    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurfaceConfig {
    pub editor: EditorConfig,
    pub discovery: DiscoveryConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Text inserted by the indent key.
    pub indent: String,
    /// Key name as accepted by [`KeyCode`]'s `FromStr`, e.g. `"Tab"`.
    pub indent_key: String,
    /// Font size in points.
    pub font_size: f32,
    /// Line height as a multiple of `font_size`.
    pub line_spacing: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Class token marking a textarea as a backing field.
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub text: Rgba,
    pub gutter_text: Rgba,
    pub gutter_active_text: Rgba,
    pub gutter_background: Rgba,
    pub highlight: Rgba,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            indent_key: "Tab".to_string(),
            font_size: 14.0,
            line_spacing: 1.2,
        }
    }
}

impl EditorConfig {
    /// The configured indent key. Falls back to Tab when the name is not
    /// recognised; [`SurfaceConfig::validate`] reports that case up front.
    pub fn indent_key(&self) -> KeyCode {
        self.indent_key.parse().unwrap_or_else(|err| {
            log::warn!(target: "surface.config", "{err}; using Tab");
            KeyCode::Tab
        })
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            class_name: "gutterline".to_string(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            text: [220, 220, 220, 255],
            gutter_text: [120, 120, 120, 255],
            gutter_active_text: [235, 235, 235, 255],
            gutter_background: [30, 30, 30, 255],
            highlight: [255, 255, 255, 18],
        }
    }
}

impl SurfaceConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when it is missing or invalid.
    ///
    /// A missing file is expected and logged at debug level; anything else
    /// is a warning.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(ConfigError::Io { path, source })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::debug!(target: "surface.config", "no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!(target: "surface.config", "{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.editor.indent_key.parse::<KeyCode>()?;
        for (field, value) in [
            ("editor.font_size", self.editor.font_size),
            ("editor.line_spacing", self.editor.line_spacing),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SurfaceConfig::default();
        assert_eq!(config.editor.indent, "    ");
        assert_eq!(config.editor.indent_key(), KeyCode::Tab);
        assert_eq!(config.discovery.class_name, "gutterline");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: SurfaceConfig = toml::from_str(
            r#"
            [editor]
            indent = "\t"

            [theme]
            highlight = [0, 0, 255, 40]
            "#,
        )
        .unwrap();
        assert_eq!(config.editor.indent, "\t");
        assert_eq!(config.editor.font_size, 14.0);
        assert_eq!(config.theme.highlight, [0, 0, 255, 40]);
        assert_eq!(config.theme.text, ThemeConfig::default().text);
    }

    #[test]
    fn validate_rejects_unknown_key_and_bad_sizes() {
        let mut config = SurfaceConfig::default();
        config.editor.indent_key = "Hyper".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::IndentKey(_))));
        assert_eq!(config.editor.indent_key(), KeyCode::Tab);

        let mut config = SurfaceConfig::default();
        config.editor.line_spacing = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "editor.line_spacing",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SurfaceConfig::load_or_default("definitely/not/here/gutterline.toml");
        assert_eq!(config, SurfaceConfig::default());
    }

    #[test]
    fn load_from_file_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("gutterline-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[editor\nindent = 3").unwrap();
        let err = SurfaceConfig::load_from_file(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn toml_round_trip() {
        let config = SurfaceConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SurfaceConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}

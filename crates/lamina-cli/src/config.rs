//! Run configuration: TOML file merged with command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lamina_math::SliceAxis;
use lamina_slicer::SliceSettings;
use lamina_slicer_svg::SvgSettings;
use serde::{Deserialize, Serialize};

/// Everything a run needs besides the input file.
///
/// A config file may set any subset of fields:
///
/// ```toml
/// axis = "x"
/// output_dir = "slices"
/// viewer = "tycat"
///
/// [slice]
/// slice_count = 20
/// simplify_angle = 170.0
///
/// [svg]
/// stroke_color = "#000"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Axis the model is cut along.
    pub axis: SliceAxis,
    /// Directory receiving the SVG files.
    pub output_dir: PathBuf,
    /// File name prefix, files are `{prefix}_{index}.svg`.
    pub prefix: String,
    /// Program run once per written file.
    pub viewer: Option<String>,
    /// Slicing parameters.
    pub slice: SliceSettings,
    /// SVG output parameters.
    pub svg: SvgSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            axis: SliceAxis::Z,
            output_dir: PathBuf::from("."),
            prefix: "layer".to_string(),
            viewer: None,
            slice: SliceSettings::default(),
            svg: SvgSettings::default(),
        }
    }
}

/// Values given explicitly on the command line. `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub slices: Option<usize>,
    pub axis: Option<u8>,
    pub simplify: Option<f64>,
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub viewer: Option<String>,
}

impl Config {
    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Apply command-line values on top of this configuration.
    ///
    /// A simplification angle of `0`, from either source, means no
    /// simplification.
    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(slices) = overrides.slices {
            self.slice.slice_count = slices;
        }
        if let Some(axis) = overrides.axis {
            self.axis = SliceAxis::from_index(usize::from(axis))
                .with_context(|| format!("axis must be 0, 1 or 2, got {}", axis))?;
        }
        if let Some(angle) = overrides.simplify {
            self.slice.simplify_angle = Some(angle);
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(prefix) = overrides.prefix {
            self.prefix = prefix;
        }
        if let Some(viewer) = overrides.viewer {
            self.viewer = Some(viewer);
        }
        // A zero threshold turns simplification off.
        if self.slice.simplify_angle == Some(0.0) {
            self.slice.simplify_angle = None;
        }
        Ok(())
    }

    /// Check the merged configuration before any work is done.
    pub fn validate(&self) -> Result<()> {
        self.slice.validate()?;
        anyhow::ensure!(!self.prefix.is_empty(), "prefix must not be empty");
        anyhow::ensure!(self.svg.size > 0, "svg size must be at least 1 pixel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.axis, SliceAxis::Z);
        assert_eq!(config.slice.slice_count, 10);
        assert_eq!(config.slice.simplify_angle, None);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.prefix, "layer");
        assert_eq!(config.svg.size, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            axis = "x"
            viewer = "tycat"

            [slice]
            simplify_angle = 170.0
            "#,
        )
        .unwrap();
        assert_eq!(config.axis, SliceAxis::X);
        assert_eq!(config.viewer.as_deref(), Some("tycat"));
        assert_eq!(config.slice.simplify_angle, Some(170.0));
        // Unset fields keep their defaults.
        assert_eq!(config.slice.slice_count, 10);
        assert_eq!(config.prefix, "layer");
        assert_eq!(config.svg.stroke_color, "#F00");
    }

    #[test]
    fn test_unknown_axis_rejected() {
        assert!(Config::from_toml("axis = \"w\"").is_err());
    }

    #[test]
    fn test_flags_win() {
        let mut config = Config::from_toml(
            r#"
            prefix = "part"
            [slice]
            slice_count = 20
            "#,
        )
        .unwrap();
        config
            .apply(Overrides {
                slices: Some(5),
                axis: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.slice.slice_count, 5);
        assert_eq!(config.axis, SliceAxis::Y);
        // Not given on the command line.
        assert_eq!(config.prefix, "part");
    }

    #[test]
    fn test_bad_axis_override() {
        let mut config = Config::default();
        let result = config.apply(Overrides {
            axis: Some(3),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_angle() {
        let mut config = Config::default();
        config.slice.simplify_angle = Some(-5.0);
        assert!(config.validate().is_err());
        config.slice.simplify_angle = Some(190.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_angle_disables_simplification() {
        let mut config = Config::default();
        config
            .apply(Overrides {
                simplify: Some(0.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.slice.simplify_angle, None);
        assert!(config.validate().is_ok());

        let mut config = Config::from_toml("[slice]\nsimplify_angle = 0.0\n").unwrap();
        config.apply(Overrides::default()).unwrap();
        assert_eq!(config.slice.simplify_angle, None);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.slice.simplify_angle = Some(165.0);
        config.viewer = Some("display".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lamina.toml");
        std::fs::write(&path, "output_dir = \"out\"\n").unwrap();
        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));

        assert!(Config::from_toml_file(dir.path().join("missing.toml")).is_err());
    }
}

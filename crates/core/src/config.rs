//! Persisted grid defaults.
//!
//! The layout engine takes an explicit [`GridConfig`]; this module is the
//! application-side store for those values between sessions. Defaults are
//! stored as JSON in the user's config directory
//! (e.g. `~/.config/picview/grid.json` on Linux).

use crate::error::Result;
use crate::grid::GridConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Centimeters per inch, for paper sizes entered in physical units.
const CM_PER_INCH: f64 = 2.54;

/// Converts a physical length in centimeters to pixels at the given DPI.
pub fn px_from_cm(dpi: u32, cm: f64) -> u32 {
    (f64::from(dpi) * cm / CM_PER_INCH).round() as u32
}

/// Converts a pixel length at the given DPI back to centimeters.
pub fn cm_from_px(dpi: u32, px: u32) -> f64 {
    f64::from(px) * CM_PER_INCH / f64::from(dpi)
}

/// Grid configuration persisted between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridDefaults {
    pub paper_width: u32,
    pub paper_height: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Print resolution of paper and cell dimensions.
    pub dpi: u32,
    /// Resolution of the preview surface; the preview scale is
    /// `screen_dpi / dpi`.
    #[serde(default = "default_screen_dpi")]
    pub screen_dpi: u32,
}

fn default_screen_dpi() -> u32 {
    150
}

impl GridDefaults {
    /// Returns the path to the defaults file.
    ///
    /// Creates the config directory if it doesn't exist.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "picview", "picview").map(|dirs| {
            let config_dir = dirs.config_dir();
            if !config_dir.exists() {
                let _ = fs::create_dir_all(config_dir);
            }
            config_dir.join("grid.json")
        })
    }

    /// Loads defaults from disk, falling back to the built-ins if the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_else(|| {
                log::debug!("no stored grid defaults, using built-ins");
                Self::default()
            })
    }

    /// Persists the defaults to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            let json = serde_json::to_string_pretty(self)?;
            fs::write(path, json)?;
        } else {
            log::warn!("no config directory available, grid defaults not saved");
        }
        Ok(())
    }

    /// The engine-facing configuration.
    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            paper_width: self.paper_width,
            paper_height: self.paper_height,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            dpi: self.dpi,
        }
    }

    /// Preview scale relative to paper resolution.
    pub fn display_scale(&self) -> f64 {
        f64::from(self.screen_dpi) / f64::from(self.dpi)
    }
}

impl Default for GridDefaults {
    fn default() -> Self {
        let g = GridConfig::default();
        Self {
            paper_width: g.paper_width,
            paper_height: g.paper_height,
            cell_width: g.cell_width,
            cell_height: g.cell_height,
            dpi: g.dpi,
            screen_dpi: default_screen_dpi(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversion_roundtrips() {
        assert_eq!(px_from_cm(300, 2.54), 300);
        assert_eq!(px_from_cm(300, 3.5), 413);
        assert_eq!(px_from_cm(300, 4.5), 531);
        assert!((cm_from_px(300, 413) - 3.5).abs() < 0.01);
    }

    #[test]
    fn defaults_match_the_engine_fallback() {
        let d = GridDefaults::default();
        assert_eq!(d.grid_config(), GridConfig::default());
        assert!((d.display_scale() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn serialization_roundtrips() {
        let mut d = GridDefaults::default();
        d.paper_width = 2400;
        d.dpi = 600;

        let json = serde_json::to_string(&d).unwrap();
        let restored: GridDefaults = serde_json::from_str(&json).unwrap();
        assert_eq!(d, restored);
    }

    #[test]
    fn missing_screen_dpi_defaults() {
        let json = r#"{"paper_width":1800,"paper_height":1200,"cell_width":413,"cell_height":531,"dpi":300}"#;
        let d: GridDefaults = serde_json::from_str(json).unwrap();
        assert_eq!(d.screen_dpi, 150);
    }
}

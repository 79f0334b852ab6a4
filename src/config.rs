//! # Configuration Management
//!
//! This module loads a tuning description from a JSON or TOML file and turns it into
//! validated, typed values. Validation happens once, here; the geometry and pagination
//! code downstream assumes every invariant below already holds.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "edo": 19,
//!   "scale_length": 25,
//!   "fretboard_length": 18.375,
//!   "width_at_nut": 1.7,
//!   "width_at_heel": 2.2,
//!   "layout": { "dpi": 108, "paper": "letter", "margin": 0.5 }
//! }
//! ```
//!
//! Both width fields are optional, but they come as a pair: together they enable the
//! tapered-width model. The `layout` table is optional and may be overridden from the
//! command line. Unknown fields are rejected.

use crate::error::{FretError, Result};
use crate::taper::Taper;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Divisions of the reference tuning every template is drawn against.
pub const REFERENCE_EDO: f64 = 12.0;

/// Finest division accepted. Beyond this, neighbouring frets merge in `f64`.
pub const MAX_EDO: f64 = 10_000.0;

/// Most frets a single template may hold.
pub const MAX_FRETS: f64 = 10_000.0;

/// Tuning and neck geometry for one template.
///
/// Constructed only through [`TuningConfig::new`], which guarantees
/// `0 < fretboard_length < scale_length` so fret generation always terminates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningConfig {
    edo: f64,
    scale_length: f64,
    fretboard_length: f64,
    taper: Option<Taper>,
}

impl TuningConfig {
    pub fn new(
        edo: f64,
        scale_length: f64,
        fretboard_length: f64,
        taper: Option<Taper>,
    ) -> Result<Self> {
        positive("edo", edo)?;
        positive("scale_length", scale_length)?;
        positive("fretboard_length", fretboard_length)?;
        if fretboard_length >= scale_length {
            return Err(FretError::invalid(
                "fretboard_length",
                format!(
                    "must be shorter than scale_length ({} >= {})",
                    fretboard_length, scale_length
                ),
            ));
        }
        if edo > MAX_EDO {
            return Err(FretError::invalid(
                "edo",
                format!("must be at most {}, got {}", MAX_EDO, edo),
            ));
        }
        // Frets below the fretboard end are those with n < edo * log2(scale / (scale - fretboard))
        let fret_count = edo * (scale_length / (scale_length - fretboard_length)).log2();
        if fret_count > MAX_FRETS {
            return Err(FretError::invalid(
                "edo",
                format!(
                    "would place about {:.0} frets on the fretboard (limit {})",
                    fret_count, MAX_FRETS
                ),
            ));
        }
        if let Some(taper) = taper {
            positive("width_at_nut", taper.width_at_nut)?;
            positive("width_at_heel", taper.width_at_heel)?;
        }

        Ok(TuningConfig {
            edo,
            scale_length,
            fretboard_length,
            taper,
        })
    }

    pub fn edo(&self) -> f64 {
        self.edo
    }

    pub fn scale_length(&self) -> f64 {
        self.scale_length
    }

    pub fn fretboard_length(&self) -> f64 {
        self.fretboard_length
    }

    /// Width profile, present only when the tapered model is enabled.
    pub fn taper(&self) -> Option<&Taper> {
        self.taper.as_ref()
    }

    pub fn is_tapered(&self) -> bool {
        self.taper.is_some()
    }

    /// The same neck in 12-EDO, used for the reference lines.
    pub fn reference(&self) -> TuningConfig {
        TuningConfig {
            edo: REFERENCE_EDO,
            ..*self
        }
    }
}

/// Paper sizes the templates can be printed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    #[default]
    Letter,
    Legal,
    A4,
}

impl Paper {
    /// (width, height) in inches, portrait.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            Paper::Letter => (8.5, 11.0),
            Paper::Legal => (8.5, 14.0),
            Paper::A4 => (8.27, 11.69),
        }
    }
}

impl FromStr for Paper {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(Paper::Letter),
            "legal" => Ok(Paper::Legal),
            "a4" => Ok(Paper::A4),
            other => Err(format!(
                "unknown paper size '{}' (expected letter, legal or a4)",
                other
            )),
        }
    }
}

impl fmt::Display for Paper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Paper::Letter => "letter",
            Paper::Legal => "legal",
            Paper::A4 => "a4",
        };
        f.write_str(name)
    }
}

/// Rendering constants shared by pagination and the SVG renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    dpi: f64,
    paper: Paper,
    margin: f64,
}

pub const DEFAULT_DPI: f64 = 108.0;
pub const DEFAULT_MARGIN: f64 = 0.5;

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            dpi: DEFAULT_DPI,
            paper: Paper::Letter,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl PageLayout {
    pub fn new(dpi: f64, paper: Paper, margin: f64) -> Result<Self> {
        positive("dpi", dpi)?;
        if !margin.is_finite() || margin < 0.0 {
            return Err(FretError::invalid(
                "margin",
                format!("must be a finite, non-negative number of inches, got {}", margin),
            ));
        }
        let (width, height) = paper.dimensions();
        if 2.0 * margin >= width.min(height) {
            return Err(FretError::invalid(
                "margin",
                format!("{} in margins leave no printable area on {} paper", margin, paper),
            ));
        }

        Ok(PageLayout { dpi, paper, margin })
    }

    /// Replace any of the three settings, re-validating the result.
    pub fn with_overrides(
        &self,
        dpi: Option<f64>,
        paper: Option<Paper>,
        margin: Option<f64>,
    ) -> Result<Self> {
        PageLayout::new(
            dpi.unwrap_or(self.dpi),
            paper.unwrap_or(self.paper),
            margin.unwrap_or(self.margin),
        )
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn paper(&self) -> Paper {
        self.paper
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn to_px(&self, inches: f64) -> f64 {
        inches * self.dpi
    }

    pub fn paper_width_px(&self) -> f64 {
        self.to_px(self.paper.dimensions().0)
    }

    pub fn paper_height_px(&self) -> f64 {
        self.to_px(self.paper.dimensions().1)
    }

    pub fn margin_px(&self) -> f64 {
        self.to_px(self.margin)
    }

    pub fn printable_height(&self) -> f64 {
        self.paper.dimensions().1 - 2.0 * self.margin
    }

    pub fn printable_height_px(&self) -> f64 {
        self.to_px(self.printable_height())
    }
}

/// Everything a config file describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub tuning: TuningConfig,
    pub layout: PageLayout,
}

/// On-disk shape of the config file, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    edo: f64,
    scale_length: f64,
    fretboard_length: f64,
    width_at_nut: Option<f64>,
    width_at_heel: Option<f64>,
    #[serde(default)]
    layout: LayoutSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutSection {
    dpi: Option<f64>,
    paper: Option<Paper>,
    margin: Option<f64>,
}

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl Config {
    /// Load and validate a config file; the format is picked from the extension.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| FretError::io(path, e))?;
        let config = Self::parse(&contents, ConfigFormat::from_path(path)).map_err(|e| match e {
            FretError::Config(msg) => FretError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        tracing::info!(
            "Loaded config {}: {} EDO, scale {} in, fretboard {} in{}",
            path.display(),
            config.tuning.edo(),
            config.tuning.scale_length(),
            config.tuning.fretboard_length(),
            if config.tuning.is_tapered() { ", tapered" } else { "" }
        );
        Ok(config)
    }

    pub fn parse(contents: &str, format: ConfigFormat) -> Result<Self> {
        let raw: ConfigFile = match format {
            ConfigFormat::Json => {
                serde_json::from_str(contents).map_err(|e| FretError::Config(e.to_string()))?
            }
            ConfigFormat::Toml => {
                toml::from_str(contents).map_err(|e| FretError::Config(e.to_string()))?
            }
        };
        raw.validate()
    }
}

impl ConfigFile {
    fn validate(self) -> Result<Config> {
        let taper = match (self.width_at_nut, self.width_at_heel) {
            (Some(width_at_nut), Some(width_at_heel)) => Some(Taper {
                width_at_nut,
                width_at_heel,
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(FretError::invalid(
                    "width_at_heel",
                    "required when width_at_nut is set",
                ))
            }
            (None, Some(_)) => {
                return Err(FretError::invalid(
                    "width_at_nut",
                    "required when width_at_heel is set",
                ))
            }
        };

        let tuning = TuningConfig::new(
            self.edo,
            self.scale_length,
            self.fretboard_length,
            taper,
        )?;
        let layout = PageLayout::default().with_overrides(
            self.layout.dpi,
            self.layout.paper,
            self.layout.margin,
        )?;

        Ok(Config { tuning, layout })
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FretError::invalid(
            field,
            format!("must be a finite number greater than zero, got {}", value),
        ))
    }
}

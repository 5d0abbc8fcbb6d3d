//! Filmic tone-response curves.
//!
//! Each [`Look`] owns a dense [`FilmicCurve`] of [`CURVE_SAMPLES`] perceptual
//! response values indexed by normalized log-luminance. [`ToneCurves`] holds
//! all seven and performs the lookup used by the exposure controller.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RealCameraError, Result};

/// Number of samples in every filmic curve.
pub const CURVE_SAMPLES: usize = 4096;

/// Highest valid curve index.
pub const MAX_INDEX: usize = CURVE_SAMPLES - 1;

/// Contrast look selecting one of the seven filmic curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Look {
    #[serde(rename = "Very High Contrast")]
    VeryHighContrast,
    #[serde(rename = "High Contrast")]
    HighContrast,
    #[serde(rename = "Medium High Contrast")]
    MediumHighContrast,
    /// The base look, also used for `"None"` and unknown names.
    #[default]
    #[serde(rename = "Medium Contrast")]
    MediumContrast,
    #[serde(rename = "Medium Low Contrast")]
    MediumLowContrast,
    #[serde(rename = "Low Contrast")]
    LowContrast,
    #[serde(rename = "Very Low Contrast")]
    VeryLowContrast,
}

impl Look {
    /// All looks, in curve-table order.
    pub const ALL: [Look; 7] = [
        Look::VeryHighContrast,
        Look::HighContrast,
        Look::MediumHighContrast,
        Look::MediumContrast,
        Look::MediumLowContrast,
        Look::LowContrast,
        Look::VeryLowContrast,
    ];

    /// Returns the display name, which is also the curve file name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Look::VeryHighContrast => "Very High Contrast",
            Look::HighContrast => "High Contrast",
            Look::MediumHighContrast => "Medium High Contrast",
            Look::MediumContrast => "Medium Contrast",
            Look::MediumLowContrast => "Medium Low Contrast",
            Look::LowContrast => "Low Contrast",
            Look::VeryLowContrast => "Very Low Contrast",
        }
    }

    /// Resolves a renderer look name.
    ///
    /// `"None"` and unrecognized names resolve to [`Look::MediumContrast`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if let Some(look) = Look::ALL.into_iter().find(|look| look.name() == name) {
            return look;
        }
        if name != "None" {
            // TODO: decide whether unknown looks should surface as an error to the host
            log::debug!("unknown look '{name}', using Medium Contrast");
        }
        Look::MediumContrast
    }

    fn index(self) -> usize {
        match self {
            Look::VeryHighContrast => 0,
            Look::HighContrast => 1,
            Look::MediumHighContrast => 2,
            Look::MediumContrast => 3,
            Look::MediumLowContrast => 4,
            Look::LowContrast => 5,
            Look::VeryLowContrast => 6,
        }
    }
}

impl fmt::Display for Look {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a normalized log-luminance value to a curve index in `[0, MAX_INDEX]`.
///
/// Negative and NaN inputs map to index 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn curve_index(log_value: f64) -> usize {
    if !(log_value > 0.0) {
        return 0;
    }
    ((log_value * MAX_INDEX as f64).floor() as usize).min(MAX_INDEX)
}

/// One contrast look: perceptual response sampled over normalized log-luminance.
#[derive(Debug, Clone)]
pub struct FilmicCurve {
    look: Look,
    values: Box<[f64]>,
}

impl FilmicCurve {
    /// Creates a curve from exactly [`CURVE_SAMPLES`] values.
    pub fn from_values(look: Look, values: Vec<f64>) -> Result<Self> {
        if values.len() != CURVE_SAMPLES {
            return Err(RealCameraError::CurveLength {
                look,
                expected: CURVE_SAMPLES,
                actual: values.len(),
            });
        }
        Ok(Self {
            look,
            values: values.into_boxed_slice(),
        })
    }

    /// Samples `f` at every index, with `t = index / MAX_INDEX` in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fn(look: Look, f: impl Fn(f64) -> f64) -> Self {
        let values = (0..CURVE_SAMPLES)
            .map(|i| f(i as f64 / MAX_INDEX as f64))
            .collect();
        Self { look, values }
    }

    /// Parses the plain-text curve format: one floating-point literal per line.
    pub fn parse(look: Look, text: &str) -> Result<Self> {
        let values = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let line = line.trim();
                line.parse::<f64>()
                    .map_err(|_| RealCameraError::CurveParse {
                        look,
                        line: i + 1,
                        value: line.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_values(look, values)
    }

    /// Reads and parses a curve file.
    pub fn load(look: Look, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RealCameraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(look, &text)
    }

    /// The look this curve belongs to.
    pub fn look(&self) -> Look {
        self.look
    }

    /// The raw response values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the response at the index derived from `log_value`.
    pub fn sample(&self, log_value: f64) -> f64 {
        self.values[curve_index(log_value)]
    }
}

/// The full set of seven filmic curves.
#[derive(Debug, Clone)]
pub struct ToneCurves {
    curves: Vec<FilmicCurve>,
}

impl ToneCurves {
    /// Builds the table by asking `f` for each look's curve.
    pub fn from_fn(mut f: impl FnMut(Look) -> FilmicCurve) -> Self {
        Self {
            curves: Look::ALL.into_iter().map(&mut f).collect(),
        }
    }

    /// Loads all seven curves from `dir`, one file per look named after it.
    ///
    /// Any missing or malformed file fails the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let curves = Look::ALL
            .into_iter()
            .map(|look| FilmicCurve::load(look, &dir.join(look.name())))
            .collect::<Result<Vec<_>>>()?;
        log::info!("loaded {} tone curves from {}", curves.len(), dir.display());
        Ok(Self { curves })
    }

    /// Returns the curve for `look`.
    pub fn curve(&self, look: Look) -> &FilmicCurve {
        &self.curves[look.index()]
    }

    /// Perceptual response in `[0, 1]` for a normalized log-luminance value.
    ///
    /// Values at or above 1 saturate to full brightness.
    pub fn lookup(&self, log_value: f64, look: Look) -> f64 {
        if log_value >= 1.0 {
            return 1.0;
        }
        self.curve(look).sample(log_value)
    }
}

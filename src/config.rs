//! Analysis configuration
//!
//! The significance threshold is passed explicitly to every decision instead
//! of living in module state, so the decision function stays pure.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Recognized default significance threshold
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Conventional per-group sample size above which the z-test's normal
/// approximation is considered valid
pub const DEFAULT_Z_TEST_MIN_SAMPLES: usize = 30;

/// Configuration shared by the engine, the decision step and suites.
///
/// ## Example
///
/// ```rust
/// use trueno_ab::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .alpha(0.01)
///     .continuity_correction(true)
///     .build()?;
/// assert!((config.alpha() - 0.01).abs() < f64::EPSILON);
/// # Ok::<(), trueno_ab::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    alpha: f64,
    continuity_correction: bool,
    z_test_min_samples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            continuity_correction: true,
            z_test_min_samples: DEFAULT_Z_TEST_MIN_SAMPLES,
        }
    }
}

impl AnalysisConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or a value is out
    /// of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("Invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Significance threshold.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether Yates' continuity correction is applied to 1-dof
    /// chi-squared tests.
    #[must_use]
    pub const fn continuity_correction(&self) -> bool {
        self.continuity_correction
    }

    /// Per-group sample size below which z-tests log a warning.
    #[must_use]
    pub const fn z_test_min_samples(&self) -> usize {
        self.z_test_min_samples
    }

    fn validate(&self) -> Result<()> {
        validate_alpha(self.alpha).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Check that a significance threshold lies in the open interval (0, 1).
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] otherwise.
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "alpha must be in (0, 1), got {alpha}"
        )))
    }
}

/// Builder for `AnalysisConfig`.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the significance threshold.
    #[must_use]
    pub const fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Enable or disable Yates' continuity correction.
    #[must_use]
    pub const fn continuity_correction(mut self, enabled: bool) -> Self {
        self.config.continuity_correction = enabled;
        self
    }

    /// Set the z-test sample size warning threshold.
    #[must_use]
    pub const fn z_test_min_samples(mut self, n: usize) -> Self {
        self.config.z_test_min_samples = n;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `alpha` is not in (0, 1).
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

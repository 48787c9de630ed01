use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Tuning knobs for edit-script generation.
///
/// The default produces the shortest possible script: nothing for equal
/// inputs, otherwise a single replacement between the common prefix and
/// suffix. Setting [`min_equal_run`](Self::min_equal_run) splits that
/// replacement at shared runs instead, which yields finer entries but may
/// use more replacements than the edits that produced the change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Shared runs of at least this many bytes split the changed region
    /// into separate replacements. Shorter runs are absorbed.
    pub min_equal_run: Option<usize>,
    /// When splitting, residual regions longer than this (on either side)
    /// skip the Myers pass and become a single replacement.
    pub max_window: usize,
    /// Deadline for the Myers pass. When it expires the script is coarser
    /// but still exact.
    pub timeout: Option<Duration>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            min_equal_run: None,
            max_window: 1024 * 1024,
            timeout: None,
        }
    }
}

impl DiffConfig {
    /// Split the changed region at every shared run of `min_equal_run`
    /// bytes or more.
    pub fn splitting(min_equal_run: usize) -> Self {
        Self {
            min_equal_run: Some(min_equal_run),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DiffResult<()> {
        if self.min_equal_run == Some(0) {
            return Err(DiffError::Config("min_equal_run must be at least 1".into()));
        }
        Ok(())
    }
}

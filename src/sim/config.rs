use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

/// Relative likelihood of each daily action. Need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionWeights {
    pub build: f64,
    pub release: f64,
    pub idle: f64,
}

/// Settings for a simulated run, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub capacity: usize,
    pub days: u64,
    pub size_range: SizeRange,
    pub owners: Vec<String>,
    pub weights: ActionWeights,
    pub row_width: usize,
    /// milliseconds
    pub pace_ms: u64,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            capacity: 50,
            days: 15,
            size_range: SizeRange { min: 5, max: 10 },
            owners: ["Baker", "Taylor", "Miller", "Weaver", "Fisher"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            weights: ActionWeights {
                build: 0.45,
                release: 0.45,
                idle: 0.1,
            },
            row_width: 10,
            pace_ms: 0,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("loading config file {:?}", path))?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(raw).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no run could start with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be positive");
        }
        if self.days == 0 {
            bail!("days must be positive");
        }
        if self.size_range.min == 0 {
            bail!("size_range.min must be at least 1");
        }
        if self.size_range.min > self.size_range.max {
            return Err(anyhow!(
                "size_range.min ({}) exceeds size_range.max ({})",
                self.size_range.min,
                self.size_range.max
            ));
        }
        if self.owners.is_empty() {
            bail!("owners must not be empty");
        }
        if self.row_width == 0 {
            bail!("row_width must be positive");
        }
        let w = &self.weights;
        for (name, value) in [("build", w.build), ("release", w.release), ("idle", w.idle)] {
            if !value.is_finite() || value < 0.0 {
                bail!("weights.{name} must be a non-negative number, got {value}");
            }
        }
        if w.build + w.release + w.idle == 0.0 {
            bail!("at least one action weight must be positive");
        }
        Ok(())
    }
}

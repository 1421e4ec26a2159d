use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adjust::RatePolicy;
use crate::error::{Error, Result};
use crate::select::SelectionPolicy;

pub const DEFAULT_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerConfig {
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default)]
    pub rate: RatePolicy,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Seeds the run's RNG; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            selection: SelectionPolicy::default(),
            rate: RatePolicy::default(),
            iterations: DEFAULT_ITERATIONS,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        let cfg: Self = serde_json::from_slice(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::Config("iterations must be > 0".into()));
        }
        if let RatePolicy::Fixed(rate) = self.rate {
            if !rate.is_finite() {
                return Err(Error::Config(format!("fixed rate must be finite, got {rate}")));
            }
        }
        Ok(())
    }
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: OptimizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, OptimizerConfig::default());
        assert_eq!(cfg.iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn parses_full_config() {
        let cfg: OptimizerConfig = serde_json::from_str(
            r#"{"selection":"exhaustive-worst","rate":{"fixed":0.2},"iterations":50,"seed":9}"#,
        )
        .unwrap();
        assert_eq!(cfg.selection, SelectionPolicy::ExhaustiveWorst);
        assert_eq!(cfg.rate, RatePolicy::Fixed(0.2));
        assert_eq!(cfg.iterations, 50);
        assert_eq!(cfg.seed, Some(9));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_iterations_rejected() {
        let cfg = OptimizerConfig {
            iterations: 0,
            ..OptimizerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"iterations": 12, "rate": "random"}"#).unwrap();
        let cfg = OptimizerConfig::load(&path).unwrap();
        assert_eq!(cfg.iterations, 12);
        fs::write(&path, r#"{"iterations": 0}"#).unwrap();
        assert!(OptimizerConfig::load(&path).is_err());
    }
}

use crate::gate::DEFAULT_DENY_TERMS;
use crate::{Error, Result};

pub const DEFAULT_TOP_K: usize = 3;

/// Absolute L2 cutoff. Calibrated for unit-normalised sentence embeddings
/// (e.g. all-MiniLM-L6-v2); other models need their own value.
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 1.0;

/// Retrieval and filtering settings for an [`Engine`](crate::Engine)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub top_k: usize,
    pub distance_threshold: f32,
    pub deny_terms: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            deny_terms: DEFAULT_DENY_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if !self.distance_threshold.is_finite() || self.distance_threshold <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "distance_threshold must be a positive finite number, got {}",
                self.distance_threshold
            )));
        }
        if self.deny_terms.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::InvalidConfig("deny terms must not be empty".to_string()));
        }
        Ok(())
    }
}

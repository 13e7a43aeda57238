use crate::config::DEFAULT_DISTANCE_THRESHOLD;
use crate::{Result, Vector};

/// Maps text to fixed-dimension vectors compared under L2 distance.
///
/// Implementations must be deterministic for a fixed model and return
/// vectors of [`Embedder::dim`] length for every call in a process lifetime.
pub trait Embedder: Send + Sync {
    /// Output dimension
    fn dim(&self) -> usize;

    /// Model identifier, for logs and health reporting
    fn model_name(&self) -> &str;

    /// Distance cutoff suited to this model's vector space, used when none
    /// is configured explicitly
    fn recommended_threshold(&self) -> f32 {
        DEFAULT_DISTANCE_THRESHOLD
    }

    fn encode(&self, text: &str) -> Result<Vector>;

    /// Encode many texts, preserving input order
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

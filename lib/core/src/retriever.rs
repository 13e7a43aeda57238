use crate::{Embedder, Error, FlatIndex, Result};
use serde::Serialize;
use std::sync::Arc;

/// A canonical text that passed the distance threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub position: usize,
    pub distance: f32,
    pub text: String,
}

/// Embeds queries and looks them up in the index.
///
/// Holds the canonical texts in index order, so a hit's position maps
/// straight back to its text.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: FlatIndex,
    texts: Vec<String>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: FlatIndex, texts: Vec<String>) -> Result<Self> {
        if index.len() != texts.len() {
            return Err(Error::InvalidConfig(format!(
                "index holds {} vectors but {} texts were supplied",
                index.len(),
                texts.len()
            )));
        }
        Ok(Self { embedder, index, texts })
    }

    /// Embed every text in one batch and build the index over them
    pub fn build(embedder: Arc<dyn Embedder>, texts: Vec<String>) -> Result<Self> {
        let vectors = embedder.encode_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "provider returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.dim() != embedder.dim()) {
            return Err(Error::InvalidDimension {
                expected: embedder.dim(),
                actual: bad.dim(),
            });
        }
        tracing::debug!(
            "Embeddings shape: ({}, {}) from {}",
            vectors.len(),
            embedder.dim(),
            embedder.model_name()
        );

        let index = FlatIndex::build(vectors)?;
        Self::new(embedder, index, texts)
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Up to `k` documents with distance strictly below `distance_threshold`,
    /// nearest first. An empty result means "no match", not an error.
    pub fn retrieve(
        &self,
        query: &str,
        k: usize,
        distance_threshold: f32,
    ) -> Result<Vec<RetrievedDocument>> {
        let query_vector = self.embedder.encode(query)?;
        let neighbors = self.index.query(&query_vector, k)?;
        tracing::debug!("Retrieved neighbors for '{}': {:?}", query, neighbors);

        Ok(neighbors
            .into_iter()
            .filter(|n| n.distance < distance_threshold)
            .map(|n| RetrievedDocument {
                position: n.position,
                distance: n.distance,
                text: self.texts[n.position].clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    /// Embeds "x,y" strings as 2-d points
    struct PointEmbedder;

    impl Embedder for PointEmbedder {
        fn dim(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "point"
        }

        fn encode(&self, text: &str) -> Result<Vector> {
            let coords: Vec<f32> = text
                .split(',')
                .map(|c| c.trim().parse().map_err(|_| Error::Embedding(format!("bad point '{}'", text))))
                .collect::<Result<_>>()?;
            Ok(Vector::new(coords))
        }
    }

    fn retriever() -> Retriever {
        let texts = ["0,0", "1,0", "2,0", "5,0"].iter().map(|s| s.to_string()).collect();
        Retriever::build(Arc::new(PointEmbedder), texts).unwrap()
    }

    #[test]
    fn test_threshold_is_strict() {
        let r = retriever();
        let docs = r.retrieve("0,0", 3, 1.0).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "0,0");

        let docs = r.retrieve("0,0", 3, 1.0001).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let r = retriever();
        assert!(r.retrieve("100,100", 3, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_k_bound_and_order() {
        let r = retriever();
        let docs = r.retrieve("1.9,0", 2, 10.0).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "2,0");
        assert_eq!(docs[1].text, "1,0");

        let docs = r.retrieve("1.9,0", 50, 10.0).unwrap();
        assert_eq!(docs.len(), 4);
        assert!(docs.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_embedding_errors_propagate() {
        let r = retriever();
        assert!(matches!(r.retrieve("not a point", 3, 1.0), Err(Error::Embedding(_))));
    }

    #[test]
    fn test_positional_mismatch_rejected() {
        let index = FlatIndex::build(vec![Vector::new(vec![0.0, 0.0])]).unwrap();
        let result = Retriever::new(Arc::new(PointEmbedder), index, Vec::new());
        assert!(result.is_err());
    }
}

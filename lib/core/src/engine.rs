use crate::compose::{self, Composer};
use crate::gate::{Gatekeeper, Verdict};
use crate::response::{self, Response, ResponseKind};
use crate::{text, Embedder, EngineConfig, RecordStore, Result, Retriever};
use std::sync::Arc;

/// The immutable query-answering context.
///
/// Built once at startup by [`Engine::build`], then shared (typically as
/// `Arc<Engine>`) by every request handler. Nothing in it changes after
/// construction, so concurrent queries need no locking.
pub struct Engine {
    store: RecordStore,
    retriever: Retriever,
    gatekeeper: Gatekeeper,
    composer: Composer,
    config: EngineConfig,
}

impl Engine {
    /// Project every record, embed the texts in one batch and build the
    /// index. Any failure here is fatal; there is no partial engine.
    pub fn build(store: RecordStore, embedder: Arc<dyn Embedder>, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let texts: Vec<String> = store.records().iter().map(text::project).collect();
        let retriever = Retriever::build(embedder, texts)?;
        tracing::info!(
            "Indexed {} records with {} (dim {})",
            retriever.index().len(),
            retriever.embedder().model_name(),
            retriever.embedder().dim()
        );

        Ok(Self {
            gatekeeper: Gatekeeper::new(&config.deny_terms),
            composer: Composer::new(store.districts()),
            store,
            retriever,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    /// Gatekeeper, then retrieval, then composition.
    ///
    /// Rejected and empty queries never reach the embedder.
    pub fn try_handle_query(&self, query: &str) -> Result<Response> {
        if compose::normalize(query).is_empty() {
            return Ok(Response::text(ResponseKind::Invalid, response::EMPTY_QUERY_REPLY));
        }

        if let Verdict::Reject { term } = self.gatekeeper.check(query) {
            tracing::warn!("Forbidden query detected (matched '{}'): {}", term, query);
            return Ok(Response::rejected());
        }

        let documents = self
            .retriever
            .retrieve(query, self.config.top_k, self.config.distance_threshold)?;
        self.composer.compose(query, &documents)
    }

    /// Like [`Engine::try_handle_query`], but internal errors are logged in
    /// full and replaced by a generic failure response.
    pub fn handle_query(&self, query: &str) -> Response {
        match self.try_handle_query(query) {
            Ok(response) => {
                tracing::debug!("Response generated for query '{}': {:?}", query, response.kind);
                response
            }
            Err(e) => {
                tracing::error!("Failed to answer query '{}': {}", query, e);
                Response::failure()
            }
        }
    }
}

use std::sync::Arc;

use crate::llm_client::ModelGateway;
use crate::stats::StatsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Gateway to the generative model. Trait object so tests can swap in a
    /// canned gateway instead of hitting the network.
    pub gateway: Arc<dyn ModelGateway>,
    /// Process-wide usage counters. Injectable so tests get isolated stores.
    pub stats: Arc<dyn StatsStore>,
}

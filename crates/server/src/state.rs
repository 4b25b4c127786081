use std::sync::Arc;

use manager::FeatureManager;

/// Shared application state: the fused manager serving every request.
///
/// The demo record value is a plain `String` (e.g. an event message); a
/// production deployment would substitute its own record type and
/// tokenizers without touching the router.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<FeatureManager<String>>,
}

impl AppState {
    pub fn new(manager: FeatureManager<String>) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }
}

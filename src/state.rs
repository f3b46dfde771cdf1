use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::AuthKeys;
use crate::external::classifier::SentimentClassifier;
use crate::external::post_source::PostSource;
use crate::external::quote_provider::QuoteProvider;
use crate::services::quote_cache::QuoteCache;

/// Shared application state handed to every handler. Collaborators are
/// injected as trait objects so providers can be swapped through config.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub quotes: QuoteCache,
    pub quote_provider: Arc<dyn QuoteProvider>,
    pub classifier: Arc<dyn SentimentClassifier>,
    pub posts: Option<Arc<dyn PostSource>>,
    pub auth: AuthKeys,
}

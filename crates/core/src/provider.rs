//! The search provider boundary: an opaque async function from query text to raw records.

use std::future::Future;
use std::sync::Arc;

use crate::error::ProviderError;

/// Source of raw records for a query. Ranking and matching are entirely the
/// provider's business; the controller only maps and filters what comes back.
pub trait SearchProvider: Send + Sync + 'static {
    type Record: Send + 'static;

    fn query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Self::Record>, ProviderError>> + Send;
}

impl<P: SearchProvider> SearchProvider for Arc<P> {
    type Record = P::Record;

    fn query(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<Self::Record>, ProviderError>> + Send {
        P::query(self, text)
    }
}

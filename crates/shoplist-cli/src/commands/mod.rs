//! Command handlers

pub mod auth;
pub mod categories;
pub mod config;
pub mod items;
pub mod lists;
pub mod products;
pub mod purchases;

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::debug;

use shoplist_core::resources::Resource;
use shoplist_core::{LoadMoreTrigger, PagedCollectionStore};

/// What a listing command should load
pub struct Listing<F> {
    pub filter: F,
    /// Client-side search over the loaded items
    pub search: Option<String>,
    /// Keep loading pages until the server reports the last one
    pub all: bool,
}

/// Fetch a listing into `store` and return the items matching the search
///
/// A failed first page is reported with the store's user-facing message.
pub async fn load<R: Resource>(
    store: Arc<PagedCollectionStore<R>>,
    listing: Listing<R::Filter>,
) -> Result<Vec<R::Item>> {
    if let Err(err) = store.fetch(&listing.filter).await {
        debug!("Fetch failed: {}", err);
        let message = store.error().unwrap_or_else(|| err.user_message());
        bail!(message);
    }

    if listing.all {
        let trigger = LoadMoreTrigger::new(store.clone(), listing.filter);
        loop {
            let page = store.current_page();
            if !trigger.on_visible().await {
                break;
            }
            // A failed page leaves the cursor where it was
            if store.current_page() == page {
                trigger.disconnect();
                bail!("Failed to load page {}. Please try again.", page + 1);
            }
        }
    }

    if let Some(query) = listing.search {
        store.set_search(query);
    }
    Ok(store.filtered_items())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use shoplist_core::error::ApiResult;
    use shoplist_core::{ApiRequest, Transport};

    /// Replays canned responses in order
    #[derive(Default)]
    pub struct CannedTransport {
        responses: Mutex<VecDeque<ApiResult<Value>>>,
        pub requests: Mutex<Vec<ApiRequest>>,
    }

    impl CannedTransport {
        pub fn with(responses: Vec<ApiResult<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Value::Null))
        }
    }

    pub fn page(data: Vec<Value>, has_next: bool) -> Value {
        json!({
            "data": data,
            "pagination": {
                "page": 1, "per_page": 10, "total": 0, "total_pages": 0,
                "has_prev": false, "has_next": has_next
            }
        })
    }
}

//! Paged collection stores
//!
//! A [`PagedCollectionStore`] owns the locally materialized slice of one
//! server-side collection. It loads page 1 with [`fetch`], appends further
//! pages with [`load_more`] and applies single-entity writes ([`create`],
//! [`update`], [`remove`]) to its items once the server confirms them.
//!
//! ## Reactivity
//!
//! State lives in a `tokio::sync::watch` channel. Views call [`subscribe`]
//! and re-render whenever a new [`CollectionState`] is published, or read a
//! copy with [`snapshot`].
//!
//! ## Concurrency
//!
//! All operations take `&self`, so several calls can be in flight on one
//! store. Only `load_more` is guarded against re-entry. Every `fetch` starts
//! a new generation; responses belonging to an older generation are
//! discarded, so a slow response can never overwrite a newer listing.
//!
//! [`fetch`]: PagedCollectionStore::fetch
//! [`load_more`]: PagedCollectionStore::load_more
//! [`create`]: PagedCollectionStore::create
//! [`update`]: PagedCollectionStore::update
//! [`remove`]: PagedCollectionStore::remove
//! [`subscribe`]: PagedCollectionStore::subscribe
//! [`snapshot`]: PagedCollectionStore::snapshot

mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::actions;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::envelope::Page;
use crate::error::{ApiError, ApiResult};
use crate::models::{Entity, EntityId, ListItem};
use crate::resources::{
    Categories, ListItems, Products, Purchases, Resource, ShoppingLists,
};
use crate::transport::{query_pairs, ApiRequest, Transport};

pub use state::{CollectionState, LoadPhase};

pub type ProductStore = PagedCollectionStore<Products>;
pub type CategoryStore = PagedCollectionStore<Categories>;
pub type ShoppingListStore = PagedCollectionStore<ShoppingLists>;
pub type ListItemStore = PagedCollectionStore<ListItems>;
pub type PurchaseStore = PagedCollectionStore<Purchases>;

/// Client-side controller for one paginated collection
pub struct PagedCollectionStore<R: Resource> {
    resource: R,
    transport: Arc<dyn Transport>,
    page_size: u32,
    state: watch::Sender<CollectionState<R::Item>>,
    /// Bumped by every fetch
    generation: AtomicU64,
}

impl<R: Resource> PagedCollectionStore<R> {
    /// Create an empty store for `resource`
    pub fn new(resource: R, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            resource,
            transport,
            page_size: DEFAULT_PAGE_SIZE,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Use a different page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // ==================== Reactive state ====================

    /// Receive every published state
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<R::Item>> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CollectionState<R::Item> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.state.borrow().items.clone()
    }

    /// Items matching the current search query
    pub fn filtered_items(&self) -> Vec<R::Item> {
        self.state.borrow().filtered_items()
    }

    pub fn current_page(&self) -> u32 {
        self.state.borrow().current_page
    }

    pub fn has_more(&self) -> bool {
        self.state.borrow().has_more
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn loading_more(&self) -> bool {
        self.state.borrow().loading_more
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.borrow().phase()
    }

    pub fn search_query(&self) -> String {
        self.state.borrow().search_query.clone()
    }

    /// Set the client-side search filter
    ///
    /// Only narrows the materialized items; no request is issued.
    pub fn set_search(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_if_modified(|s| {
            if s.search_query == query {
                return false;
            }
            s.search_query = query;
            true
        });
    }

    // ==================== Pagination ====================

    /// Load page 1 for `filter`, replacing the current items
    ///
    /// On failure the items are cleared, `error` carries the user-facing
    /// message and the error is returned as well.
    pub async fn fetch(&self, filter: &R::Filter) -> ApiResult<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.current_page = 1;
            s.has_more = true;
        });
        debug!("Fetching {} (generation {})", self.resource.name(), generation);

        let result = self.request_page(filter, 1).await;

        if self.is_superseded(generation) {
            debug!(
                "Discarding superseded {} fetch (generation {})",
                self.resource.name(),
                generation
            );
            return result.map(|_| ());
        }

        match result {
            Ok(page) => {
                let has_next = page.has_next();
                let name = self.resource.name();
                self.state.send_modify(|s| {
                    let dropped = s.replace_items(page.data);
                    if dropped > 0 {
                        debug!("Dropped {} repeated {} from page 1", dropped, name);
                    }
                    s.has_more = has_next;
                    s.loaded = true;
                    s.loading = false;
                });
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                warn!("Failed to fetch {}: {}", self.resource.name(), err);
                self.state.send_modify(|s| {
                    s.items.clear();
                    s.error = Some(message);
                    s.loaded = false;
                    s.loading = false;
                });
                Err(err)
            }
        }
    }

    /// Append the next page for `filter`
    ///
    /// A no-op unless the store is `Ready` with more pages to load, so rapid
    /// repeated triggers issue at most one request. Failures roll the page
    /// cursor back and are logged, not returned: scrolling again retries.
    ///
    /// Returns whether a request was sent.
    pub async fn load_more(&self, filter: &R::Filter) -> bool {
        let generation = self.generation.load(Ordering::SeqCst);

        let mut next_page = None;
        self.state.send_if_modified(|s| {
            if !s.can_load_more() {
                return false;
            }
            s.loading_more = true;
            s.current_page += 1;
            next_page = Some(s.current_page);
            true
        });

        let Some(page_number) = next_page else {
            debug!("Skipping load more for {}", self.resource.name());
            return false;
        };
        debug!("Loading {} page {}", self.resource.name(), page_number);

        let result = self.request_page(filter, page_number).await;
        let superseded = self.is_superseded(generation);
        let name = self.resource.name();

        self.state.send_modify(|s| {
            s.loading_more = false;
            if superseded {
                debug!("Discarding superseded {} page {}", name, page_number);
                return;
            }
            match result {
                Ok(page) => {
                    let has_next = page.has_next();
                    let skipped = s.append_items(page.data);
                    if skipped > 0 {
                        debug!("Skipped {} {} already loaded", skipped, name);
                    }
                    s.has_more = has_next;
                }
                Err(err) => {
                    warn!("Failed to load {} page {}: {}", name, page_number, err);
                    s.current_page = s.current_page.saturating_sub(1).max(1);
                }
            }
        });
        true
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    async fn request_page(&self, filter: &R::Filter, page: u32) -> ApiResult<Page<R::Item>> {
        let request = ApiRequest::get(self.resource.collection_path())
            .with_query(query_pairs(filter)?)
            .with_param("page", page)
            .with_param("per_page", self.page_size);
        let value = self.transport.request(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    // ==================== Mutations ====================

    /// Fetch a single entity without touching the collection
    pub async fn get(&self, id: EntityId) -> ApiResult<R::Item> {
        let value = self
            .transport
            .request(ApiRequest::get(self.resource.item_path(id)))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Create an entity and put the server's copy first
    pub async fn create(&self, draft: &R::Draft) -> ApiResult<R::Item> {
        let request = ApiRequest::post(self.resource.collection_path()).with_json(draft)?;
        let value = self.transport.request(request).await?;
        let item = self.resource.decode_created(value)?;

        debug!("Created {} {}", self.resource.name(), item.id());
        let created = item.clone();
        self.state.send_modify(|s| s.prepend_item(created));
        Ok(item)
    }

    /// Merge `changes` over an entity, save it and update it in place
    ///
    /// The local copy is used as the base when present, otherwise the entity
    /// is fetched first. If the entity is not among the loaded items the
    /// saved copy is returned but not inserted.
    pub async fn update(&self, id: EntityId, changes: &R::Changes) -> ApiResult<R::Item> {
        let local = self.state.borrow().find(id).cloned();
        let current = match local {
            Some(item) => item,
            None => self.get(id).await?,
        };

        let mut body = to_json(&current)?;
        merge_object(&mut body, to_json(changes)?)?;

        let request = ApiRequest::put(self.resource.item_path(id)).with_body(body.clone());
        let value = self.transport.request(request).await?;

        // Some endpoints answer 204; the merged body is then the saved state
        let updated: R::Item = if value.is_null() {
            serde_json::from_value(body)?
        } else {
            serde_json::from_value(value)?
        };

        self.apply_local(updated.clone());
        Ok(updated)
    }

    /// Delete an entity and drop it from the items
    pub async fn remove(&self, id: EntityId) -> ApiResult<()> {
        self.transport
            .request(ApiRequest::delete(self.resource.item_path(id)))
            .await?;

        let removed = self.state.send_if_modified(|s| s.remove_item(id));
        debug!(
            "Deleted {} {} (was loaded: {})",
            self.resource.name(),
            id,
            removed
        );
        Ok(())
    }

    /// Replace a loaded entity with a newer copy
    ///
    /// Returns false (and changes nothing) when the entity is not loaded.
    pub(crate) fn apply_local(&self, item: R::Item) -> bool {
        let id = item.id();
        let replaced = self.state.send_if_modified(|s| s.replace_item(item));
        if !replaced {
            debug!(
                "Dropping update for {} {} (not loaded)",
                self.resource.name(),
                id
            );
        }
        replaced
    }
}

impl PagedCollectionStore<ListItems> {
    /// Check or uncheck a list item
    pub async fn set_purchased(&self, item_id: EntityId, purchased: bool) -> ApiResult<ListItem> {
        let item = actions::set_purchased(
            self.transport.as_ref(),
            self.resource.list_id,
            item_id,
            purchased,
        )
        .await?;
        self.apply_local(item.clone());
        Ok(item)
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

/// Overwrite the top-level keys of `base` with those of `patch`
fn merge_object(base: &mut Value, patch: Value) -> ApiResult<()> {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            base.extend(patch);
            Ok(())
        }
        (_, Value::Null) => Ok(()),
        _ => Err(ApiError::InvalidRequest(
            "partial update must be a JSON object".to_string(),
        )),
    }
}

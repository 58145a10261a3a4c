//! Infinite-scroll glue
//!
//! A [`LoadMoreTrigger`] sits at the end of a rendered list. Whenever the
//! presentation layer sees it come into view it calls [`on_visible`], which
//! asks the store for the next page if there is one and none is in flight.
//!
//! [`on_visible`]: LoadMoreTrigger::on_visible

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::resources::Resource;
use crate::store::PagedCollectionStore;

pub struct LoadMoreTrigger<R: Resource> {
    store: Arc<PagedCollectionStore<R>>,
    filter: R::Filter,
    connected: AtomicBool,
}

impl<R: Resource> LoadMoreTrigger<R> {
    /// Attach a trigger to `store`; pages are requested with `filter`
    pub fn new(store: Arc<PagedCollectionStore<R>>, filter: R::Filter) -> Self {
        Self {
            store,
            filter,
            connected: AtomicBool::new(true),
        }
    }

    pub fn store(&self) -> &PagedCollectionStore<R> {
        &self.store
    }

    /// Use a new filter for subsequent pages (after a filtered fetch)
    pub fn set_filter(&mut self, filter: R::Filter) {
        self.filter = filter;
    }

    /// The trigger became visible
    ///
    /// Returns true if a load-more request was issued. Nothing is requested
    /// while a first-page fetch is in flight or after it failed.
    pub async fn on_visible(&self) -> bool {
        if !self.is_connected() {
            return false;
        }
        let fired = self.store.load_more(&self.filter).await;
        if fired {
            debug!("Load more trigger fired for {}", self.store.resource().name());
        }
        fired
    }

    /// Stop reacting to visibility
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

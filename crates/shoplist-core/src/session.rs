//! Store construction
//!
//! A [`Session`] holds the transport and page size shared by every store a
//! view creates. Stores are built fresh per scope (one list-item store per
//! shopping list, for example) and are dropped together with their owner.

use std::sync::Arc;

use crate::config::{Config, DEFAULT_PAGE_SIZE};
use crate::error::ApiResult;
use crate::models::EntityId;
use crate::resources::{Categories, ListItems, Products, Purchases, Resource, ShoppingLists};
use crate::store::{
    CategoryStore, ListItemStore, PagedCollectionStore, ProductStore, PurchaseStore,
    ShoppingListStore,
};
use crate::transport::{HttpTransport, Transport};

#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    page_size: u32,
}

impl Session {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Session talking to the configured API over HTTP
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)).with_page_size(config.page_size))
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn store<R: Resource>(&self, resource: R) -> PagedCollectionStore<R> {
        PagedCollectionStore::new(resource, self.transport.clone()).with_page_size(self.page_size)
    }

    pub fn products(&self) -> ProductStore {
        self.store(Products)
    }

    pub fn categories(&self) -> CategoryStore {
        self.store(Categories)
    }

    pub fn shopping_lists(&self) -> ShoppingListStore {
        self.store(ShoppingLists)
    }

    /// Items of one shopping list
    pub fn list_items(&self, list_id: EntityId) -> ListItemStore {
        self.store(ListItems::new(list_id))
    }

    pub fn purchases(&self) -> PurchaseStore {
        self.store(Purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{CategoryFilter, ListItemFilter};
    use crate::test_support::{category_page, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_stores_share_transport_and_page_size() {
        let transport = ScriptedTransport::new();
        let session = Session::new(transport.clone()).with_page_size(5);
        transport.respond_ok(category_page([1, 2], 1, false));
        transport.respond_ok(json!({ "data": [] }));

        let categories = session.categories();
        categories.fetch(&CategoryFilter::default()).await.unwrap();
        let items = session.list_items(8);
        items.fetch(&ListItemFilter::default()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].param("per_page"), Some("5"));
        assert_eq!(requests[1].path, "/api/shopping-lists/8/items");
        assert_eq!(requests[1].param("per_page"), Some("5"));
    }

    #[tokio::test]
    async fn test_stores_are_independent() {
        let transport = ScriptedTransport::new();
        let session = Session::new(transport.clone());
        transport.respond_ok(category_page([1], 1, false));

        let first = session.categories();
        let second = session.categories();
        first.fetch(&CategoryFilter::default()).await.unwrap();

        assert_eq!(first.items().len(), 1);
        assert!(second.items().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            page_size: 20,
            ..Config::default()
        };
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.page_size(), 20);
        assert_eq!(session.products().page_size(), 20);
    }
}

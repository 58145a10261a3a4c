//! REST resources
//!
//! A [`Resource`] describes one paginated collection of the API: where it
//! lives, what it lists, which filters it accepts and what request bodies
//! create and update its entities. [`PagedCollectionStore`] is generic over
//! it, so the five collections share one synchronization engine.
//!
//! [`PagedCollectionStore`]: crate::store::PagedCollectionStore

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiResult;
use crate::models::{
    Category, Entity, EntityId, ListItem, Metadata, Product, Purchase, Searchable, ShoppingList,
};

/// A paginated REST collection
pub trait Resource: Send + Sync + 'static {
    /// Entity listed by the collection
    type Item: Entity
        + Searchable
        + Clone
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    /// Query parameters accepted by the listing endpoint
    type Filter: Serialize + Clone + Default + Send + Sync;
    /// Body sent to create an entity
    type Draft: Serialize + Send + Sync;
    /// Partial update merged over the current entity
    type Changes: Serialize + Send + Sync;

    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Path of the listing endpoint
    fn collection_path(&self) -> String;

    /// Path of a single entity
    fn item_path(&self, id: EntityId) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    /// Decode the body returned by a create call
    fn decode_created(&self, value: Value) -> ApiResult<Self::Item> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Body type for operations a resource does not support
///
/// Uninhabited, so such calls cannot be expressed.
#[derive(Debug, Clone, Serialize)]
pub enum Unsupported {}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// Reference to another entity by id (`{ "id": 3 }`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: EntityId,
}

impl From<EntityId> for IdRef {
    fn from(id: EntityId) -> Self {
        Self { id }
    }
}

// ==================== Categories ====================

/// `/api/categories`
#[derive(Debug, Clone, Copy, Default)]
pub struct Categories;

/// Newest first unless overridden
#[derive(Debug, Clone, Serialize)]
pub struct CategoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            name: None,
            sort_by: Some("createdAt".to_string()),
            order: Some(SortOrder::Desc),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Resource for Categories {
    type Item = Category;
    type Filter = CategoryFilter;
    type Draft = CategoryDraft;
    type Changes = CategoryChanges;

    fn name(&self) -> &'static str {
        "categories"
    }

    fn collection_path(&self) -> String {
        "/api/categories".to_string()
    }
}

// ==================== Products ====================

/// `/api/products`
#[derive(Debug, Clone, Copy, Default)]
pub struct Products;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pantry_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: IdRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pantry_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, category_id: EntityId) -> Self {
        Self {
            name: name.into(),
            category: category_id.into(),
            pantry_id: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pantry_id: Option<EntityId>,
}

impl Resource for Products {
    type Item = Product;
    type Filter = ProductFilter;
    type Draft = ProductDraft;
    type Changes = ProductChanges;

    fn name(&self) -> &'static str {
        "products"
    }

    fn collection_path(&self) -> String {
        "/api/products".to_string()
    }
}

// ==================== Shopping lists ====================

/// `/api/shopping-lists`
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoppingLists;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ShoppingListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Only lists owned by the current user (true) or shared with them (false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub recurring: bool,
}

impl ShoppingListDraft {
    pub fn new(name: impl Into<String>, recurring: bool) -> Self {
        Self {
            name: name.into(),
            description: None,
            recurring,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ShoppingListChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
}

impl Resource for ShoppingLists {
    type Item = ShoppingList;
    type Filter = ShoppingListFilter;
    type Draft = ShoppingListDraft;
    type Changes = ShoppingListChanges;

    fn name(&self) -> &'static str {
        "shopping lists"
    }

    fn collection_path(&self) -> String {
        "/api/shopping-lists".to_string()
    }
}

// ==================== List items ====================

/// `/api/shopping-lists/{list_id}/items`
#[derive(Debug, Clone, Copy)]
pub struct ListItems {
    pub list_id: EntityId,
}

impl ListItems {
    pub fn new(list_id: EntityId) -> Self {
        Self { list_id }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListItemFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListItemDraft {
    pub product: IdRef,
    pub quantity: f64,
    pub unit: String,
}

impl ListItemDraft {
    /// One unit of a product
    pub fn new(product_id: EntityId) -> Self {
        Self {
            product: product_id.into(),
            quantity: 1.0,
            unit: "unit".to_string(),
        }
    }

    pub fn with_quantity(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ListItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Create responses come back either bare or wrapped in `{ "item": ... }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CreatedListItem {
    Wrapped { item: ListItem },
    Bare(ListItem),
}

impl Resource for ListItems {
    type Item = ListItem;
    type Filter = ListItemFilter;
    type Draft = ListItemDraft;
    type Changes = ListItemChanges;

    fn name(&self) -> &'static str {
        "list items"
    }

    fn collection_path(&self) -> String {
        format!("/api/shopping-lists/{}/items", self.list_id)
    }

    fn decode_created(&self, value: Value) -> ApiResult<ListItem> {
        Ok(match serde_json::from_value(value)? {
            CreatedListItem::Wrapped { item } => item,
            CreatedListItem::Bare(item) => item,
        })
    }
}

// ==================== Purchases ====================

/// `/api/purchases`
///
/// Purchases are produced by purchasing a list; they cannot be created or
/// edited directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Purchases;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PurchaseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl Resource for Purchases {
    type Item = Purchase;
    type Filter = PurchaseFilter;
    type Draft = Unsupported;
    type Changes = Unsupported;

    fn name(&self) -> &'static str {
        "purchases"
    }

    fn collection_path(&self) -> String {
        "/api/purchases".to_string()
    }
}

//! Data models for Shoplist
//!
//! Mirrors the JSON payloads of the REST API: categories, products,
//! shopping lists, list items and purchases. Field names are camelCase on
//! the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::units::unit_abbreviation;

/// Server-assigned entity identifier
pub type EntityId = u64;

/// Free-form metadata attached to most entities
pub type Metadata = Map<String, Value>;

/// Anything with a server-assigned id
pub trait Entity {
    fn id(&self) -> EntityId;
}

/// Text fields matched by the client-side search filter
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over all search fields
    ///
    /// An empty query matches everything.
    fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Display name ("Name Surname")
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

/// A product category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            metadata: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A pantry products can be stored in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pantry {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A product in the catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub pantry: Option<Pantry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(id: EntityId, name: impl Into<String>, category: Category) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            pantry: None,
            metadata: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A shopping list, owned by one user and optionally shared
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    #[serde(default)]
    pub shared_with: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchased_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShoppingList {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            recurring: false,
            metadata: None,
            owner: None,
            shared_with: Vec::new(),
            last_purchased_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether anyone besides the owner can see this list
    pub fn is_shared(&self) -> bool {
        !self.shared_with.is_empty()
    }
}

/// A product entry on a shopping list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: EntityId,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub purchased: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchased_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub product: Product,
}

impl ListItem {
    pub fn new(id: EntityId, product: Product, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            id,
            quantity,
            unit: unit.into(),
            purchased: false,
            metadata: None,
            last_purchased_at: None,
            created_at: None,
            updated_at: None,
            product,
        }
    }

    /// Short unit label for display ("Kg", "Lts", ...)
    pub fn unit_label(&self) -> Option<&str> {
        unit_abbreviation(&self.unit)
    }
}

/// A completed purchase of a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,
    pub list: ShoppingList,
    #[serde(default, alias = "listItemArray")]
    pub items: Vec<ListItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(impl Entity for $ty {
            fn id(&self) -> EntityId {
                self.id
            }
        })*
    };
}

impl_entity!(User, Category, Pantry, Product, ShoppingList, ListItem, Purchase);

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Pantry {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.name.as_str()]
    }
}

impl Searchable for ShoppingList {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for ListItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.product.name.as_str(), self.product.category.name.as_str()]
    }
}

impl Searchable for Purchase {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.list.name.as_str()]
    }
}

//! Shoplist Core Library
//!
//! This crate provides the client-side data layer of Shoplist, a shared
//! shopping-list application: a typed REST transport, reactive paginated
//! stores and a few view-model helpers.
//!
//! # Architecture
//!
//! - **Transport**: one async call shape, `request(ApiRequest) -> JSON`
//! - **Stores**: one generic [`PagedCollectionStore`] instantiated for each
//!   of the five collections (products, categories, shopping lists, list
//!   items, purchases)
//!
//! # Quick Start
//!
//! ```text
//! let session = Session::from_config(&Config::load()?)?;
//!
//! // Load the first page of products
//! let products = session.products();
//! products.fetch(&ProductFilter::default()).await?;
//!
//! // Scroll
//! products.load_more(&ProductFilter::default()).await;
//! let items = products.filtered_items();
//! ```
//!
//! # Modules
//!
//! - `store`: Paginated collection stores (main entry point)
//! - `session`: Builds stores that share a transport
//! - `resources`: Endpoint, filter and body types per collection
//! - `models`: REST payloads
//! - `transport`: `Transport` trait and the reqwest implementation
//! - `actions`: List purchase, sharing and restore endpoints
//! - `auth`: Login, logout, registration and profile endpoints
//! - `view`: Infinite-scroll trigger
//! - `units`: Unit abbreviations
//! - `config`: Application configuration

pub mod actions;
pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod resources;
pub mod session;
pub mod store;
pub mod transport;
pub mod units;
pub mod view;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use envelope::{Page, Pagination};
pub use error::{ApiError, ApiResult, FailureClass};
pub use models::{Category, Entity, EntityId, ListItem, Product, Purchase, Searchable, ShoppingList};
pub use session::Session;
pub use store::{CollectionState, LoadPhase, PagedCollectionStore};
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
pub use view::LoadMoreTrigger;

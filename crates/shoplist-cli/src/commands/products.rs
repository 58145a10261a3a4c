//! Product command handlers

use std::sync::Arc;

use anyhow::{Context, Result};

use shoplist_core::resources::{ProductDraft, ProductFilter};
use shoplist_core::{EntityId, Session};

use super::{load, Listing};
use crate::output::Output;

/// List products, optionally filtered server-side by name or category
pub async fn list(
    session: &Session,
    filter: ProductFilter,
    search: Option<String>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let store = Arc::new(session.products());
    let products = load(store.clone(), Listing { filter, search, all }).await?;

    output.print_products(&products);
    output.more_available(store.has_more());
    Ok(())
}

pub async fn create(
    session: &Session,
    name: String,
    category_id: EntityId,
    output: &Output,
) -> Result<()> {
    let product = session
        .products()
        .create(&ProductDraft::new(name, category_id))
        .await
        .context("Failed to create product")?;

    output.success(&format!(
        "Created product {}: {} ({})",
        product.id, product.name, product.category.name
    ));
    Ok(())
}

pub async fn delete(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    session
        .products()
        .remove(id)
        .await
        .with_context(|| format!("Failed to delete product {}", id))?;

    output.success(&format!("Deleted product {}", id));
    Ok(())
}

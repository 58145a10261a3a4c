//! List item command handlers

use std::sync::Arc;

use anyhow::{Context, Result};

use shoplist_core::resources::{ListItemChanges, ListItemDraft, ListItemFilter};
use shoplist_core::{EntityId, Session};

use super::{load, Listing};
use crate::output::Output;

pub async fn list(
    session: &Session,
    list_id: EntityId,
    purchased: Option<bool>,
    search: Option<String>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let store = Arc::new(session.list_items(list_id));
    let filter = ListItemFilter {
        purchased,
        ..Default::default()
    };
    let items = load(store.clone(), Listing { filter, search, all }).await?;

    output.print_items(&items);
    output.more_available(store.has_more());
    Ok(())
}

pub async fn add(
    session: &Session,
    list_id: EntityId,
    product_id: EntityId,
    quantity: f64,
    unit: String,
    output: &Output,
) -> Result<()> {
    let draft = ListItemDraft::new(product_id).with_quantity(quantity, unit);
    let item = session
        .list_items(list_id)
        .create(&draft)
        .await
        .with_context(|| format!("Failed to add product {} to list {}", product_id, list_id))?;

    output.success(&format!(
        "Added {} to list {} (item {})",
        item.product.name, list_id, item.id
    ));
    Ok(())
}

/// Change the quantity (and optionally the unit) of an item
pub async fn quantity(
    session: &Session,
    list_id: EntityId,
    item_id: EntityId,
    quantity: f64,
    unit: Option<String>,
    output: &Output,
) -> Result<()> {
    let changes = ListItemChanges {
        quantity: Some(quantity),
        unit,
    };
    let item = session
        .list_items(list_id)
        .update(item_id, &changes)
        .await
        .with_context(|| format!("Failed to update item {}", item_id))?;

    output.success(&format!(
        "Set {} to {} {}",
        item.product.name,
        item.quantity,
        item.unit_label().unwrap_or_default()
    ));
    Ok(())
}

/// Check or uncheck an item
pub async fn mark(
    session: &Session,
    list_id: EntityId,
    item_id: EntityId,
    purchased: bool,
    output: &Output,
) -> Result<()> {
    let item = session
        .list_items(list_id)
        .set_purchased(item_id, purchased)
        .await
        .with_context(|| format!("Failed to update item {}", item_id))?;

    let verb = if item.purchased { "Checked" } else { "Unchecked" };
    output.success(&format!("{} {}", verb, item.product.name));
    Ok(())
}

pub async fn remove(
    session: &Session,
    list_id: EntityId,
    item_id: EntityId,
    output: &Output,
) -> Result<()> {
    session
        .list_items(list_id)
        .remove(item_id)
        .await
        .with_context(|| format!("Failed to remove item {} from list {}", item_id, list_id))?;

    output.success(&format!("Removed item {} from list {}", item_id, list_id));
    Ok(())
}

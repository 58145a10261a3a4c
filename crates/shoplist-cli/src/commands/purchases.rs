//! Purchase command handlers

use std::sync::Arc;

use anyhow::{Context, Result};

use shoplist_core::actions;
use shoplist_core::resources::PurchaseFilter;
use shoplist_core::{EntityId, Session};

use super::{load, Listing};
use crate::output::Output;

/// List purchases, optionally only those of one list
pub async fn list(
    session: &Session,
    list_id: Option<EntityId>,
    search: Option<String>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let store = Arc::new(session.purchases());
    let filter = PurchaseFilter {
        list_id,
        ..Default::default()
    };
    let purchases = load(store.clone(), Listing { filter, search, all }).await?;

    output.print_purchases(&purchases);
    output.more_available(store.has_more());
    Ok(())
}

/// Recreate a shopping list from a purchase
pub async fn restore(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    let list = actions::restore(session.transport(), id)
        .await
        .with_context(|| format!("Failed to restore purchase {}", id))?;

    output.success(&format!("Restored purchase {} as list {}", id, list.id));
    output.print_list(&list);
    Ok(())
}

//! Shopping list command handlers

use std::sync::Arc;

use anyhow::{Context, Result};

use shoplist_core::actions;
use shoplist_core::resources::{ShoppingListChanges, ShoppingListDraft, ShoppingListFilter};
use shoplist_core::{EntityId, Session};

use super::{load, Listing};
use crate::output::Output;

pub async fn list(
    session: &Session,
    filter: ShoppingListFilter,
    search: Option<String>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let store = Arc::new(session.shopping_lists());
    let lists = load(store.clone(), Listing { filter, search, all }).await?;

    output.print_lists(&lists);
    output.more_available(store.has_more());
    Ok(())
}

/// Show a single list
pub async fn show(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    let list = session
        .shopping_lists()
        .get(id)
        .await
        .with_context(|| format!("Failed to load list {}", id))?;

    output.print_list(&list);
    Ok(())
}

pub async fn create(
    session: &Session,
    name: String,
    description: Option<String>,
    recurring: bool,
    output: &Output,
) -> Result<()> {
    let mut draft = ShoppingListDraft::new(name, recurring);
    draft.description = description;

    let list = session
        .shopping_lists()
        .create(&draft)
        .await
        .context("Failed to create list")?;

    output.success(&format!("Created list {}: {}", list.id, list.name));
    Ok(())
}

pub async fn rename(session: &Session, id: EntityId, name: String, output: &Output) -> Result<()> {
    let changes = ShoppingListChanges {
        name: Some(name),
        ..Default::default()
    };
    let list = session
        .shopping_lists()
        .update(id, &changes)
        .await
        .with_context(|| format!("Failed to rename list {}", id))?;

    output.success(&format!("Renamed list {} to {}", list.id, list.name));
    Ok(())
}

pub async fn delete(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    session
        .shopping_lists()
        .remove(id)
        .await
        .with_context(|| format!("Failed to delete list {}", id))?;

    output.success(&format!("Deleted list {}", id));
    Ok(())
}

/// Record a purchase of the checked items
pub async fn purchase(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    actions::purchase(session.transport(), id)
        .await
        .with_context(|| format!("Failed to purchase list {}", id))?;

    output.success(&format!("Purchased list {}", id));
    Ok(())
}

pub async fn reset(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    actions::reset(session.transport(), id)
        .await
        .with_context(|| format!("Failed to reset list {}", id))?;

    output.success(&format!("Reset list {}", id));
    Ok(())
}

pub async fn move_to_pantry(
    session: &Session,
    id: EntityId,
    pantry_id: EntityId,
    output: &Output,
) -> Result<()> {
    actions::move_to_pantry(session.transport(), id, pantry_id)
        .await
        .with_context(|| format!("Failed to move list {} to pantry {}", id, pantry_id))?;

    output.success(&format!("Moved list {} to pantry {}", id, pantry_id));
    Ok(())
}

pub async fn share(session: &Session, id: EntityId, email: String, output: &Output) -> Result<()> {
    actions::share(session.transport(), id, &email)
        .await
        .with_context(|| format!("Failed to share list {}", id))?;

    output.success(&format!("Shared list {} with {}", id, email));
    Ok(())
}

/// Users the list is shared with
pub async fn shared(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    let users = actions::shared_users(session.transport(), id)
        .await
        .with_context(|| format!("Failed to load users of list {}", id))?;

    output.print_users(&users);
    Ok(())
}

pub async fn revoke(
    session: &Session,
    id: EntityId,
    user_id: EntityId,
    output: &Output,
) -> Result<()> {
    actions::revoke_access(session.transport(), id, user_id)
        .await
        .with_context(|| format!("Failed to revoke access to list {}", id))?;

    output.success(&format!("Revoked access of user {} to list {}", user_id, id));
    Ok(())
}

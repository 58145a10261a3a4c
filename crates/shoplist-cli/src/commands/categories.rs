//! Category command handlers

use std::sync::Arc;

use anyhow::{Context, Result};

use shoplist_core::resources::{CategoryChanges, CategoryDraft, CategoryFilter};
use shoplist_core::{EntityId, Session};

use super::{load, Listing};
use crate::output::Output;

/// List categories
pub async fn list(
    session: &Session,
    name: Option<String>,
    search: Option<String>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let store = Arc::new(session.categories());
    let filter = CategoryFilter {
        name,
        ..Default::default()
    };
    let categories = load(store.clone(), Listing { filter, search, all }).await?;

    output.print_categories(&categories);
    output.more_available(store.has_more());
    Ok(())
}

pub async fn create(session: &Session, name: String, output: &Output) -> Result<()> {
    let store = session.categories();
    let category = store
        .create(&CategoryDraft::new(name))
        .await
        .context("Failed to create category")?;

    output.success(&format!("Created category {}: {}", category.id, category.name));
    Ok(())
}

pub async fn rename(session: &Session, id: EntityId, name: String, output: &Output) -> Result<()> {
    let store = session.categories();
    let changes = CategoryChanges {
        name: Some(name),
        ..Default::default()
    };
    let category = store
        .update(id, &changes)
        .await
        .with_context(|| format!("Failed to rename category {}", id))?;

    output.success(&format!("Renamed category {} to {}", category.id, category.name));
    Ok(())
}

pub async fn delete(session: &Session, id: EntityId, output: &Output) -> Result<()> {
    session
        .categories()
        .remove(id)
        .await
        .with_context(|| format!("Failed to delete category {}", id))?;

    output.success(&format!("Deleted category {}", id));
    Ok(())
}

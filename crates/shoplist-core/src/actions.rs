//! Endpoints outside the paged collections
//!
//! Purchasing, resetting and sharing a list, restoring a purchase and
//! checking off list items. These act on a single entity and do not touch
//! any store; callers re-fetch what they display.

use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiResult;
use crate::models::{EntityId, ListItem, ShoppingList, User};
use crate::resources::{ListItems, Purchases, Resource, ShoppingLists};
use crate::transport::{ApiRequest, Transport};

fn list_path(list_id: EntityId, action: &str) -> String {
    format!("{}/{}", ShoppingLists.item_path(list_id), action)
}

/// Record a purchase of every checked item on the list
pub async fn purchase(transport: &dyn Transport, list_id: EntityId) -> ApiResult<()> {
    debug!("Purchasing shopping list {}", list_id);
    transport
        .request(ApiRequest::post(list_path(list_id, "purchase")))
        .await?;
    Ok(())
}

/// Uncheck every item on the list
pub async fn reset(transport: &dyn Transport, list_id: EntityId) -> ApiResult<()> {
    debug!("Resetting shopping list {}", list_id);
    transport
        .request(ApiRequest::post(list_path(list_id, "reset")))
        .await?;
    Ok(())
}

/// Move the list's products into a pantry
pub async fn move_to_pantry(
    transport: &dyn Transport,
    list_id: EntityId,
    pantry_id: EntityId,
) -> ApiResult<()> {
    let request = ApiRequest::post(list_path(list_id, "move-to-pantry"))
        .with_body(json!({ "pantry_id": pantry_id }));
    transport.request(request).await?;
    Ok(())
}

/// Share a list with another user by email
pub async fn share(transport: &dyn Transport, list_id: EntityId, email: &str) -> ApiResult<()> {
    let request = ApiRequest::post(list_path(list_id, "share")).with_body(json!({ "email": email }));
    transport.request(request).await?;
    Ok(())
}

/// Users a list is shared with
pub async fn shared_users(transport: &dyn Transport, list_id: EntityId) -> ApiResult<Vec<User>> {
    let value = transport
        .request(ApiRequest::get(list_path(list_id, "shared-users")))
        .await?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}

pub async fn revoke_access(
    transport: &dyn Transport,
    list_id: EntityId,
    user_id: EntityId,
) -> ApiResult<()> {
    let path = format!("{}/{}", list_path(list_id, "share"), user_id);
    transport.request(ApiRequest::delete(path)).await?;
    Ok(())
}

/// Turn a purchase back into a shopping list
pub async fn restore(transport: &dyn Transport, purchase_id: EntityId) -> ApiResult<ShoppingList> {
    let path = format!("{}/restore", Purchases.item_path(purchase_id));
    let value: Value = transport.request(ApiRequest::post(path)).await?;
    Ok(serde_json::from_value(value)?)
}

/// Check or uncheck a list item
pub async fn set_purchased(
    transport: &dyn Transport,
    list_id: EntityId,
    item_id: EntityId,
    purchased: bool,
) -> ApiResult<ListItem> {
    let path = ListItems::new(list_id).item_path(item_id);
    let request = ApiRequest::patch(path).with_body(json!({ "purchased": purchased }));
    let value = transport.request(request).await?;
    Ok(serde_json::from_value(value)?)
}

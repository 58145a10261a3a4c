//! In-memory transport for tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, Transport};

struct Scripted {
    result: ApiResult<Value>,
    release: Option<Arc<Notify>>,
}

/// Replays queued responses in order and records every request
///
/// A gated response is held until its release handle is notified, which
/// keeps the call in flight while a test pokes at the store.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
    token: Mutex<Option<String>>,
    /// Signalled only when a gated response is reached
    gated_started: Notify,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, result: ApiResult<Value>) {
        self.push(result, None);
    }

    pub fn respond_ok(&self, value: Value) {
        self.respond(Ok(value));
    }

    pub fn respond_err(&self, err: ApiError) {
        self.respond(Err(err));
    }

    /// Queue a response that is held until the returned handle is notified
    pub fn respond_gated(&self, result: ApiResult<Value>) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.push(result, Some(release.clone()));
        release
    }

    fn push(&self, result: ApiResult<Value>, release: Option<Arc<Notify>>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Scripted { result, release });
    }

    /// Wait until the request answered by a gated response has arrived
    pub async fn request_started(&self) {
        self.gated_started.notified().await;
    }

    /// Token last handed to the transport
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: ApiRequest) -> ApiResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.responses.lock().unwrap().pop_front();

        let Some(scripted) = scripted else {
            panic!("unexpected request: {} {}", request.method, request.path);
        };
        if let Some(release) = scripted.release {
            self.gated_started.notify_one();
            release.notified().await;
        }
        scripted.result
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

/// Category JSON with a predictable name
pub(crate) fn category_json(id: u64) -> Value {
    json!({ "id": id, "name": format!("Category {}", id) })
}

/// A listing page of categories
pub(crate) fn category_page(ids: impl IntoIterator<Item = u64>, page: u32, has_next: bool) -> Value {
    let data: Vec<Value> = ids.into_iter().map(category_json).collect();
    json!({
        "data": data,
        "pagination": {
            "page": page,
            "per_page": 10,
            "total": 0,
            "total_pages": 0,
            "has_prev": page > 1,
            "has_next": has_next
        }
    })
}

pub(crate) fn product_json(id: u64, name: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": { "id": id + 100, "name": category },
        "pantry": null
    })
}

pub(crate) fn list_item_json(id: u64, product: &str, purchased: bool) -> Value {
    json!({
        "id": id,
        "quantity": 1,
        "unit": "unit",
        "purchased": purchased,
        "product": product_json(id + 1000, product, "Almacen")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_request_started_waits_for_gated_request() {
        let transport = ScriptedTransport::new();
        transport.respond_ok(Value::Null);
        let release = transport.respond_gated(Ok(json!({ "ok": true })));

        transport.request(ApiRequest::get("/first")).await.unwrap();

        // An ungated request leaves nothing to wake on
        let early =
            tokio::time::timeout(Duration::from_millis(20), transport.request_started()).await;
        assert!(early.is_err());

        let (result, _) = tokio::join!(transport.request(ApiRequest::get("/second")), async {
            transport.request_started().await;
            assert_eq!(transport.request_count(), 2);
            assert_eq!(transport.last_request().path, "/second");
            release.notify_one();
        });
        assert_eq!(result.unwrap(), json!({ "ok": true }));
    }
}

//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use super::QueryParams;
use super::Transport;
use crate::error::ApiError;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub path: String,
    pub params: QueryParams,
    pub body: Option<serde_json::Value>,
}

/// Replays queued responses in order; an empty queue answers `{"data": []}`.
#[derive(Default)]
pub(crate) struct FakeTransport {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every request waits for a `notify_one` on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            gate: Some(gate),
            ..Self::default()
        })
    }

    pub fn push_ok(&self, body: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn push_err(&self, err: ApiError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn respond(&self, call: Call) -> Result<serde_json::Value, Error> {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(err)) => Err(err.into()),
            None => Ok(json!({"data": []})),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<serde_json::Value, Error> {
        self.respond(Call {
            method: "GET",
            path: path.to_string(),
            params: params.clone(),
            body: None,
        })
        .await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value, Error> {
        self.respond(Call {
            method: "POST",
            path: path.to_string(),
            params: QueryParams::new(),
            body: Some(body.clone()),
        })
        .await
    }

    async fn put(&self, path: &str, body: &serde_json::Value) -> Result<serde_json::Value, Error> {
        self.respond(Call {
            method: "PUT",
            path: path.to_string(),
            params: QueryParams::new(),
            body: Some(body.clone()),
        })
        .await
    }

    async fn delete(&self, path: &str) -> Result<serde_json::Value, Error> {
        self.respond(Call {
            method: "DELETE",
            path: path.to_string(),
            params: QueryParams::new(),
            body: None,
        })
        .await
    }
}

/// One page of `{id, name}` rows in the paginated envelope.
pub(crate) fn page_body(ids: &[i64], current_page: usize, last_page: usize) -> serde_json::Value {
    let data: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("row {id}")}))
        .collect();
    json!({
        "data": data,
        "meta": {
            "current_page": current_page,
            "per_page": ids.len().max(1),
            "total": ids.len() * last_page,
            "last_page": last_page,
        }
    })
}

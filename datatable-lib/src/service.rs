//! CRUD over one REST resource
//!
//! Record operations backing a table's create, edit and delete dialogs:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | `fetch`   | `GET {resource}?{params}` |
//! | `get`     | `GET {resource}/{id}` |
//! | `create`  | `POST {resource}` |
//! | `update`  | `PUT {resource}` with the full record, id included |
//! | `delete`  | `DELETE {resource}/{id}` |

use std::fmt::Display;
use std::sync::Arc;

use crate::error::ApiError;
use crate::error::Error;
use crate::fetch::ListResponse;
use crate::model::Item;
use crate::transport::QueryParams;
use crate::transport::Transport;

/// Record operations on a resource path such as `/api/users`.
///
/// # Example
///
/// ```ignore
/// let users = ResourceService::new(Arc::new(client), "api/users");
/// assert_eq!(users.resource(), "/api/users");
///
/// let page = users.fetch(&QueryParams::new().with("page", 1)).await?;
/// let created = users.create(&Item::new().set("name", "Ada")).await?;
/// users.delete(7).await?;
/// ```
#[derive(Clone)]
pub struct ResourceService {
    transport: Arc<dyn Transport>,
    resource: String,
}

impl ResourceService {
    /// Creates a service; the path gets a leading `/` if it lacks one.
    pub fn new(transport: Arc<dyn Transport>, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        let resource = if resource.starts_with('/') {
            resource
        } else {
            format!("/{resource}")
        };
        Self { transport, resource }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn record_path(&self, id: impl Display) -> String {
        format!("{}/{}", self.resource.trim_end_matches('/'), id)
    }

    /// Lists records.
    pub async fn fetch(&self, params: &QueryParams) -> Result<ListResponse, Error> {
        let body = self.transport.get(&self.resource, params).await?;
        Ok(ListResponse::parse(body)?)
    }

    /// Retrieves one record.
    pub async fn get(&self, id: impl Display) -> Result<Item, Error> {
        let path = self.record_path(id);
        let body = self.transport.get(&path, &QueryParams::new()).await?;
        record(body)?.ok_or_else(|| ApiError::parse(format!("empty response for {path}")).into())
    }

    /// Creates a record and returns it as echoed by the server, if it was.
    pub async fn create(&self, item: &Item) -> Result<Option<Item>, Error> {
        log::debug!("Creating record in {}", self.resource);
        let body = self.transport.post(&self.resource, &to_json(item)?).await?;
        record(body)
    }

    /// Replaces a record. The record travels in the body, id included.
    pub async fn update(&self, item: &Item) -> Result<Option<Item>, Error> {
        log::debug!("Updating record in {}", self.resource);
        let body = self.transport.put(&self.resource, &to_json(item)?).await?;
        record(body)
    }

    pub async fn delete(&self, id: impl Display) -> Result<(), Error> {
        let path = self.record_path(id);
        log::debug!("Deleting {}", path);
        self.transport.delete(&path).await?;
        Ok(())
    }
}

fn to_json(item: &Item) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(item).map_err(|e| ApiError::parse(format!("cannot encode record: {e}")))
}

/// Decodes a single-record body: `{data: {...}}`, a bare object, or empty.
fn record(body: serde_json::Value) -> Result<Option<Item>, Error> {
    let body = match body {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(data @ serde_json::Value::Object(_)) => data,
            Some(other) => {
                map.insert("data".to_string(), other);
                serde_json::Value::Object(map)
            }
            None => serde_json::Value::Object(map),
        },
        other => {
            return Err(ApiError::parse(format!("expected a record, got {other}")).into());
        }
    };

    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| ApiError::parse(format!("invalid record: {e}")).into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Value;
    use crate::transport::fake::FakeTransport;
    use crate::transport::fake::page_body;

    #[test]
    fn test_resource_path_normalized() {
        let transport = FakeTransport::new();
        assert_eq!(ResourceService::new(transport.clone(), "api/users").resource(), "/api/users");
        assert_eq!(ResourceService::new(transport, "/api/users").resource(), "/api/users");
    }

    #[tokio::test]
    async fn test_fetch_sends_params() {
        let transport = FakeTransport::new();
        transport.push_ok(page_body(&[1, 2], 1, 1));
        let service = ResourceService::new(transport.clone(), "users");

        let page = service
            .fetch(&QueryParams::new().with("q", "ada"))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        let call = &transport.calls()[0];
        assert_eq!((call.method, call.path.as_str()), ("GET", "/users"));
        assert_eq!(call.params.get("q"), Some(&Value::from("ada")));
    }

    #[tokio::test]
    async fn test_get_unwraps_data_envelope() {
        let transport = FakeTransport::new();
        transport.push_ok(json!({"data": {"id": 7, "name": "Ada"}}));
        transport.push_ok(json!({"id": 8, "name": "Grace"}));
        let service = ResourceService::new(transport.clone(), "/users");

        let ada = service.get(7).await.unwrap();
        assert_eq!(ada.get_string("name").unwrap(), Some("Ada"));
        let grace = service.get("8").await.unwrap();
        assert_eq!(grace.get_int("id").unwrap(), Some(8));

        let paths: Vec<_> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["/users/7", "/users/8"]);
    }

    #[tokio::test]
    async fn test_writes() {
        let transport = FakeTransport::new();
        transport.push_ok(json!({"data": {"id": 1, "name": "Ada"}}));
        transport.push_ok(serde_json::Value::Null);
        transport.push_ok(serde_json::Value::Null);
        let service = ResourceService::new(transport.clone(), "/users");
        let item = Item::new().set("id", 1i64).set("name", "Ada");

        let created = service.create(&Item::new().set("name", "Ada")).await.unwrap();
        assert_eq!(created, Some(item.clone()));
        assert_eq!(service.update(&item).await.unwrap(), None);
        service.delete(1).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].body, Some(json!({"name": "Ada"})));
        assert_eq!((calls[1].method, calls[1].path.as_str()), ("PUT", "/users"));
        assert_eq!(calls[1].body, Some(json!({"id": 1, "name": "Ada"})));
        assert_eq!((calls[2].method, calls[2].path.as_str()), ("DELETE", "/users/1"));
    }

    #[tokio::test]
    async fn test_errors_propagate() {
        let transport = FakeTransport::new();
        transport.push_err(ApiError::from_body(404, r#"{"message": "No such user"}"#));
        let service = ResourceService::new(transport, "/users");

        let err = service.get(99).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.server_message(), Some("No such user"));
    }

    #[test]
    fn test_record_rejects_non_objects() {
        assert!(record(json!([1, 2])).is_err());
        assert_eq!(record(json!({"data": 5})).unwrap().unwrap().get("data"), Some(&Value::Int(5)));
    }
}

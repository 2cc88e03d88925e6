//! Firestore REST v1 client.
//!
//! Speaks the documented REST surface directly (GET / PATCH with an update
//! mask / POST), mapping HTTP outcomes onto the [`StoreError`] taxonomy:
//! 401/403 are policy denials, 404 is absence, 400 is a payload rejection,
//! and everything else (transport errors, 429, 5xx) is transient.
//!
//! Marker payloads are flat JSON objects of scalars; that is all the
//! auditor ever writes, and it keeps the Firestore value mapping small.

use serde_json::{Value, json};

use crate::error::{Result, StoreError};
use crate::store::{Document, DocumentStore};
use async_trait::async_trait;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

/// Firestore-backed `DocumentStore`.
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl FirestoreStore {
    /// Create a client for the given project's `(default)` database.
    ///
    /// `token` is an OAuth2 bearer token (or a Firebase ID token); `None`
    /// sends unauthenticated requests, which is itself a useful audit
    /// subject.
    pub fn new(project_id: impl Into<String>, token: Option<String>) -> Self {
        let base_url = format!(
            "{FIRESTORE_HOST}/projects/{}/databases/(default)/documents",
            project_id.into()
        );
        Self {
            client: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_document(response: reqwest::Response) -> Result<Document> {
        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Transient(format!("response parse failed: {e}")))?;
        Ok(document_from_body(&body))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get_document(&self, path: &str) -> Result<Document> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }
        Self::decode_document(response).await
    }

    async fn get_one_from_collection(&self, path: &str) -> Result<Option<Document>> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .query(&[("pageSize", "1")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Transient(format!("response parse failed: {e}")))?;
        Ok(body
            .get("documents")
            .and_then(Value::as_array)
            .and_then(|docs| docs.first())
            .map(document_from_body))
    }

    async fn merge_document(&self, path: &str, payload: &Value) -> Result<()> {
        tracing::debug!(path, "merge marker payload");
        let fields = to_firestore_fields(payload)?;
        let response = self
            .authorize(self.client.patch(self.url(path)))
            .query(&update_mask(payload)?)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }
        Ok(())
    }

    async fn append_to_collection(&self, path: &str, payload: &Value) -> Result<String> {
        let fields = to_firestore_fields(payload)?;
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }
        Ok(Self::decode_document(response).await?.id)
    }

    async fn list_documents(&self, path: &str, limit: usize) -> Result<Vec<Document>> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .query(&[("pageSize", limit.to_string())])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(path, response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Transient(format!("response parse failed: {e}")))?;
        Ok(body
            .get("documents")
            .and_then(Value::as_array)
            .map(|docs| docs.iter().map(document_from_body).collect())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "firestore"
    }
}

/// Map an HTTP error response onto the store taxonomy.
async fn error_from_response(path: &str, response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = firestore_error_message(&body).unwrap_or_else(|| status.to_string());

    match status.as_u16() {
        401 | 403 => StoreError::PermissionDenied(detail),
        404 => StoreError::NotFound(format!("{path}: {detail}")),
        400 => StoreError::Validation(detail),
        _ => StoreError::Transient(format!("HTTP {}: {detail}", status.as_u16())),
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transient("timeout".to_string())
    } else {
        StoreError::Transient(err.to_string())
    }
}

/// Extract `error.message` from a Firestore error body.
fn firestore_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}

/// Build a `Document` from a Firestore document resource.
fn document_from_body(body: &Value) -> Document {
    let id = body
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .unwrap_or_default()
        .to_string();
    let fields = body.get("fields").cloned().unwrap_or_else(|| json!({}));
    Document { id, fields }
}

/// Repeated `updateMask.fieldPaths` query pairs for a merge payload.
///
/// The mask restricts the PATCH to exactly the marker fields, which is what
/// makes the write non-destructive.
fn update_mask(payload: &Value) -> Result<Vec<(&'static str, String)>> {
    let Value::Object(map) = payload else {
        return Err(StoreError::Validation(
            "merge payload must be an object".to_string(),
        ));
    };
    Ok(map
        .keys()
        .map(|key| ("updateMask.fieldPaths", key.clone()))
        .collect())
}

/// Convert a flat JSON object into Firestore's typed field encoding.
fn to_firestore_fields(payload: &Value) -> Result<Value> {
    let Value::Object(map) = payload else {
        return Err(StoreError::Validation(
            "merge payload must be an object".to_string(),
        ));
    };
    let mut fields = serde_json::Map::new();
    for (key, value) in map {
        fields.insert(key.clone(), to_firestore_value(value)?);
    }
    Ok(Value::Object(fields))
}

fn to_firestore_value(value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(json!({ "nullValue": null })),
        Value::Bool(b) => Ok(json!({ "booleanValue": b })),
        // Firestore encodes 64-bit integers as strings.
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            Ok(json!({ "integerValue": n.to_string() }))
        }
        Value::Number(n) => Ok(json!({ "doubleValue": n.as_f64() })),
        Value::String(s) => Ok(json!({ "stringValue": s })),
        Value::Array(_) | Value::Object(_) => Err(StoreError::Validation(
            "marker payloads must be flat scalars".to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================

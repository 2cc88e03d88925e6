//! Rule-driven in-memory document store.
//!
//! Backs unit tests across the workspace and the CLI's `--offline` dry
//! runs. Access decisions come from a flat rule table matched by path
//! prefix and operation; documents live in a `BTreeMap` so listings are
//! deterministic.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use sonde_core::Operation;

use crate::error::{Result, StoreError};
use crate::store::{Document, DocumentStore};

/// What the store does with an operation that matches a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Perform the operation.
    Allow,
    /// Reject with `PermissionDenied`.
    Deny,
    /// Reject with `Transient` (simulates a network failure).
    Fail,
}

/// One access rule: first match wins, in table order.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Path prefix the rule applies to (`users/` matches `users/alice`).
    pub prefix: String,
    /// Operation the rule applies to; `None` matches both.
    pub operation: Option<Operation>,
    /// Decision for matching operations.
    pub decision: Decision,
}

impl Rule {
    /// Create a rule matching both operations.
    pub fn any(prefix: impl Into<String>, decision: Decision) -> Self {
        Self {
            prefix: prefix.into(),
            operation: None,
            decision,
        }
    }

    /// Create a rule matching a single operation.
    pub fn only(prefix: impl Into<String>, operation: Operation, decision: Decision) -> Self {
        Self {
            prefix: prefix.into(),
            operation: Some(operation),
            decision,
        }
    }

    fn matches(&self, path: &str, operation: Operation) -> bool {
        path.starts_with(&self.prefix)
            && self.operation.map(|op| op == operation).unwrap_or(true)
    }
}

/// In-memory `DocumentStore` with a declarative access-rule table.
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, Value>>,
    rules: Vec<Rule>,
    default_decision: Decision,
}

impl MemoryStore {
    /// A store that permits everything.
    pub fn allow_all() -> Self {
        Self::with_rules(Decision::Allow, Vec::new())
    }

    /// A store that denies everything with `PermissionDenied`.
    pub fn deny_all() -> Self {
        Self::with_rules(Decision::Deny, Vec::new())
    }

    /// A store where every operation fails transiently.
    pub fn failing() -> Self {
        Self::with_rules(Decision::Fail, Vec::new())
    }

    /// A store with an explicit rule table and default decision.
    pub fn with_rules(default_decision: Decision, rules: Vec<Rule>) -> Self {
        Self {
            docs: Mutex::new(BTreeMap::new()),
            rules,
            default_decision,
        }
    }

    /// Seed a document, bypassing access rules. Test setup helper.
    pub fn seed(&self, path: impl Into<String>, fields: Value) {
        self.lock_docs().insert(path.into(), fields);
    }

    /// Fetch a document's fields, bypassing access rules. Test assertion
    /// helper.
    pub fn stored(&self, path: &str) -> Option<Value> {
        self.lock_docs().get(path).cloned()
    }

    /// Number of stored documents, bypassing access rules.
    pub fn len(&self) -> usize {
        self.lock_docs().len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.lock_docs().is_empty()
    }

    fn lock_docs(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        // A poisoned lock only means a test panicked mid-write; the map is
        // still usable.
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn decide(&self, path: &str, operation: Operation) -> Result<()> {
        let decision = self
            .rules
            .iter()
            .find(|rule| rule.matches(path, operation))
            .map(|rule| rule.decision)
            .unwrap_or(self.default_decision);

        match decision {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(StoreError::PermissionDenied(format!(
                "denied by rule for '{path}'"
            ))),
            Decision::Fail => Err(StoreError::Transient(format!(
                "injected transient failure for '{path}'"
            ))),
        }
    }

    fn first_child(docs: &BTreeMap<String, Value>, collection: &str) -> Option<Document> {
        let prefix = format!("{collection}/");
        docs.iter()
            .find(|(path, _)| {
                path.strip_prefix(&prefix)
                    .map(|rest| !rest.contains('/'))
                    .unwrap_or(false)
            })
            .map(|(path, fields)| Document {
                id: path.rsplit('/').next().unwrap_or(path).to_string(),
                fields: fields.clone(),
            })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, path: &str) -> Result<Document> {
        self.decide(path, Operation::Read)?;
        let docs = self.lock_docs();
        let fields = docs
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(Document {
            id: path.rsplit('/').next().unwrap_or(path).to_string(),
            fields,
        })
    }

    async fn get_one_from_collection(&self, path: &str) -> Result<Option<Document>> {
        self.decide(path, Operation::Read)?;
        Ok(Self::first_child(&self.lock_docs(), path))
    }

    async fn merge_document(&self, path: &str, payload: &Value) -> Result<()> {
        self.decide(path, Operation::Write)?;
        let mut docs = self.lock_docs();
        match docs.get_mut(path) {
            Some(Value::Object(existing)) => {
                if let Value::Object(incoming) = payload {
                    for (key, value) in incoming {
                        existing.insert(key.clone(), value.clone());
                    }
                } else {
                    return Err(StoreError::Validation(
                        "merge payload must be an object".to_string(),
                    ));
                }
            }
            _ => {
                docs.insert(path.to_string(), payload.clone());
            }
        }
        Ok(())
    }

    async fn append_to_collection(&self, path: &str, payload: &Value) -> Result<String> {
        self.decide(path, Operation::Write)?;
        let id = Uuid::new_v4().to_string();
        self.lock_docs()
            .insert(format!("{path}/{id}"), payload.clone());
        Ok(id)
    }

    async fn list_documents(&self, path: &str, limit: usize) -> Result<Vec<Document>> {
        self.decide(path, Operation::Read)?;
        let prefix = format!("{path}/");
        let docs = self.lock_docs();
        Ok(docs
            .iter()
            .filter(|(doc_path, _)| {
                doc_path
                    .strip_prefix(&prefix)
                    .map(|rest| !rest.contains('/'))
                    .unwrap_or(false)
            })
            .take(limit)
            .map(|(doc_path, fields)| Document {
                id: doc_path.rsplit('/').next().unwrap_or(doc_path).to_string(),
                fields: fields.clone(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_allow_all_roundtrip() {
        let store = MemoryStore::allow_all();
        store.seed("users/alice", json!({"bio": "hello"}));

        let doc = store.get_document("users/alice").await.unwrap();
        assert_eq!(doc.id, "alice");
        assert_eq!(doc.fields, json!({"bio": "hello"}));
    }

    #[tokio::test]
    async fn test_get_missing_document_is_not_found() {
        let store = MemoryStore::allow_all();
        let err = store.get_document("users/ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deny_all_rejects_reads_and_writes() {
        let store = MemoryStore::deny_all();
        store.seed("users/alice", json!({}));

        let read = store.get_document("users/alice").await.unwrap_err();
        assert!(matches!(read, StoreError::PermissionDenied(_)));

        let write = store
            .merge_document("users/alice", &json!({"probe": true}))
            .await
            .unwrap_err();
        assert!(matches!(write, StoreError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_failing_store_is_transient() {
        let store = MemoryStore::failing();
        let err = store.get_document("users/alice").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_rule_table_first_match_wins() {
        let store = MemoryStore::with_rules(
            Decision::Deny,
            vec![
                Rule::only("users/alice", Operation::Read, Decision::Allow),
                Rule::any("users/", Decision::Deny),
            ],
        );
        store.seed("users/alice", json!({}));
        store.seed("users/bob", json!({}));

        assert!(store.get_document("users/alice").await.is_ok());
        assert!(store.get_document("users/bob").await.is_err());
        // The allow rule is read-only; writes fall through to the deny rule.
        assert!(
            store
                .merge_document("users/alice", &json!({"probe": true}))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_merge_preserves_existing_fields() {
        let store = MemoryStore::allow_all();
        store.seed("users/alice", json!({"bio": "hello", "age": 30}));

        store
            .merge_document("users/alice", &json!({"probe": true}))
            .await
            .unwrap();

        assert_eq!(
            store.stored("users/alice").unwrap(),
            json!({"bio": "hello", "age": 30, "probe": true})
        );
    }

    #[tokio::test]
    async fn test_merge_creates_missing_document() {
        let store = MemoryStore::allow_all();
        store
            .merge_document("audit/marker", &json!({"probe": true}))
            .await
            .unwrap();
        assert_eq!(store.stored("audit/marker").unwrap(), json!({"probe": true}));
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let store = MemoryStore::allow_all();
        let payload = json!({"probe": true, "run": "r1"});

        store.merge_document("users/alice", &payload).await.unwrap();
        store.merge_document("users/alice", &payload).await.unwrap();

        assert_eq!(store.stored("users/alice").unwrap(), payload);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_append_assigns_fresh_ids() {
        let store = MemoryStore::allow_all();
        let first = store
            .append_to_collection("reports", &json!({"n": 1}))
            .await
            .unwrap();
        let second = store
            .append_to_collection("reports", &json!({"n": 2}))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_get_one_from_collection() {
        let store = MemoryStore::allow_all();
        assert!(
            store
                .get_one_from_collection("users")
                .await
                .unwrap()
                .is_none()
        );

        store.seed("users/alice", json!({}));
        let doc = store.get_one_from_collection("users").await.unwrap();
        assert_eq!(doc.unwrap().id, "alice");
    }

    #[tokio::test]
    async fn test_list_documents_is_bounded_and_direct_children_only() {
        let store = MemoryStore::allow_all();
        for name in ["alice", "bob", "carol"] {
            store.seed(format!("users/{name}"), json!({}));
        }
        store.seed("users/alice/photos/p1", json!({}));

        let docs = store.list_documents("users", 2).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| !d.id.contains('/')));
    }
}

//! Subject context resolution.
//!
//! Cross-user probes need two identities: `self` (the authenticated
//! identity running the audit) and `foreign` (some other user's id). The
//! resolver samples a small page of existing user records and picks the
//! first id that differs from `self`; when none exists, or when the
//! sampling call itself fails, it substitutes a sentinel id guaranteed not
//! to collide with a real record. The auditor never aborts because
//! sampling failed; that only weakens the realism of foreign probes.

use serde::{Deserialize, Serialize};

use sonde_store::DocumentStore;

use crate::error::{Error, Result};

/// Fallback foreign id used when no other user record can be sampled.
pub const SENTINEL_FOREIGN_ID: &str = "__sonde_nonexistent__";

/// How many user records to sample when picking a foreign subject.
const SAMPLE_PAGE_SIZE: usize = 5;

/// The pair of identities a run probes with. Created fresh at the start of
/// each audit run and discarded after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectContext {
    /// The authenticated identity running the audit.
    pub self_id: String,
    /// A sampled cross-user identity (or [`SENTINEL_FOREIGN_ID`]).
    pub foreign_id: String,
}

impl SubjectContext {
    /// Build a context from known identifiers.
    pub fn new(self_id: impl Into<String>, foreign_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            foreign_id: foreign_id.into(),
        }
    }

    /// Resolve a context by sampling `users_path` for a foreign subject.
    ///
    /// # Errors
    ///
    /// Only [`Error::MissingSubject`], when `self_id` is empty. Sampling
    /// failures degrade to the sentinel foreign id with a warning.
    pub async fn resolve(
        store: &dyn DocumentStore,
        users_path: &str,
        self_id: &str,
    ) -> Result<Self> {
        if self_id.is_empty() {
            return Err(Error::MissingSubject);
        }

        let foreign_id = match store.list_documents(users_path, SAMPLE_PAGE_SIZE).await {
            Ok(docs) => docs.into_iter().map(|doc| doc.id).find(|id| id != self_id),
            Err(err) => {
                tracing::warn!(%err, users_path, "subject sampling failed; using sentinel foreign id");
                None
            }
        };

        Ok(Self {
            self_id: self_id.to_string(),
            foreign_id: foreign_id.unwrap_or_else(|| SENTINEL_FOREIGN_ID.to_string()),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

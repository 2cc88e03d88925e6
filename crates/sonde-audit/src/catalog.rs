//! The probe catalog.
//!
//! A catalog is an ordered, immutable list of [`ProbeSpec`]s with unique
//! ids. The built-in catalog covers the access boundaries of a
//! profile/matching/chat data layout: own vs. foreign documents, browsable
//! vs. private collections, and moderator/admin-only surfaces. Custom
//! catalogs load from TOML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use sonde_core::{Operation, ProbeSpec, TargetKind};

use crate::error::{Error, Result};

/// An ordered set of probe specs with catalog-unique ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    probes: Vec<ProbeSpec>,
}

impl Catalog {
    /// Build a catalog, validating id uniqueness.
    pub fn new(probes: Vec<ProbeSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &probes {
            if !seen.insert(spec.id.as_str()) {
                return Err(Error::DuplicateProbeId {
                    id: spec.id.clone(),
                });
            }
        }
        Ok(Self { probes })
    }

    /// Parse a catalog from TOML.
    ///
    /// Format: a `[[probes]]` table per spec, fields as in [`ProbeSpec`].
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let parsed: Catalog = toml::from_str(raw)?;
        Self::new(parsed.probes)
    }

    /// Load a catalog from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// The probes, in catalog order.
    pub fn probes(&self) -> &[ProbeSpec] {
        &self.probes
    }

    /// Number of probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether the catalog holds no probes.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        use Operation::{Read, Write};
        use TargetKind::{Collection, Document};

        let probes = vec![
            ProbeSpec::new(
                "own-profile-read",
                "Read own profile",
                "users/{self}",
                Read,
                Document,
                true,
                "a user can always read their own profile document",
            ),
            ProbeSpec::new(
                "own-profile-write",
                "Update own profile",
                "users/{self}",
                Write,
                Document,
                true,
                "a user can edit their own profile document",
            ),
            ProbeSpec::new(
                "foreign-profile-read",
                "Read another user's profile",
                "users/{foreign}",
                Read,
                Document,
                true,
                "browsing other profiles is the product; profile documents are readable",
            ),
            ProbeSpec::new(
                "foreign-profile-write",
                "Update another user's profile",
                "users/{foreign}",
                Write,
                Document,
                false,
                "nobody may edit a profile they do not own",
            ),
            ProbeSpec::new(
                "profiles-browse",
                "Browse the profile collection",
                "users",
                Read,
                Collection,
                true,
                "listing profiles backs the browsing surface",
            ),
            ProbeSpec::new(
                "own-preferences-read",
                "Read own preferences",
                "user_preferences/{self}",
                Read,
                Document,
                true,
                "a user can read their own matching preferences",
            ),
            ProbeSpec::new(
                "foreign-preferences-read",
                "Read another user's preferences",
                "user_preferences/{foreign}",
                Read,
                Document,
                false,
                "matching preferences are private to their owner",
            ),
            ProbeSpec::new(
                "foreign-likes-read",
                "Read another user's likes",
                "likes/{foreign}",
                Read,
                Document,
                false,
                "who liked whom is never exposed cross-user",
            ),
            ProbeSpec::new(
                "matches-browse",
                "Browse the match collection",
                "matches",
                Read,
                Collection,
                false,
                "match records are per-pair; the collection is not browsable",
            ),
            ProbeSpec::new(
                "report-file",
                "File a moderation report",
                "reports",
                Write,
                Collection,
                true,
                "any signed-in user may file a report",
            ),
            ProbeSpec::new(
                "reports-browse",
                "Browse moderation reports",
                "reports",
                Read,
                Collection,
                false,
                "reports are visible to moderators only",
            ),
            ProbeSpec::new(
                "own-verification-write",
                "Submit own verification request",
                "verification_requests/{self}",
                Write,
                Document,
                true,
                "a user may create or update their own verification request",
            ),
            ProbeSpec::new(
                "foreign-verification-write",
                "Submit verification for another user",
                "verification_requests/{foreign}",
                Write,
                Document,
                false,
                "verification requests cannot be filed on someone else's behalf",
            ),
            ProbeSpec::new(
                "admin-settings-read",
                "Read admin settings",
                "admin_settings",
                Read,
                Collection,
                false,
                "admin configuration is not readable from the client",
            ),
            ProbeSpec::new(
                "admin-settings-write",
                "Write admin settings",
                "admin_settings/global",
                Write,
                Document,
                false,
                "admin configuration is not writable from the client",
            ),
        ];

        // Ids above are unique by construction; keep the invariant checked
        // in tests.
        Self { probes }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique() {
        let builtin = Catalog::builtin();
        assert!(!builtin.is_empty());
        assert!(Catalog::new(builtin.probes().to_vec()).is_ok());
    }

    #[test]
    fn test_builtin_covers_both_operations_and_kinds() {
        let builtin = Catalog::builtin();
        assert!(
            builtin
                .probes()
                .iter()
                .any(|p| p.operation == Operation::Write && p.target_kind == TargetKind::Collection)
        );
        assert!(
            builtin
                .probes()
                .iter()
                .any(|p| p.operation == Operation::Read && p.target_kind == TargetKind::Document)
        );
        assert!(builtin.probes().iter().any(|p| !p.expected_allowed));
        assert!(builtin.probes().iter().any(|p| p.expected_allowed));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let spec = ProbeSpec::new(
            "dup",
            "Duplicate",
            "users/{self}",
            Operation::Read,
            TargetKind::Document,
            true,
            "",
        );
        let err = Catalog::new(vec![spec.clone(), spec]).unwrap_err();
        assert!(matches!(err, Error::DuplicateProbeId { ref id } if id == "dup"));
    }

    #[test]
    fn test_from_toml_str() {
        let raw = r#"
            [[probes]]
            id = "own-read"
            name = "Read own document"
            path = "users/{self}"
            operation = "read"
            target_kind = "document"
            expected_allowed = true
            description = "owners can read"

            [[probes]]
            id = "admin-write"
            name = "Write admin config"
            path = "admin_settings/global"
            operation = "write"
            target_kind = "document"
            expected_allowed = false
            description = "clients cannot write admin config"
        "#;

        let catalog = Catalog::from_toml_str(raw).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.probes()[0].operation, Operation::Read);
        assert_eq!(catalog.probes()[1].target_kind, TargetKind::Document);
        assert!(!catalog.probes()[1].expected_allowed);
    }

    #[test]
    fn test_from_toml_str_duplicate_ids_rejected() {
        let raw = r#"
            [[probes]]
            id = "x"
            name = "a"
            path = "a"
            operation = "read"
            target_kind = "document"
            expected_allowed = true
            description = ""

            [[probes]]
            id = "x"
            name = "b"
            path = "b"
            operation = "read"
            target_kind = "document"
            expected_allowed = true
            description = ""
        "#;
        assert!(matches!(
            Catalog::from_toml_str(raw),
            Err(Error::DuplicateProbeId { .. })
        ));
    }

    #[test]
    fn test_from_toml_str_rejects_malformed() {
        assert!(matches!(
            Catalog::from_toml_str("probes = 3"),
            Err(Error::CatalogParse(_))
        ));
    }
}

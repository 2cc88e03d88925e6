//! Path template resolution.
//!
//! Probe paths are templates that may reference the two subject
//! placeholders, `{self}` and `{foreign}`, substituted from the run's
//! subject context. Resolution fails closed: a template that still contains
//! any `{...}` placeholder after substitution is rejected rather than
//! probed as if it were a meaningful path.

use crate::error::{Error, Result};

/// Placeholder for the authenticated identity running the audit.
pub const SELF_PLACEHOLDER: &str = "{self}";

/// Placeholder for the sampled cross-user identity.
pub const FOREIGN_PLACEHOLDER: &str = "{foreign}";

/// Substitute subject identifiers into a path template.
///
/// # Examples
///
/// ```
/// use sonde_core::path::resolve_path;
///
/// assert_eq!(
///     resolve_path("users/{self}", "alice", "bob").unwrap(),
///     "users/alice"
/// );
/// assert_eq!(
///     resolve_path("users/{foreign}/photos", "alice", "bob").unwrap(),
///     "users/bob/photos"
/// );
/// assert!(resolve_path("users/{other}", "alice", "bob").is_err());
/// ```
pub fn resolve_path(template: &str, self_id: &str, foreign_id: &str) -> Result<String> {
    for (placeholder, id) in [
        (SELF_PLACEHOLDER, self_id),
        (FOREIGN_PLACEHOLDER, foreign_id),
    ] {
        if template.contains(placeholder) && id.is_empty() {
            return Err(Error::EmptyIdentifier {
                placeholder: placeholder.to_string(),
            });
        }
    }

    let resolved = template
        .replace(SELF_PLACEHOLDER, self_id)
        .replace(FOREIGN_PLACEHOLDER, foreign_id);

    if let Some(placeholder) = unresolved_placeholder(&resolved) {
        return Err(Error::UnresolvedPlaceholder {
            placeholder: placeholder.to_string(),
            template: template.to_string(),
        });
    }

    Ok(resolved)
}

/// Find the first placeholder remaining in a resolved path, if any.
///
/// An opening brace with no closing brace still counts: anything
/// brace-shaped in a resolved path means the template was not fully
/// resolved.
pub fn unresolved_placeholder(path: &str) -> Option<&str> {
    let start = path.find('{')?;
    match path[start..].find('}') {
        Some(offset) => Some(&path[start..=start + offset]),
        None => Some(&path[start..]),
    }
}

//! Error types for sonde-core

use thiserror::Error;

/// Result type alias for sonde-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the shared probe model.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A path template still contains a placeholder after substitution.
    ///
    /// Probes with unresolved placeholders fail closed: the path is never
    /// sent to the store as if it were meaningful.
    #[error("unresolved placeholder '{placeholder}' in path template '{template}'")]
    UnresolvedPlaceholder {
        /// The placeholder that survived substitution (e.g. `{other}`).
        placeholder: String,
        /// The original template the placeholder came from.
        template: String,
    },

    /// A placeholder would be substituted with an empty identifier.
    #[error("empty identifier for placeholder '{placeholder}'")]
    EmptyIdentifier {
        /// The placeholder whose substitution value was empty.
        placeholder: String,
    },
}

use miette::Diagnostic;
use thiserror::Error;

/// Failure produced by a [`FromSeed`](super::FromSeed) constructor.
///
/// Carries a human-readable message and, optionally, the underlying cause.
/// The resolver wraps it in [`ResolveError::Construction`] together with the
/// type and seed that were attempted.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(seedweave::resolver::constructor))]
pub struct ConstructionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConstructionError {
    /// A construction failure with just a message.
    pub fn msg<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Errors surfaced to the host framework by
/// [`SeedResolver`](super::SeedResolver).
///
/// All variants are synchronous and terminal for the failing resolution; the
/// resolver never retries, and a failed resolution leaves the invocation
/// cache untouched.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// The declared parameter type was never registered with the resolver.
    #[error("no seeded factory registered for type {type_name}")]
    #[diagnostic(
        code(seedweave::resolver::unsupported_type),
        help("Register the type with SeedResolver::register before resolving it.")
    )]
    UnsupportedType { type_name: String },

    /// The registered factory failed; identifies the type and the seed that
    /// was attempted so the failure can be replayed.
    #[error("failed to construct {type_name} with seed {seed}")]
    #[diagnostic(code(seedweave::resolver::construction))]
    Construction {
        type_name: &'static str,
        seed: i64,
        #[source]
        source: ConstructionError,
    },

    /// The cached entry for this slot was resolved as a different type
    /// earlier in the same invocation.
    #[error("cache entry {key} does not hold an instance of {type_name}")]
    #[diagnostic(
        code(seedweave::resolver::cache_type_mismatch),
        help("Each parameter slot must use one declared type for the whole invocation.")
    )]
    CacheTypeMismatch {
        key: String,
        type_name: &'static str,
    },
}

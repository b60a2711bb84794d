// SPDX-License-Identifier: MIT
//! Entity layer errors.
//!
//! A closed error-kind enumeration carried alongside its cause. The
//! layer never retries; every failure is returned to the immediate
//! caller with enough structure for the serving layer to choose a
//! response. Zero-result lookups are not errors - they surface as
//! empty results or `None`.

use tessera_store::StoreError;
use thiserror::Error;

/// Errors produced by the codec, mutation and lookup engines.
#[derive(Debug, Error)]
pub enum EntityError {
    /// A property value cannot become a graph value, or a property key
    /// collides with a reserved predicate. Caller input problem.
    #[error("unable to encode property: {0}")]
    PropertyEncoding(String),

    /// A quad list handed to a decode did not share one subject.
    /// Indicates quads from more than one entity, or a store read bug.
    #[error("quads are not all from the same entity: expected {expected}, found {found}")]
    InconsistentSubject {
        /// Subject of the first quad seen.
        expected: String,
        /// The differing subject.
        found: String,
    },

    /// A relation identifier quad's subject is not a valid JSON
    /// encoding of a relation quad. Data corruption.
    #[error("malformed relation subject: {0}")]
    MalformedRelationSubject(#[source] serde_json::Error),

    /// A store operation failed. Infrastructure problem; not retried.
    #[error("store operation '{operation}' failed: {source}")]
    Store {
        /// The logical operation that was being applied.
        operation: &'static str,
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },
}

impl From<tessera_quad::CoercionError> for EntityError {
    fn from(err: tessera_quad::CoercionError) -> Self {
        Self::PropertyEncoding(err.to_string())
    }
}

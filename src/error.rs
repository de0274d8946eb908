//! Error types for shape and query construction.
//!
//! The collision queries themselves never fail; they always produce a result, even when it is
//! imprecise. Errors are only reported when a shape or a query configuration is built from
//! unusable input.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A query setting is out of its valid range.
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSettings {
        name: &'static str,
        reason: &'static str,
    },

    /// A shape dimension is negative or not finite.
    #[error("invalid dimension `{name}` = {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    /// A convex hull was built from an empty point set.
    #[error("convex hull requires at least one point")]
    EmptyHull,

    /// Input contained NaN or infinite components.
    #[error("non-finite input: {0}")]
    NonFiniteInput(&'static str),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

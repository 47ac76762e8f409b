use nova_types::TypeParseError;
use thiserror::Error;

use crate::hierarchy::TypeId;

/// Failures while assembling a [`crate::TypeHierarchyIndex`].
///
/// These indicate malformed input from name resolution rather than Java-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("unknown type `{name}` referenced from `{referenced_from}`")]
    UnknownType {
        name: String,
        referenced_from: String,
    },
    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),
    #[error("`{supertype}` cannot be used as {expected} of `{ty}`")]
    IllegalSupertype {
        ty: String,
        supertype: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Parse(#[from] TypeParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The id was not produced by the index being queried.
    #[error("unknown type id {0:?}")]
    UnknownType(TypeId),
    /// The type is on, or inherits from, a hierarchy cycle.
    #[error("type {0:?} has a cyclic hierarchy")]
    CyclicHierarchy(TypeId),
}

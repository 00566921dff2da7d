//! Errors produced by the annotation modeler.
//!
//! The source system walks its model with runtime reflection, so several of its error
//! variants (`NilLiteralModelError`, `NonPointerModelError`, `NilModelError`,
//! `NonStructPointerModelError`) exist to guard against a caller passing a nil or
//! non-struct-pointer value where reflection expected a populatable record. Rust's
//! ownership and type system reject those shapes at compile time — `populate` always
//! takes `&mut T` for a concrete, live `T` — so the equivalent variants below
//! (`NilInput`, `NonReferenceInput`, `NilReference`, `NonRecordTarget`) are kept for
//! parity with the original error taxonomy but are structurally unreachable; only
//! `Validation` and `UnsupportedType` (and `ParseInt`, the concrete form of the
//! coercion rule's inline "ParseError") can actually be constructed.

use thiserror::Error;

/// Annotation modeling error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A nil literal was passed where a populatable model was expected.
    #[error("cannot populate a nil literal from the annotation map")]
    NilInput,

    /// Something other than a reference to a model was supplied.
    #[error("cannot populate non-reference input")]
    NonReferenceInput,

    /// A reference to a model pointed at nothing.
    #[error("cannot populate through a nil reference")]
    NilReference,

    /// The target of population was not a record (struct) type.
    #[error("cannot populate non-record target {0}")]
    NonRecordTarget(&'static str),

    /// An annotation value failed its field's constraint regex (strict mode only).
    #[error("field \"{field}\" value \"{value}\" does not satisfy constraint /{constraint}/")]
    Validation {
        field: String,
        constraint: String,
        value: String,
    },

    /// A field's declared coercion has no defined behavior for its type.
    #[error("unsupported type for field \"{field}\": {kind}")]
    UnsupportedType { field: String, kind: &'static str },

    /// Integer coercion failed to parse the annotation value.
    #[error("field \"{field}\" value \"{value}\" is not a valid integer")]
    ParseInt { field: String, value: String },
}

/// Annotation modeler result alias
pub type Result<T> = std::result::Result<T, ModelError>;

//! Annotation Modeler
//!
//! Translates a flat `key -> string` annotation map into typed, validated fields of
//! the config model (see `crate::model`). See `modeler` for the shared field-table
//! machinery and `constraint` for the precompiled per-field regexes.

pub mod constraint;
pub mod error;
pub mod modeler;

pub use error::{ModelError, Result};
pub use modeler::{apply_fields, coerce_bool, coerce_int, coerce_mapping, coerce_sequence, FieldSpec, Mode};

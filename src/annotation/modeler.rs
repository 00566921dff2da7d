//! Generic plumbing shared by every per-struct `populate_*` function: key
//! composition, constraint checking, and the five coercion rules.
//!
//! The source system drives this with runtime reflection over a single generic
//! walk. Rust has no such reflection, so each populatable struct gets its own
//! hand-written `populate_*` function (see `model::*`) built from a static table of
//! `FieldSpec`s for its leaf fields, recursing manually into nested sub-records —
//! design option (b) named in the design notes: "a hand-written visitor per record
//! keyed off a table {fieldTag, constraint, setter, coercer}". This module is the
//! shared machinery that table-driven walk is built on.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ModelError, Result};

/// Constraint-violation handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Log and keep the field's current value.
    Warn,
    /// Fail the whole populate call.
    Strict,
}

/// One field's modeling metadata: its dotted-path tag, optional constraint, and the
/// closure that coerces and assigns a matched raw string onto the target.
pub struct FieldSpec<T> {
    pub tag: &'static str,
    pub constraint: Option<&'static Lazy<Regex>>,
    pub assign: fn(&mut T, &str) -> Result<()>,
}

/// Compose the annotation key for a leaf field, omitting the `/` when `prefix` is
/// empty and the context segment when `context` is empty.
pub fn compose_key(prefix: &str, context: &str, tag: &str) -> String {
    match (prefix.is_empty(), context.is_empty()) {
        (true, true) => tag.to_string(),
        (true, false) => format!("{context}.{tag}"),
        (false, true) => format!("{prefix}/{tag}"),
        (false, false) => format!("{prefix}/{context}.{tag}"),
    }
}

/// Extend a dotted context with a nested record's own field tag.
pub fn extend_context(context: &str, tag: &str) -> String {
    if context.is_empty() {
        tag.to_string()
    } else {
        format!("{context}.{tag}")
    }
}

/// Apply every leaf field spec in `specs` to `target`, looking values up in `data`
/// under `prefix`/`context`.
pub fn apply_fields<T>(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut T,
    specs: &[FieldSpec<T>],
) -> Result<()> {
    for spec in specs {
        let key = compose_key(prefix, context, spec.tag);
        let raw = match data.get(&key) {
            Some(raw) => raw,
            None => continue,
        };

        if let Some(constraint) = spec.constraint {
            if !constraint.is_match(raw) {
                match mode {
                    Mode::Warn => {
                        log::warn!(
                            "annotation \"{key}\" = \"{raw}\" does not satisfy its constraint; keeping default"
                        );
                        continue;
                    }
                    Mode::Strict => {
                        return Err(ModelError::Validation {
                            field: key,
                            constraint: constraint.as_str().to_string(),
                            value: raw.clone(),
                        });
                    }
                }
            }
        }

        (spec.assign)(target, raw)?;
    }
    Ok(())
}

/// Parse a boolean annotation value (`true|false`, case-insensitive).
pub fn coerce_bool(field: &str, raw: &str) -> Result<bool> {
    raw.to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|_| ModelError::UnsupportedType {
            field: field.to_string(),
            kind: "bool",
        })
}

/// Parse an integer annotation value, reporting overflow/invalid input as `ParseInt`.
pub fn coerce_int(field: &str, raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| ModelError::ParseInt {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Split a comma-separated list, trimming whitespace around every element.
pub fn coerce_sequence(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Split a comma-separated list of `key:value` pairs, trimming both sides of each.
pub fn coerce_mapping(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (k, v) = pair.split_once(':')?;
            Some((k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

//! HSTS sub-configuration.

use std::collections::HashMap;

use crate::annotation::{apply_fields, coerce_bool, constraint, FieldSpec, Mode, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HstsConfig {
    pub enabled: bool,
    /// Positive integer seconds, kept as a string since that is what the modeler
    /// validates and the template substitutes verbatim.
    pub max_age: String,
    pub include_subdomains: bool,
    pub preload: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_age: "15768000".to_string(),
            include_subdomains: false,
            preload: false,
        }
    }
}

static FIELDS: &[FieldSpec<HstsConfig>] = &[
    FieldSpec {
        tag: "enabled",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.enabled = coerce_bool("ssl.hsts.enabled", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "maxAge",
        constraint: Some(&constraint::POSITIVE_INT),
        assign: |t, raw| {
            t.max_age = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "includeSubDomains",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.include_subdomains = coerce_bool("ssl.hsts.includeSubDomains", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "preload",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.preload = coerce_bool("ssl.hsts.preload", raw)?;
            Ok(())
        },
    },
];

/// Whether any HSTS-scoped annotation key is present in `data`, used by `SslConfig`
/// to decide whether a per-app SSL override was actually supplied.
pub fn is_present(data: &HashMap<String, String>, prefix: &str, context: &str) -> bool {
    FIELDS
        .iter()
        .any(|spec| data.contains_key(&crate::annotation::modeler::compose_key(prefix, context, spec.tag)))
}

pub fn populate(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut HstsConfig,
) -> Result<()> {
    apply_fields(data, prefix, context, mode, target, FIELDS)
}

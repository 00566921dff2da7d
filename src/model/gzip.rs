//! Gzip sub-configuration.

use std::collections::HashMap;

use crate::annotation::{apply_fields, coerce_bool, constraint, FieldSpec, Mode, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipConfig {
    pub enabled: bool,
    /// 1-9
    pub comp_level: String,
    pub disable: String,
    /// "1.0" | "1.1"
    pub http_version: String,
    pub min_length: String,
    pub proxied: String,
    pub types: String,
    /// "on" | "off"
    pub vary: String,
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            comp_level: "5".to_string(),
            disable: "msie6".to_string(),
            http_version: "1.1".to_string(),
            min_length: "256".to_string(),
            proxied: "any".to_string(),
            types: "application/atom+xml application/javascript application/json \
                    application/rss+xml application/vnd.ms-fontobject application/x-font-ttf \
                    application/x-web-app-manifest+json application/xhtml+xml application/xml \
                    font/opentype image/svg+xml image/x-icon text/css text/plain \
                    text/x-component"
                .to_string(),
            vary: "on".to_string(),
        }
    }
}

static FIELDS: &[FieldSpec<GzipConfig>] = &[
    FieldSpec {
        tag: "enabled",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.enabled = coerce_bool("gzip.enabled", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "compLevel",
        constraint: Some(&constraint::GZIP_COMP_LEVEL),
        assign: |t, raw| {
            t.comp_level = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "disable",
        constraint: None,
        assign: |t, raw| {
            t.disable = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "httpVersion",
        constraint: Some(&constraint::HTTP_VERSION),
        assign: |t, raw| {
            t.http_version = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "minLength",
        constraint: Some(&constraint::POSITIVE_INT),
        assign: |t, raw| {
            t.min_length = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "proxied",
        constraint: None,
        assign: |t, raw| {
            t.proxied = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "types",
        constraint: None,
        assign: |t, raw| {
            t.types = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "vary",
        constraint: Some(&constraint::ON_OFF),
        assign: |t, raw| {
            t.vary = raw.to_string();
            Ok(())
        },
    },
];

pub fn populate(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut GzipConfig,
) -> Result<()> {
    apply_fields(data, prefix, context, mode, target, FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let gzip = GzipConfig::default();
        assert_eq!(gzip.comp_level, "5");
        assert_eq!(gzip.min_length, "256");
        assert_eq!(gzip.vary, "on");
    }

    #[test]
    fn invalid_comp_level_is_rejected_in_strict_mode() {
        let mut data = HashMap::new();
        data.insert("router.deis.io/nginx.gzip.compLevel".to_string(), "15".to_string());
        let mut gzip = GzipConfig::default();
        let err = populate(&data, "router.deis.io", "nginx.gzip", Mode::Strict, &mut gzip).unwrap_err();
        assert!(matches!(err, crate::annotation::ModelError::Validation { .. }));
    }

    #[test]
    fn invalid_comp_level_keeps_default_in_warn_mode() {
        let mut data = HashMap::new();
        data.insert("router.deis.io/nginx.gzip.compLevel".to_string(), "15".to_string());
        let mut gzip = GzipConfig::default();
        populate(&data, "router.deis.io", "nginx.gzip", Mode::Warn, &mut gzip).unwrap();
        assert_eq!(gzip.comp_level, "5");
    }
}

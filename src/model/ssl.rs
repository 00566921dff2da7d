//! SSL/TLS sub-configuration.

use std::collections::HashMap;

use crate::annotation::modeler::compose_key;
use crate::annotation::{apply_fields, coerce_bool, constraint, FieldSpec, Mode, Result};

use super::hsts::{self, HstsConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslConfig {
    pub enforce: bool,
    pub protocols: String,
    pub ciphers: String,
    pub session_cache: String,
    pub session_timeout: String,
    pub use_session_tickets: bool,
    pub buffer_size: String,
    pub hsts: HstsConfig,
    /// Raw DH parameters blob; empty means "unset". Populated from the DH-param
    /// secret during assembly, never from annotations.
    pub dh_param: String,
}

impl Default for SslConfig {
    fn default() -> Self {
        Self {
            enforce: false,
            protocols: "TLSv1.2".to_string(),
            ciphers: "ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:\
                      ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384"
                .to_string(),
            session_cache: "shared:SSL:10m".to_string(),
            session_timeout: "10m".to_string(),
            use_session_tickets: false,
            buffer_size: "4k".to_string(),
            hsts: HstsConfig::default(),
            dh_param: String::new(),
        }
    }
}

static FIELDS: &[FieldSpec<SslConfig>] = &[
    FieldSpec {
        tag: "enforce",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.enforce = coerce_bool("ssl.enforce", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "protocols",
        constraint: Some(&constraint::SSL_PROTOCOLS),
        assign: |t, raw| {
            t.protocols = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "ciphers",
        constraint: None,
        assign: |t, raw| {
            t.ciphers = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "sessionCache",
        constraint: None,
        assign: |t, raw| {
            t.session_cache = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "sessionTimeout",
        constraint: Some(&constraint::DURATION),
        assign: |t, raw| {
            t.session_timeout = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "useSessionTickets",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.use_session_tickets = coerce_bool("ssl.useSessionTickets", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "bufferSize",
        constraint: Some(&constraint::SIZE),
        assign: |t, raw| {
            t.buffer_size = raw.to_string();
            Ok(())
        },
    },
];

/// Whether any SSL- or HSTS-scoped annotation key is present under `context`. Used
/// to decide whether an `AppConfig` actually carries a per-app SSL override, since
/// the modeler's unconditional-recursion contract would otherwise always attach a
/// (possibly all-default) `SslConfig` to every app.
pub fn is_present(data: &HashMap<String, String>, prefix: &str, context: &str) -> bool {
    let own = FIELDS
        .iter()
        .any(|spec| data.contains_key(&compose_key(prefix, context, spec.tag)));
    own || hsts::is_present(data, prefix, &crate::annotation::modeler::extend_context(context, "hsts"))
}

pub fn populate(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut SslConfig,
) -> Result<()> {
    apply_fields(data, prefix, context, mode, target, FIELDS)?;
    let hsts_ctx = crate::annotation::modeler::extend_context(context, "hsts");
    hsts::populate(data, prefix, &hsts_ctx, mode, &mut target.hsts)
}

//! Per-application (per-routable-service) configuration.

use std::collections::HashMap;

use crate::annotation::modeler::extend_context;
use crate::annotation::{apply_fields, coerce_bool, coerce_mapping, coerce_sequence, constraint, FieldSpec, Mode, Result};

use super::certificate::Certificate;
use super::ssl::{self, SslConfig};
use super::RouterConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `namespace/label` (or just `label` when it equals the namespace), derived at
    /// assembly time — never populated from annotations.
    pub name: String,
    pub domains: Vec<String>,
    pub whitelist: Vec<String>,
    pub connect_timeout: String,
    pub tcp_timeout: String,
    /// Filled from the service's cluster IP during assembly.
    pub service_ip: String,
    /// domain -> cert secret alias.
    pub cert_mapping: HashMap<String, String>,
    /// domain -> resolved certificate, or `None` when no certificate applies.
    pub certificates: HashMap<String, Option<Certificate>>,
    /// Whether the backend service currently has at least one ready endpoint.
    pub available: bool,
    pub maintenance: bool,
    /// Per-app SSL override; `None` unless the app's own annotations touch any
    /// `ssl.*` key (see `ssl::is_present`).
    pub ssl: Option<SslConfig>,
}

impl AppConfig {
    /// `TCPTimeout` defaults to `RouterConfig.DefaultTimeout` as observed at
    /// construction time (invariant 5), not a fixed literal.
    pub fn new(router: &RouterConfig) -> Self {
        Self {
            name: String::new(),
            domains: Vec::new(),
            whitelist: Vec::new(),
            connect_timeout: "30s".to_string(),
            tcp_timeout: router.default_timeout.clone(),
            service_ip: String::new(),
            cert_mapping: HashMap::new(),
            certificates: HashMap::new(),
            available: false,
            maintenance: false,
            ssl: None,
        }
    }
}

static FIELDS: &[FieldSpec<AppConfig>] = &[
    FieldSpec {
        tag: "domains",
        constraint: None,
        assign: |t, raw| {
            t.domains = coerce_sequence(raw);
            Ok(())
        },
    },
    FieldSpec {
        tag: "whitelist",
        constraint: Some(&constraint::CIDR_LIST),
        assign: |t, raw| {
            t.whitelist = coerce_sequence(raw);
            Ok(())
        },
    },
    FieldSpec {
        tag: "connectTimeout",
        constraint: Some(&constraint::DURATION),
        assign: |t, raw| {
            t.connect_timeout = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "tcpTimeout",
        constraint: Some(&constraint::DURATION),
        assign: |t, raw| {
            t.tcp_timeout = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "certMapping",
        constraint: None,
        assign: |t, raw| {
            t.cert_mapping = coerce_mapping(raw).into_iter().collect();
            Ok(())
        },
    },
    FieldSpec {
        tag: "maintenance",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.maintenance = coerce_bool("maintenance", raw)?;
            Ok(())
        },
    },
];

/// Populate `target` from `data` under `context` (empty for app-scoped annotations,
/// per the modeler contract), then attach a per-app SSL override if, and only if,
/// the app's annotations actually touch an `ssl.*` key.
pub fn populate(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut AppConfig,
) -> Result<()> {
    apply_fields(data, prefix, context, mode, target, FIELDS)?;

    let ssl_ctx = extend_context(context, "ssl");
    if ssl::is_present(data, prefix, &ssl_ctx) {
        let mut override_ssl = SslConfig::default();
        ssl::populate(data, prefix, &ssl_ctx, mode, &mut override_ssl)?;
        target.ssl = Some(override_ssl);
    }
    Ok(())
}

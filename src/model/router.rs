//! Router-wide configuration: the root of the config model.

use std::collections::HashMap;
use std::str::FromStr;

use crate::annotation::{apply_fields, coerce_bool, coerce_sequence, constraint, FieldSpec, Mode, Result};

use super::certificate::Certificate;
use super::gzip::{self, GzipConfig};
use super::ssl::{self, SslConfig};
use super::{AppConfig, BuilderConfig};

/// Whether a per-app whitelist extends or replaces the router-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistMode {
    Extend,
    Override,
}

impl Default for WhitelistMode {
    fn default() -> Self {
        WhitelistMode::Extend
    }
}

impl FromStr for WhitelistMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "extend" => Ok(WhitelistMode::Extend),
            "override" => Ok(WhitelistMode::Override),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub worker_processes: String,
    pub max_worker_connections: String,
    pub traffic_status_zone_size: String,
    pub default_timeout: String,
    pub server_name_hash_max_size: String,
    pub server_name_hash_bucket_size: String,
    pub gzip: GzipConfig,
    pub body_size: String,
    pub proxy_real_ip_cidr: Vec<String>,
    pub error_log_level: String,
    pub platform_domain: String,
    pub use_proxy_protocol: bool,
    pub disable_server_tokens: bool,
    pub enforce_whitelists: bool,
    pub default_whitelist: Vec<String>,
    pub whitelist_mode: WhitelistMode,
    pub default_service_ip: String,
    pub default_service_name: String,
    pub default_service_enabled: bool,
    pub request_ids: bool,
    pub ssl: SslConfig,
    pub http2: bool,
    pub log_format: String,
    pub app_configs: Vec<AppConfig>,
    pub builder_config: Option<BuilderConfig>,
    pub platform_certificate: Option<Certificate>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            worker_processes: "auto".to_string(),
            max_worker_connections: "768".to_string(),
            traffic_status_zone_size: "10m".to_string(),
            default_timeout: "1300s".to_string(),
            server_name_hash_max_size: "512".to_string(),
            server_name_hash_bucket_size: "64".to_string(),
            gzip: GzipConfig::default(),
            body_size: "1".to_string(),
            proxy_real_ip_cidr: vec!["10.0.0.0/8".to_string()],
            error_log_level: "error".to_string(),
            platform_domain: String::new(),
            use_proxy_protocol: false,
            disable_server_tokens: true,
            enforce_whitelists: false,
            default_whitelist: Vec::new(),
            whitelist_mode: WhitelistMode::Extend,
            default_service_ip: String::new(),
            default_service_name: String::new(),
            default_service_enabled: false,
            request_ids: false,
            ssl: SslConfig::default(),
            http2: true,
            log_format: "[$time_local] - $remote_addr - $remote_user - $status - \"$request\" - \
                         $bytes_sent - \"$http_referer\" - \"$http_user_agent\" - \"$server_name\" \
                         - $upstream_addr - $http_host - $upstream_response_time - $request_time"
                .to_string(),
            app_configs: Vec::new(),
            builder_config: None,
            platform_certificate: None,
        }
    }
}

static FIELDS: &[FieldSpec<RouterConfig>] = &[
    FieldSpec {
        tag: "workerProcesses",
        constraint: Some(&constraint::WORKER_PROCESSES),
        assign: |t, raw| {
            t.worker_processes = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "maxWorkerConnections",
        constraint: Some(&constraint::POSITIVE_INT),
        assign: |t, raw| {
            t.max_worker_connections = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "trafficStatusZoneSize",
        constraint: Some(&constraint::SIZE),
        assign: |t, raw| {
            t.traffic_status_zone_size = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "defaultTimeout",
        constraint: Some(&constraint::DURATION),
        assign: |t, raw| {
            t.default_timeout = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "serverNameHashMaxSize",
        constraint: Some(&constraint::POSITIVE_INT),
        assign: |t, raw| {
            t.server_name_hash_max_size = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "serverNameHashBucketSize",
        constraint: Some(&constraint::POSITIVE_INT),
        assign: |t, raw| {
            t.server_name_hash_bucket_size = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "bodySize",
        constraint: Some(&constraint::POSITIVE_INT),
        assign: |t, raw| {
            t.body_size = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "proxyRealIpCidr",
        constraint: Some(&constraint::CIDR_LIST),
        assign: |t, raw| {
            t.proxy_real_ip_cidr = coerce_sequence(raw);
            Ok(())
        },
    },
    FieldSpec {
        tag: "errorLogLevel",
        constraint: Some(&constraint::ERROR_LOG_LEVEL),
        assign: |t, raw| {
            t.error_log_level = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "domain",
        constraint: None,
        assign: |t, raw| {
            t.platform_domain = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "useProxyProtocol",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.use_proxy_protocol = coerce_bool("useProxyProtocol", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "disableServerTokens",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.disable_server_tokens = coerce_bool("disableServerTokens", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "enforceWhitelists",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.enforce_whitelists = coerce_bool("enforceWhitelists", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "defaultWhitelist",
        constraint: Some(&constraint::CIDR_LIST),
        assign: |t, raw| {
            t.default_whitelist = coerce_sequence(raw);
            Ok(())
        },
    },
    FieldSpec {
        tag: "whitelistMode",
        constraint: Some(&constraint::WHITELIST_MODE),
        assign: |t, raw| {
            // The constraint already guarantees one of the two literals parses.
            t.whitelist_mode = raw.parse().unwrap_or_default();
            Ok(())
        },
    },
    FieldSpec {
        tag: "defaultServiceIp",
        constraint: None,
        assign: |t, raw| {
            t.default_service_ip = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "defaultServiceName",
        constraint: None,
        assign: |t, raw| {
            t.default_service_name = raw.to_string();
            Ok(())
        },
    },
    FieldSpec {
        tag: "defaultServiceEnabled",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.default_service_enabled = coerce_bool("defaultServiceEnabled", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "requestIds",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.request_ids = coerce_bool("requestIds", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "http2",
        constraint: Some(&constraint::BOOLEAN),
        assign: |t, raw| {
            t.http2 = coerce_bool("http2", raw)?;
            Ok(())
        },
    },
    FieldSpec {
        tag: "logFormat",
        constraint: None,
        assign: |t, raw| {
            t.log_format = raw.to_string();
            Ok(())
        },
    },
];

pub fn populate(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut RouterConfig,
) -> Result<()> {
    apply_fields(data, prefix, context, mode, target, FIELDS)?;
    let gzip_ctx = crate::annotation::modeler::extend_context(context, "gzip");
    gzip::populate(data, prefix, &gzip_ctx, mode, &mut target.gzip)?;
    let ssl_ctx = crate::annotation::modeler::extend_context(context, "ssl");
    ssl::populate(data, prefix, &ssl_ctx, mode, &mut target.ssl)
}

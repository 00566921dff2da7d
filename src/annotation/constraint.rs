//! Precompiled regex constraints shared by field tables across the model.
//!
//! Each constraint is matched against the *raw* annotation string before any coercion
//! happens (per the modeler contract), so sequence/mapping constraints validate the
//! whole comma-separated value, not its individual elements.

use once_cell::sync::Lazy;
use regex::Regex;

/// `auto` or a positive integer (RouterConfig.WorkerProcesses).
pub static WORKER_PROCESSES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(auto|[1-9]\d*)$").unwrap());

/// A bare positive integer string (max worker connections, hash sizes, body size, ...).
pub static POSITIVE_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d*$").unwrap());

/// A duration: positive integer with an optional unit suffix.
pub static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9]\d*(ms|[smhdwMy])?$").unwrap());

/// A size: positive integer with an optional k/K/m/M suffix.
pub static SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d*[kKmM]?$").unwrap());

/// A case-insensitive boolean literal.
pub static BOOLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(true|false)$").unwrap());

/// One or more comma-separated IPv4 addresses or CIDR blocks.
pub static CIDR_LIST: Lazy<Regex> = Lazy::new(|| {
    let cidr = r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(/\d{1,2})?";
    Regex::new(&format!(r"^{cidr}(\s*,\s*{cidr})*$")).unwrap()
});

/// nginx error_log severities.
pub static ERROR_LOG_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(debug|info|notice|warn|error|crit|alert|emerg)$").unwrap());

/// gzip compression level, 1-9.
pub static GZIP_COMP_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]$").unwrap());

/// HTTP version as used by `gzip_http_version`.
pub static HTTP_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(1\.0|1\.1)$").unwrap());

/// A simple on/off directive value (e.g. gzip_vary).
pub static ON_OFF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(on|off)$").unwrap());

/// `extend` or `override` whitelist mode.
pub static WHITELIST_MODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(extend|override)$").unwrap());

/// One or more space-separated SSL/TLS protocol names.
pub static SSL_PROTOCOLS: Lazy<Regex> = Lazy::new(|| {
    let proto = r"(SSLv2|SSLv3|TLSv1|TLSv1\.1|TLSv1\.2)";
    Regex::new(&format!(r"^{proto}(\s+{proto})*$")).unwrap()
});

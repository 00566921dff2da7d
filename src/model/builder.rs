//! Configuration for the optional builder backend (exposed as a raw TCP stream proxy).

use std::collections::HashMap;

use crate::annotation::{apply_fields, constraint, FieldSpec, Mode, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub connect_timeout: String,
    pub tcp_timeout: String,
    pub service_ip: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            connect_timeout: "10s".to_string(),
            tcp_timeout: "1200s".to_string(),
            service_ip: String::new(),
        }
    }
}

static FIELDS: &[FieldSpec<BuilderConfig>] = &[
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
];

pub fn populate(
    data: &HashMap<String, String>,
    prefix: &str,
    context: &str,
    mode: Mode,
    target: &mut BuilderConfig,
) -> Result<()> {
    apply_fields(data, prefix, context, mode, target, FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_overridden_tcp_timeout_defaulted() {
        let mut data = HashMap::new();
        data.insert(
            "router.deis.io/nginx.connectTimeout".to_string(),
            "20s".to_string(),
        );
        let mut builder = BuilderConfig::default();
        populate(&data, "router.deis.io", "nginx", Mode::Strict, &mut builder).unwrap();
        assert_eq!(builder.connect_timeout, "20s");
        assert_eq!(builder.tcp_timeout, "1200s");
    }
}

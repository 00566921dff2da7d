//! Assembly of a `RouterConfig` from a cluster snapshot — the "Config Model" step
//! between the Inspector and the Renderer.

use crate::annotation::Mode;
use crate::common::Result;
use crate::inspector::{AppServiceSnapshot, ClusterInspector, Snapshot};

use super::app::{self, AppConfig};
use super::builder;
use super::certificate::Certificate;
use super::router::{self, RouterConfig};

/// Default reserved context segment under which deployment- and builder-scoped
/// annotations live, keeping this system's keys from colliding with some future
/// sibling backend sharing the same annotation prefix. `Settings::reserved_context`
/// defaults to this value but can be overridden; `build` always takes the context
/// explicitly rather than assuming this constant.
pub const RESERVED_CONTEXT: &str = "nginx";

/// Build a fresh `RouterConfig` from `snapshot`, fetching per-app cert secrets
/// lazily through `inspector` as domain -> alias mappings are discovered.
///
/// Any annotation constraint violation (strict mode) or cluster transport error
/// propagates to the caller, which aborts the current reconciliation cycle without
/// advancing `known`; not-found on optional objects never reaches this far since the
/// inspector layer already turns it into absence.
pub async fn build<I: ClusterInspector>(
    snapshot: &Snapshot,
    inspector: &I,
    prefix: &str,
    reserved_context: &str,
    mode: Mode,
) -> Result<RouterConfig> {
    let mut cfg = RouterConfig::default();
    router::populate(
        &snapshot.deployment_annotations,
        prefix,
        reserved_context,
        mode,
        &mut cfg,
    )?;

    if let Some(secret) = &snapshot.platform_cert_secret {
        cfg.platform_certificate = Some(Certificate::new(secret.cert.clone(), secret.key.clone()));
    }
    if let Some(dh_param) = &snapshot.dh_param {
        cfg.ssl.dh_param = dh_param.clone();
    }

    for svc in &snapshot.app_services {
        if let Some(app) = build_app_config(svc, &cfg, inspector, prefix, mode).await? {
            cfg.app_configs.push(app);
        }
    }

    if let Some(builder_svc) = &snapshot.builder_service {
        let mut builder_cfg = super::BuilderConfig::default();
        builder_cfg.service_ip = builder_svc.cluster_ip.clone();
        builder::populate(
            &builder_svc.annotations,
            prefix,
            reserved_context,
            mode,
            &mut builder_cfg,
        )?;
        cfg.builder_config = Some(builder_cfg);
    }

    Ok(cfg)
}

async fn build_app_config<I: ClusterInspector>(
    svc: &AppServiceSnapshot,
    router_cfg: &RouterConfig,
    inspector: &I,
    prefix: &str,
    mode: Mode,
) -> Result<Option<AppConfig>> {
    let mut cfg = AppConfig::new(router_cfg);
    app::populate(&svc.annotations, prefix, "", mode, &mut cfg)?;

    if cfg.domains.is_empty() {
        return Ok(None);
    }

    let base_name = cfg_name(svc);
    cfg.name = if base_name == svc.namespace {
        base_name
    } else {
        format!("{}/{}", svc.namespace, base_name)
    };
    cfg.service_ip = svc.cluster_ip.clone();
    cfg.available = svc.available;

    for domain in cfg.domains.clone() {
        if domain.contains('.') {
            if let Some(alias) = cfg.cert_mapping.get(&domain).cloned() {
                // Not-found and malformed secrets already surface as `Ok(None)` from
                // the inspector layer (Model-invariant bucket); any other transport
                // error propagates via `?` and aborts this cycle (Snapshot-transport
                // bucket), per §4.2's failure semantics.
                let secret = inspector.app_cert_secret(&svc.namespace, &alias).await?;
                cfg.certificates.insert(domain, secret.map(|s| Certificate::new(s.cert, s.key)));
            }
            // No mapping at all: leave the domain without a `certificates` entry;
            // the renderer treats a missing entry the same as an explicit `None`.
        } else {
            cfg.certificates
                .insert(domain, router_cfg.platform_certificate.clone());
        }
    }

    Ok(Some(cfg))
}

fn cfg_name(svc: &AppServiceSnapshot) -> String {
    svc.app_label.clone().unwrap_or_else(|| svc.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::{BuilderServiceSnapshot, CertSecret, InspectorError};
    use std::collections::HashMap;

    struct StubInspector {
        snapshot: Snapshot,
        cert_secrets: HashMap<(String, String), CertSecret>,
    }

    impl ClusterInspector for StubInspector {
        async fn snapshot(&self) -> crate::inspector::Result<Snapshot> {
            Ok(self.snapshot.clone())
        }

        async fn app_cert_secret(
            &self,
            namespace: &str,
            alias: &str,
        ) -> crate::inspector::Result<Option<CertSecret>> {
            Ok(self
                .cert_secrets
                .get(&(namespace.to_string(), alias.to_string()))
                .cloned())
        }
    }

    fn app_service(namespace: &str, name: &str, annotations: Vec<(&str, &str)>) -> AppServiceSnapshot {
        AppServiceSnapshot {
            namespace: namespace.to_string(),
            name: name.to_string(),
            app_label: None,
            annotations: annotations
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            cluster_ip: "1.2.3.4".to_string(),
            available: true,
        }
    }

    #[tokio::test]
    async fn app_with_no_domains_is_dropped() {
        let snapshot = Snapshot {
            app_services: vec![app_service("demo", "web", vec![])],
            ..Default::default()
        };
        let inspector = StubInspector {
            snapshot: snapshot.clone(),
            cert_secrets: HashMap::new(),
        };
        let cfg = build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
            .await
            .unwrap();
        assert!(cfg.app_configs.is_empty());
    }

    #[tokio::test]
    async fn bare_label_domain_receives_platform_certificate() {
        let mut snapshot = Snapshot {
            app_services: vec![app_service(
                "demo",
                "web",
                vec![("router.deis.io/domains", "web")],
            )],
            ..Default::default()
        };
        snapshot.platform_cert_secret = Some(CertSecret {
            cert: "platform-cert".to_string(),
            key: "platform-key".to_string(),
        });
        let inspector = StubInspector {
            snapshot: snapshot.clone(),
            cert_secrets: HashMap::new(),
        };
        let cfg = build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
            .await
            .unwrap();
        assert_eq!(cfg.app_configs.len(), 1);
        let certs = &cfg.app_configs[0].certificates;
        assert_eq!(
            certs.get("web").unwrap().as_ref().unwrap().cert,
            "platform-cert"
        );
    }

    #[tokio::test]
    async fn fqdn_domain_with_mapping_and_secret_gets_its_own_cert() {
        let snapshot = Snapshot {
            app_services: vec![app_service(
                "demo",
                "web",
                vec![
                    ("router.deis.io/domains", "example.com"),
                    ("router.deis.io/certMapping", "example.com:alias1"),
                ],
            )],
            ..Default::default()
        };
        let mut cert_secrets = HashMap::new();
        cert_secrets.insert(
            ("demo".to_string(), "alias1".to_string()),
            CertSecret {
                cert: "c".to_string(),
                key: "k".to_string(),
            },
        );
        let inspector = StubInspector {
            snapshot: snapshot.clone(),
            cert_secrets,
        };
        let cfg = build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
            .await
            .unwrap();
        let certs = &cfg.app_configs[0].certificates;
        assert_eq!(certs.get("example.com").unwrap().as_ref().unwrap().cert, "c");
    }

    #[tokio::test]
    async fn fqdn_domain_with_mapping_but_absent_secret_stays_unassigned() {
        let snapshot = Snapshot {
            app_services: vec![app_service(
                "demo",
                "web",
                vec![
                    ("router.deis.io/domains", "example.com"),
                    ("router.deis.io/certMapping", "example.com:missing-alias"),
                ],
            )],
            ..Default::default()
        };
        let inspector = StubInspector {
            snapshot: snapshot.clone(),
            cert_secrets: HashMap::new(),
        };
        let cfg = build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
            .await
            .unwrap();
        let certs = &cfg.app_configs[0].certificates;
        assert!(certs.get("example.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn builder_service_populates_builder_config() {
        let snapshot = Snapshot {
            builder_service: Some(BuilderServiceSnapshot {
                annotations: [("router.deis.io/nginx.connectTimeout".to_string(), "20s".to_string())]
                    .into_iter()
                    .collect(),
                cluster_ip: "1.2.3.4".to_string(),
            }),
            ..Default::default()
        };
        let inspector = StubInspector {
            snapshot: snapshot.clone(),
            cert_secrets: HashMap::new(),
        };
        let cfg = build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
            .await
            .unwrap();
        let builder_cfg = cfg.builder_config.unwrap();
        assert_eq!(builder_cfg.connect_timeout, "20s");
        assert_eq!(builder_cfg.tcp_timeout, "1200s");
        assert_eq!(builder_cfg.service_ip, "1.2.3.4");
    }
}

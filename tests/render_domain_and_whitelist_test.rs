//! End-to-end: a snapshot with a bare-label domain (no platform domain configured)
//! and an FQDN domain with an app-level whitelist, rendered through the full
//! build -> render pipeline. Covers spec.md §8 "Domain rewrite" and the
//! whitelist extend/override branch as they actually appear in rendered output,
//! not just against a hand-built `RouterConfig`.

use std::collections::HashMap;

use router_reconciler::annotation::Mode;
use router_reconciler::inspector::{AppServiceSnapshot, CertSecret, ClusterInspector, Result as InspectorResult, Snapshot};
use router_reconciler::model;
use router_reconciler::render::render_config;

struct NoCertsInspector;

impl ClusterInspector for NoCertsInspector {
    async fn snapshot(&self) -> InspectorResult<Snapshot> {
        unreachable!()
    }

    async fn app_cert_secret(&self, _namespace: &str, _alias: &str) -> InspectorResult<Option<CertSecret>> {
        Ok(None)
    }
}

fn app_service(name: &str, annotations: &[(&str, &str)]) -> AppServiceSnapshot {
    AppServiceSnapshot {
        namespace: "demo".to_string(),
        name: name.to_string(),
        app_label: None,
        annotations: annotations.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        cluster_ip: "10.9.9.9".to_string(),
        available: true,
    }
}

#[tokio::test]
async fn bare_label_without_platform_domain_becomes_a_regex_server_name() {
    let snapshot = Snapshot {
        app_services: vec![app_service("web", &[("router.deis.io/domains", "web")])],
        ..Default::default()
    };
    let inspector = NoCertsInspector;
    let cfg = model::build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
        .await
        .unwrap();
    assert!(cfg.platform_domain.is_empty());

    let rendered = render_config(&cfg, "/opt/router/ssl");
    assert!(rendered.contains("server_name ^web\\.(?<domain>.+)$;"));
}

#[tokio::test]
async fn bare_label_with_platform_domain_is_rewritten_to_an_fqdn() {
    let snapshot = Snapshot {
        deployment_annotations: HashMap::from([(
            "router.deis.io/nginx.domain".to_string(),
            "example.org".to_string(),
        )]),
        app_services: vec![app_service("web", &[("router.deis.io/domains", "web")])],
        ..Default::default()
    };
    let inspector = NoCertsInspector;
    let cfg = model::build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
        .await
        .unwrap();
    assert_eq!(cfg.platform_domain, "example.org");

    let rendered = render_config(&cfg, "/opt/router/ssl");
    assert!(rendered.contains("server_name web.example.org;"));
}

#[tokio::test]
async fn app_whitelist_extends_the_router_default_by_default() {
    let snapshot = Snapshot {
        deployment_annotations: HashMap::from([(
            "router.deis.io/nginx.defaultWhitelist".to_string(),
            "10.0.0.0/8".to_string(),
        )]),
        app_services: vec![app_service(
            "web",
            &[
                ("router.deis.io/domains", "example.com"),
                ("router.deis.io/whitelist", "192.168.1.0/24"),
            ],
        )],
        ..Default::default()
    };
    let inspector = NoCertsInspector;
    let cfg = model::build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
        .await
        .unwrap();

    let rendered = render_config(&cfg, "/opt/router/ssl");
    let default_pos = rendered.find("allow 10.0.0.0/8;").unwrap();
    let app_pos = rendered.find("allow 192.168.1.0/24;").unwrap();
    assert!(default_pos < app_pos, "default whitelist entries must precede the app's own");
    assert!(rendered.contains("deny all;"));
}

#[tokio::test]
async fn app_whitelist_in_override_mode_drops_the_router_default() {
    let snapshot = Snapshot {
        deployment_annotations: HashMap::from([
            ("router.deis.io/nginx.defaultWhitelist".to_string(), "10.0.0.0/8".to_string()),
            ("router.deis.io/nginx.whitelistMode".to_string(), "override".to_string()),
        ]),
        app_services: vec![app_service(
            "web",
            &[
                ("router.deis.io/domains", "example.com"),
                ("router.deis.io/whitelist", "192.168.1.0/24"),
            ],
        )],
        ..Default::default()
    };
    let inspector = NoCertsInspector;
    let cfg = model::build(&snapshot, &inspector, "router.deis.io", "nginx", Mode::Strict)
        .await
        .unwrap();

    let rendered = render_config(&cfg, "/opt/router/ssl");
    assert!(!rendered.contains("10.0.0.0/8"));
    assert!(rendered.contains("192.168.1.0/24"));
}

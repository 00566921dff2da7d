//! Reconciler loop convergence across a changing cluster snapshot, not just a
//! fixed one: spec.md §8 "Loop convergence" + "Partial-failure safety" driven end
//! to end against `reconcile::reconcile_once` with a snapshot that can be swapped
//! out mid-test to simulate an orchestrator update.

use std::cell::RefCell;
use std::path::PathBuf;

use router_reconciler::inspector::{AppServiceSnapshot, CertSecret, ClusterInspector, Result as InspectorResult, Snapshot};
use router_reconciler::model::RouterConfig;
use router_reconciler::reconcile::{self, ProxyProcess};
use router_reconciler::settings::Settings;
use tempfile::tempdir;

/// An inspector whose snapshot can change between calls, modeling successive
/// orchestrator watch updates observed across reconciliation cycles.
struct SwappableInspector {
    snapshot: RefCell<Snapshot>,
}

impl ClusterInspector for SwappableInspector {
    async fn snapshot(&self) -> InspectorResult<Snapshot> {
        Ok(self.snapshot.borrow().clone())
    }

    async fn app_cert_secret(&self, _namespace: &str, _alias: &str) -> InspectorResult<Option<CertSecret>> {
        Ok(None)
    }
}

fn app_service(name: &str, domain: &str) -> AppServiceSnapshot {
    AppServiceSnapshot {
        namespace: "demo".to_string(),
        name: name.to_string(),
        app_label: None,
        annotations: [("router.deis.io/domains".to_string(), domain.to_string())]
            .into_iter()
            .collect(),
        cluster_ip: "1.2.3.4".to_string(),
        available: true,
    }
}

fn test_settings(dir: &std::path::Path) -> Settings {
    let mut settings = Settings::default();
    settings.ssl_dir = dir.join("ssl");
    settings.conf_dir = dir.join("conf");
    settings.config_path = settings.conf_dir.join("nginx.conf");
    std::fs::create_dir_all(&settings.ssl_dir).unwrap();
    std::fs::create_dir_all(&settings.conf_dir).unwrap();
    settings
}

#[tokio::test]
async fn a_second_identical_cycle_never_rewrites_the_rendered_config() {
    let dir = tempdir().unwrap();
    let settings = test_settings(dir.path());
    let inspector = SwappableInspector {
        snapshot: RefCell::new(Snapshot {
            app_services: vec![app_service("web", "example.com")],
            ..Default::default()
        }),
    };
    let proxy = ProxyProcess::new(PathBuf::from("/bin/true"), vec![]);
    let mut known = RouterConfig::default();

    assert!(reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await);
    let rendered_once = std::fs::read(&settings.config_path).unwrap();

    assert!(!reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await);
    let rendered_twice = std::fs::read(&settings.config_path).unwrap();
    assert_eq!(rendered_once, rendered_twice);
}

#[tokio::test]
async fn a_changed_snapshot_is_picked_up_on_the_next_cycle() {
    let dir = tempdir().unwrap();
    let settings = test_settings(dir.path());
    let inspector = SwappableInspector {
        snapshot: RefCell::new(Snapshot {
            app_services: vec![app_service("web", "example.com")],
            ..Default::default()
        }),
    };
    let proxy = ProxyProcess::new(PathBuf::from("/bin/true"), vec![]);
    let mut known = RouterConfig::default();

    assert!(reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await);
    assert_eq!(known.app_configs.len(), 1);
    assert_eq!(known.app_configs[0].domains, vec!["example.com".to_string()]);

    // A second app service shows up: the orchestrator has moved on.
    *inspector.snapshot.borrow_mut() = Snapshot {
        app_services: vec![app_service("web", "example.com"), app_service("api", "api.example.com")],
        ..Default::default()
    };

    assert!(reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await);
    assert_eq!(known.app_configs.len(), 2);

    // Applying the very same snapshot again is a no-op: `known` already matches it.
    assert!(!reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await);
}

#[tokio::test]
async fn snapshot_transport_failure_leaves_known_unchanged_and_next_cycle_retries() {
    struct FlakyThenOkInspector {
        calls: RefCell<u32>,
        snapshot: Snapshot,
    }

    impl ClusterInspector for FlakyThenOkInspector {
        async fn snapshot(&self) -> InspectorResult<Snapshot> {
            let mut calls = self.calls.borrow_mut();
            *calls += 1;
            if *calls == 1 {
                Err(router_reconciler::inspector::InspectorError::DeploymentNotFound {
                    name: "deis-router".to_string(),
                    namespace: "default".to_string(),
                })
            } else {
                Ok(self.snapshot.clone())
            }
        }

        async fn app_cert_secret(&self, _namespace: &str, _alias: &str) -> InspectorResult<Option<CertSecret>> {
            Ok(None)
        }
    }

    let dir = tempdir().unwrap();
    let settings = test_settings(dir.path());
    let inspector = FlakyThenOkInspector {
        calls: RefCell::new(0),
        snapshot: Snapshot {
            app_services: vec![app_service("web", "example.com")],
            ..Default::default()
        },
    };
    let proxy = ProxyProcess::new(PathBuf::from("/bin/true"), vec![]);
    let mut known = RouterConfig::default();

    let first = reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await;
    assert!(!first);
    assert_eq!(known, RouterConfig::default());

    let second = reconcile::reconcile_once(&inspector, &proxy, &settings, &mut known).await;
    assert!(second);
    assert_eq!(known.app_configs.len(), 1);
}

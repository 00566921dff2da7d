//! router-reconciler: entry point.
//!
//! Startup order (§1 AMBIENT "Process entry point"): load bootstrap settings,
//! initialize logging, construct the Kubernetes client, start the proxy process
//! once, then hand off to the reconcile loop. Any failure before the loop starts is
//! fatal; the loop itself only returns on process signal.

use router_reconciler::common::init_logger;
use router_reconciler::inspector::{KubeInspector, WellKnownNames};
use router_reconciler::reconcile::{self, ProxyProcess};
use router_reconciler::{AppError, Result, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().map_err(|e| AppError::Settings(e.to_string()))?;
    init_logger(&settings.log_level);

    log::info!(
        "router-reconciler {} starting (namespace={}, deployment={})",
        router_reconciler::VERSION,
        settings.namespace,
        settings.router_deployment
    );

    let client = kube::Client::try_default().await?;
    let names = WellKnownNames {
        router_deployment: settings.router_deployment.clone(),
        builder_service: settings.builder_service.clone(),
        platform_cert_secret: settings.platform_cert_secret.clone(),
        dhparam_secret: settings.dhparam_secret.clone(),
    };
    let inspector = KubeInspector::new(
        client,
        settings.namespace.clone(),
        settings.annotation_prefix.clone(),
        names,
    );
    let proxy = ProxyProcess::new(settings.proxy_binary.clone(), settings.reload_args.clone());

    reconcile::run(inspector, proxy, settings).await;

    Ok(())
}

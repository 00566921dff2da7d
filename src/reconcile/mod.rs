//! Reconciler: the top-level loop tying every other component together.
//!
//! Grounded directly in `examples/original_source/router.go`'s `main` loop (rate
//! limiter → snapshot → build → deep-equality check → write certs/dhparam/config →
//! reload → advance `known`), generalized to this crate's richer config model and
//! the strict partial-failure policy spec.md §4.5/§7 make explicit: `known` only
//! ever advances after every write and the reload have all succeeded.

pub mod process;
pub mod ratelimiter;

pub use process::{ProcessError, ProxyProcess};
pub use ratelimiter::RateLimiter;

use crate::inspector::ClusterInspector;
use crate::model::{self, RouterConfig};
use crate::settings::Settings;

/// Run one reconciliation cycle against `known`, advancing it in place iff the
/// cycle fully succeeds. Returns whether `known` changed (i.e. a reload happened).
///
/// Every failure path logs and returns `false` without mutating `known` — the
/// universal policy from §7: never advance `known` on any error, and never leave a
/// partially-written file set without retrying on the next cycle.
pub async fn reconcile_once<I: ClusterInspector>(
    inspector: &I,
    proxy: &ProxyProcess,
    settings: &Settings,
    known: &mut RouterConfig,
) -> bool {
    let snapshot = match inspector.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::warn!("cluster snapshot failed, retrying next cycle: {e}");
            return false;
        }
    };

    let next = match model::build(
        &snapshot,
        inspector,
        &settings.annotation_prefix,
        &settings.reserved_context,
        settings.mode(),
    )
    .await
    {
        Ok(next) => next,
        Err(e) => {
            log::warn!("config model build failed, retrying next cycle: {e}");
            return false;
        }
    };

    if &next == known {
        return false;
    }

    log::info!("router configuration has changed");

    if let Err(e) = crate::render::write_certs(&next, &settings.ssl_dir) {
        log::warn!("writing certificates failed, continuing with existing certs: {e}");
        return false;
    }
    if let Err(e) = crate::render::write_dhparam(&next, &settings.ssl_dir) {
        log::warn!("writing dhparam failed, continuing with existing dhparam: {e}");
        return false;
    }
    let ssl_dir = settings.ssl_dir.to_string_lossy().into_owned();
    if let Err(e) = crate::render::write_config(&next, &settings.config_path, &ssl_dir) {
        log::warn!("writing rendered config failed, continuing with existing config: {e}");
        return false;
    }
    if let Err(e) = proxy.reload().await {
        log::warn!("proxy reload failed: {e}");
        return false;
    }

    *known = next;
    true
}

/// Start the proxy once, then reconcile forever: rate-limited poll → snapshot →
/// build → compare → apply. Only bootstrap (client construction, settings loading)
/// is fatal to this process; every in-loop failure is logged and retried.
pub async fn run<I: ClusterInspector>(inspector: I, proxy: ProxyProcess, settings: Settings) {
    if let Err(e) = proxy.start().await {
        log::error!("failed to start proxy process: {e}");
    }

    let mut limiter = RateLimiter::new(settings.poll_rate, settings.poll_burst);
    let mut known = RouterConfig::default();

    loop {
        limiter.acquire().await;
        reconcile_once(&inspector, &proxy, &settings, &mut known).await;
    }
}

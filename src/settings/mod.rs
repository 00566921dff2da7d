//! Bootstrap settings for this control-plane process itself.
//!
//! Distinct from the reconciled `RouterConfig` model (`crate::model`): this struct
//! configures *this binary* — which namespace to watch, where to materialize files,
//! how to invoke the proxy — not the proxy's own behavior.
//!
//! Loaded in layers, lowest to highest priority:
//! defaults → optional JSON config file → environment variables (prefixed
//! `ROUTER_RECONCILER_`, via the `config` crate's `Environment` source) → CLI flags
//! (`clap`, highest priority, only applied where actually supplied). `POD_NAMESPACE`
//! is a documented exception (§6 "Environment"): it is read directly, outside the
//! `ROUTER_RECONCILER_` prefix convention, since it names the namespace this process
//! itself runs in rather than a tunable of its own.

pub mod error;

pub use error::{Result, SettingsError};

use std::path::PathBuf;

use clap::Parser;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Everything the Inspector, Renderer, and Reconciler need to find their inputs and
/// outputs. See module docs for the load order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Namespace the router deployment, builder service, and platform/DH-param
    /// secrets live in (`POD_NAMESPACE`, default `"default"`).
    pub namespace: String,
    /// Name of the router deployment carrying router-scoped annotations.
    pub router_deployment: String,
    /// Name of the optional builder service.
    pub builder_service: String,
    /// Name of the optional platform certificate secret.
    pub platform_cert_secret: String,
    /// Name of the optional DH-parameters secret.
    pub dhparam_secret: String,
    /// Annotation key prefix (`<prefix>/...`).
    pub annotation_prefix: String,
    /// Reserved context segment for deployment/builder-scoped annotations.
    pub reserved_context: String,
    /// Directory the rendered config file is written to.
    pub conf_dir: PathBuf,
    /// Directory certificate/key/dhparam files are materialized into.
    pub ssl_dir: PathBuf,
    /// Full path of the rendered config file (normally `<conf_dir>/nginx.conf`).
    pub config_path: PathBuf,
    /// Path to the proxy binary, exec'd at startup and on every successful apply.
    pub proxy_binary: PathBuf,
    /// Argument(s) appended to `proxy_binary` to trigger a reload.
    pub reload_args: Vec<String>,
    /// Token-bucket refill rate, in tokens/second (§4.5/§9: 0.1/s default).
    pub poll_rate: f64,
    /// Token-bucket burst size (§4.5/§9: 1 by default).
    pub poll_burst: u32,
    /// Default log level for this process's own logging.
    pub log_level: String,
    /// Annotation constraint-violation policy: `false` (warn, production) or `true`
    /// (strict, fail the cycle — intended for tests, not normal operation).
    pub strict_annotations: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            router_deployment: "deis-router".to_string(),
            builder_service: "deis-builder".to_string(),
            platform_cert_secret: "deis-router-platform-cert".to_string(),
            dhparam_secret: "deis-router-dhparam".to_string(),
            annotation_prefix: "router.deis.io".to_string(),
            reserved_context: "nginx".to_string(),
            conf_dir: PathBuf::from("/opt/router/conf"),
            ssl_dir: PathBuf::from("/opt/router/ssl"),
            config_path: PathBuf::from("/opt/router/conf/nginx.conf"),
            proxy_binary: PathBuf::from("/opt/nginx/sbin/nginx"),
            reload_args: vec!["-s".to_string(), "reload".to_string()],
            poll_rate: 0.1,
            poll_burst: 1,
            log_level: "info".to_string(),
            strict_annotations: false,
        }
    }
}

/// CLI surface; every field is optional so `load()` can tell "not supplied" apart
/// from "supplied with the default value" and override only where a layer
/// actually provided something.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "router-reconciler", about = "Reconciles edge-proxy configuration from cluster state")]
struct Cli {
    /// Path to an optional JSON settings file.
    #[arg(long, env = "ROUTER_RECONCILER_CONFIG_FILE")]
    config_file: Option<PathBuf>,

    #[arg(long, env = "ROUTER_RECONCILER_NAMESPACE")]
    namespace: Option<String>,

    #[arg(long, env = "ROUTER_RECONCILER_ROUTER_DEPLOYMENT")]
    router_deployment: Option<String>,

    #[arg(long, env = "ROUTER_RECONCILER_ANNOTATION_PREFIX")]
    annotation_prefix: Option<String>,

    #[arg(long, env = "ROUTER_RECONCILER_CONF_DIR")]
    conf_dir: Option<PathBuf>,

    #[arg(long, env = "ROUTER_RECONCILER_SSL_DIR")]
    ssl_dir: Option<PathBuf>,

    #[arg(long, env = "ROUTER_RECONCILER_PROXY_BINARY")]
    proxy_binary: Option<PathBuf>,

    #[arg(long, env = "ROUTER_RECONCILER_POLL_RATE")]
    poll_rate: Option<f64>,

    #[arg(long, env = "ROUTER_RECONCILER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Fail the reconciliation cycle on annotation constraint violations instead of
    /// warning and keeping the field's default. Intended for tests, not production.
    #[arg(long)]
    strict_annotations: bool,
}

impl Settings {
    /// Load settings from defaults, an optional config file, `ROUTER_RECONCILER_*`
    /// environment variables, `POD_NAMESPACE`, and CLI flags, in that ascending
    /// priority order.
    pub fn load() -> Result<Self> {
        let cli = Cli::parse();
        Self::load_from(cli)
    }

    fn load_from(cli: Cli) -> Result<Self> {
        let config_file = cli
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("router-reconciler.json"));

        let layered = Config::builder()
            .add_source(File::from(config_file).required(false))
            .add_source(Environment::with_prefix("ROUTER_RECONCILER").separator("_"))
            .build();

        let mut settings = match layered {
            Ok(cfg) => cfg.try_deserialize::<Settings>().unwrap_or_else(|e| {
                log::warn!("settings file/environment failed to deserialize, using defaults: {e}");
                Settings::default()
            }),
            Err(e) => {
                log::warn!("failed to build layered settings, using defaults: {e}");
                Settings::default()
            }
        };

        if let Ok(ns) = std::env::var("POD_NAMESPACE") {
            settings.namespace = ns;
        }

        settings.apply_cli(cli);

        if settings.poll_rate <= 0.0 {
            return Err(SettingsError::InvalidPollRate(settings.poll_rate));
        }

        Ok(settings)
    }

    fn apply_cli(&mut self, cli: Cli) {
        if let Some(v) = cli.namespace {
            self.namespace = v;
        }
        if let Some(v) = cli.router_deployment {
            self.router_deployment = v;
        }
        if let Some(v) = cli.annotation_prefix {
            self.annotation_prefix = v;
        }
        if let Some(v) = cli.conf_dir {
            self.conf_dir = v;
        }
        if let Some(v) = cli.ssl_dir {
            self.ssl_dir = v;
        }
        if let Some(v) = cli.proxy_binary {
            self.proxy_binary = v;
        }
        if let Some(v) = cli.poll_rate {
            self.poll_rate = v;
        }
        if let Some(v) = cli.log_level {
            self.log_level = v;
        }
        if cli.strict_annotations {
            self.strict_annotations = true;
        }
        self.config_path = self.conf_dir.join("nginx.conf");
    }

    /// The annotation modeler mode this process should run in.
    pub fn mode(&self) -> crate::annotation::Mode {
        if self.strict_annotations {
            crate::annotation::Mode::Strict
        } else {
            crate::annotation::Mode::Warn
        }
    }
}

//! Kubernetes-backed implementation of the Cluster Inspector.

use std::collections::HashMap;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Endpoints, Secret, Service};
use kube::api::{Api, ListParams};
use kube::Client;

use super::error::{InspectorError, Result};
use super::snapshot::{AppServiceSnapshot, BuilderServiceSnapshot, CertSecret, Snapshot};

/// Everything the config model needs, fetched as one logically-sequential snapshot,
/// plus the lazy per-app cert secret lookup the assembly step drives as it discovers
/// cert-mapping annotations.
pub trait ClusterInspector {
    async fn snapshot(&self) -> Result<Snapshot>;

    /// Fetch `<alias>-cert` in `namespace`. Not-found, or a secret missing either PEM
    /// half, both surface as `Ok(None)` (the Model-invariant error bucket: log and
    /// treat the certificate as absent, never abort the cycle over it).
    async fn app_cert_secret(&self, namespace: &str, alias: &str) -> Result<Option<CertSecret>>;
}

/// Well-known object names this system looks for in the cluster.
pub struct WellKnownNames {
    pub router_deployment: String,
    pub builder_service: String,
    pub platform_cert_secret: String,
    pub dhparam_secret: String,
}

impl Default for WellKnownNames {
    fn default() -> Self {
        Self {
            router_deployment: "deis-router".to_string(),
            builder_service: "deis-builder".to_string(),
            platform_cert_secret: "deis-router-platform-cert".to_string(),
            dhparam_secret: "deis-router-dhparam".to_string(),
        }
    }
}

pub struct KubeInspector {
    client: Client,
    namespace: String,
    /// Annotation key prefix used both for the routable-service label selector and
    /// for deployment/builder annotation parsing upstream.
    prefix: String,
    names: WellKnownNames,
}

impl KubeInspector {
    pub fn new(client: Client, namespace: String, prefix: String, names: WellKnownNames) -> Self {
        Self {
            client,
            namespace,
            prefix,
            names,
        }
    }

    async fn fetch_deployment_annotations(&self) -> Result<HashMap<String, String>> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), &self.namespace);
        let deployment = api.get(&self.names.router_deployment).await.map_err(|e| {
            if is_not_found(&e) {
                InspectorError::DeploymentNotFound {
                    name: self.names.router_deployment.clone(),
                    namespace: self.namespace.clone(),
                }
            } else {
                InspectorError::Kube(e)
            }
        })?;
        Ok(deployment
            .metadata
            .annotations
            .unwrap_or_default())
    }

    async fn fetch_app_services(&self) -> Result<Vec<AppServiceSnapshot>> {
        let services: Api<Service> = Api::all(self.client.clone());

        let selector = format!("{}/routable=true", self.prefix);
        let list = services
            .list(&ListParams::default().labels(&selector))
            .await?;

        let mut out = Vec::with_capacity(list.items.len());
        for svc in list.items {
            let namespace = svc.metadata.namespace.clone().unwrap_or_default();
            let name = svc.metadata.name.clone().unwrap_or_default();
            let app_label = svc
                .metadata
                .labels
                .as_ref()
                .and_then(|l| l.get("app"))
                .cloned();
            let annotations = svc.metadata.annotations.clone().unwrap_or_default();
            let cluster_ip = svc
                .spec
                .as_ref()
                .and_then(|s| s.cluster_ip.clone())
                .unwrap_or_default();

            let endpoints: Api<Endpoints> = Api::namespaced(self.client.clone(), &namespace);
            let available = match endpoints.get(&name).await {
                Ok(ep) => endpoints_available(&ep),
                Err(e) if is_not_found(&e) => false,
                Err(e) => return Err(InspectorError::Kube(e)),
            };

            out.push(AppServiceSnapshot {
                namespace,
                name,
                app_label,
                annotations,
                cluster_ip,
                available,
            });
        }
        Ok(out)
    }

    async fn fetch_builder_service(&self) -> Result<Option<BuilderServiceSnapshot>> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), &self.namespace);
        match api.get(&self.names.builder_service).await {
            Ok(svc) => Ok(Some(BuilderServiceSnapshot {
                annotations: svc.metadata.annotations.unwrap_or_default(),
                cluster_ip: svc
                    .spec
                    .and_then(|s| s.cluster_ip)
                    .unwrap_or_default(),
            })),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(InspectorError::Kube(e)),
        }
    }

    async fn fetch_platform_cert_secret(&self) -> Result<Option<CertSecret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        match api.get(&self.names.platform_cert_secret).await {
            Ok(secret) => Ok(cert_secret_from_data(secret, "platform certificate")),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(InspectorError::Kube(e)),
        }
    }

    async fn fetch_dh_param(&self) -> Result<Option<String>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        match api.get(&self.names.dhparam_secret).await {
            Ok(secret) => {
                let data = secret.data.unwrap_or_default();
                match data.get("dhparam") {
                    Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes.0).into_owned())),
                    None => {
                        log::warn!(
                            "secret \"{}\" is missing the \"dhparam\" entry; treating DH params as unset",
                            self.names.dhparam_secret
                        );
                        Ok(None)
                    }
                }
            }
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(InspectorError::Kube(e)),
        }
    }
}

impl ClusterInspector for KubeInspector {
    async fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            deployment_annotations: self.fetch_deployment_annotations().await?,
            app_services: self.fetch_app_services().await?,
            builder_service: self.fetch_builder_service().await?,
            platform_cert_secret: self.fetch_platform_cert_secret().await?,
            dh_param: self.fetch_dh_param().await?,
        })
    }

    async fn app_cert_secret(&self, namespace: &str, alias: &str) -> Result<Option<CertSecret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let name = format!("{alias}-cert");
        match api.get(&name).await {
            Ok(secret) => Ok(cert_secret_from_data(secret, &name)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(InspectorError::Kube(e)),
        }
    }
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

fn endpoints_available(ep: &Endpoints) -> bool {
    ep.subsets
        .as_ref()
        .map(|subsets| {
            subsets
                .iter()
                .any(|s| s.addresses.as_ref().is_some_and(|a| !a.is_empty()))
        })
        .unwrap_or(false)
}

fn cert_secret_from_data(secret: Secret, label: &str) -> Option<CertSecret> {
    let data = secret.data?;
    let cert = data.get("tls.crt");
    let key = data.get("tls.key");
    match (cert, key) {
        (Some(cert), Some(key)) => Some(CertSecret {
            cert: String::from_utf8_lossy(&cert.0).into_owned(),
            key: String::from_utf8_lossy(&key.0).into_owned(),
        }),
        _ => {
            log::warn!("secret \"{label}\" is missing tls.crt or tls.key; dropping certificate");
            None
        }
    }
}

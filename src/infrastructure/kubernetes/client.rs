// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::shared::error::OpsError;
use kube::api::{ApiResource, DynamicObject, ListParams, PostParams};
use kube::{Api, Client};

/// Generic access to control plane records by resource type.
///
/// `namespace: None` addresses cluster-scoped resources.
#[async_trait::async_trait]
pub trait ResourceAccessor: Send + Sync {
    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, OpsError>;

    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        label_selector: Option<&str>,
    ) -> Result<Vec<DynamicObject>, OpsError>;

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject, OpsError>;
}

#[async_trait::async_trait]
impl<T: ResourceAccessor + ?Sized> ResourceAccessor for std::sync::Arc<T> {
    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, OpsError> {
        (**self).get(resource, namespace, name).await
    }

    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        label_selector: Option<&str>,
    ) -> Result<Vec<DynamicObject>, OpsError> {
        (**self).list(resource, namespace, label_selector).await
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject, OpsError> {
        (**self).create(resource, namespace, object).await
    }
}

pub struct KubeResourceAccessor {
    client: Client,
}

impl KubeResourceAccessor {
    pub async fn new() -> Result<Self, OpsError> {
        let client = Client::try_default()
            .await
            .map_err(|e| OpsError::Kubeconfig(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, OpsError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new().await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| OpsError::Kubeconfig(format!("failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| OpsError::Kubeconfig(format!("failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| OpsError::Kubeconfig(e.to_string()))?;

        let client =
            Client::try_from(config).map_err(|e| OpsError::Kubeconfig(e.to_string()))?;

        Ok(Self { client })
    }

    fn api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }
}

#[async_trait::async_trait]
impl ResourceAccessor for KubeResourceAccessor {
    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, OpsError> {
        tracing::debug!(kind = %resource.kind, name, namespace = ?namespace, "get");
        self.api(resource, namespace).get(name).await.map_err(|e| {
            if let kube::Error::Api(ae) = e {
                if ae.code == 404 {
                    OpsError::not_found(&resource.kind, name, namespace.unwrap_or_default())
                } else {
                    OpsError::Remote(ae.message)
                }
            } else {
                OpsError::Remote(e.to_string())
            }
        })
    }

    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        label_selector: Option<&str>,
    ) -> Result<Vec<DynamicObject>, OpsError> {
        tracing::debug!(kind = %resource.kind, namespace = ?namespace, label_selector = ?label_selector, "list");
        let mut list_params = ListParams::default();
        if let Some(selector) = label_selector {
            list_params = list_params.labels(selector);
        }

        self.api(resource, namespace)
            .list(&list_params)
            .await
            .map(|list| list.items)
            .map_err(|e| OpsError::Remote(e.to_string()))
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject, OpsError> {
        let pp = PostParams {
            field_manager: Some(crate::infrastructure::constants::FIELD_MANAGER.to_string()),
            ..Default::default()
        };

        let created = self
            .api(resource, Some(namespace))
            .create(&pp, object)
            .await?;
        Ok(created)
    }
}

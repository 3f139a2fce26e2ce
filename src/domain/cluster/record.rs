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

//! Typed views over the cluster record

use crate::infrastructure::kubernetes::resources::gvr;
use crate::infrastructure::kubernetes::ResourceAccessor;
use crate::shared::error::OpsError;
use kube::api::DynamicObject;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterSpec {
    pub cluster_definition_ref: String,
    pub cluster_version_ref: String,
    pub components: Vec<ClusterComponent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
}

impl ClusterSpec {
    pub fn component(&self, name: &str) -> Option<&ClusterComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }
}

/// Deserialize the `spec` of a fetched record.
pub fn spec_of<T: DeserializeOwned>(object: &DynamicObject) -> Result<T, OpsError> {
    let spec = object.data.get("spec").cloned().ok_or_else(|| {
        OpsError::invalid_resource(format!(
            "{} has no spec",
            object.metadata.name.as_deref().unwrap_or("<unnamed>")
        ))
    })?;
    Ok(serde_json::from_value(spec)?)
}

pub async fn get_cluster_spec(
    accessor: &dyn ResourceAccessor,
    cluster_name: &str,
    namespace: &str,
) -> Result<ClusterSpec, OpsError> {
    let object = accessor
        .get(&gvr::clusters(), Some(namespace), cluster_name)
        .await?;
    spec_of(&object)
}

/// Names of all components declared by the cluster.
pub async fn get_components_from_cluster(
    accessor: &dyn ResourceAccessor,
    cluster_name: &str,
    namespace: &str,
) -> Result<Vec<String>, OpsError> {
    Ok(get_cluster_spec(accessor, cluster_name, namespace)
        .await?
        .component_names())
}

/// Components the cluster currently reports as restartable.
pub async fn get_restartable_components(
    accessor: &dyn ResourceAccessor,
    cluster_name: &str,
    namespace: &str,
) -> Result<Vec<String>, OpsError> {
    let object = accessor
        .get(&gvr::clusters(), Some(namespace), cluster_name)
        .await?;

    let restartable = object
        .data
        .pointer("/status/operations/restartable")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            OpsError::invalid_resource(format!(
                "cluster {} has no status.operations.restartable",
                cluster_name
            ))
        })?;

    restartable
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                OpsError::invalid_resource(format!(
                    "cluster {} has a non-string entry in status.operations.restartable",
                    cluster_name
                ))
            })
        })
        .collect()
}

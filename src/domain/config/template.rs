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

use crate::domain::cluster::record::{get_cluster_spec, spec_of};
use crate::infrastructure::kubernetes::resources::gvr;
use crate::infrastructure::kubernetes::ResourceAccessor;
use crate::shared::error::OpsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Binding between a component and a configuration file plus its schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigTemplate {
    pub name: String,
    pub config_tpl_ref: String,
    pub config_constraint_ref: String,
    pub namespace: String,
    pub volume_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClusterDefinitionSpec {
    components: Vec<ClusterDefinitionComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClusterDefinitionComponent {
    type_name: String,
    config_spec: Option<ConfigSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigSpec {
    config_template_refs: Vec<ConfigTemplate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClusterVersionSpec {
    components: Vec<ClusterVersionComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClusterVersionComponent {
    #[serde(rename = "type")]
    component_type: String,
    config_template_refs: Vec<ConfigTemplate>,
}

/// Overlay version templates on definition templates. A version template
/// replaces the definition template of the same name; new names are appended.
pub fn merge_config_templates(
    definition: Vec<ConfigTemplate>,
    version: Vec<ConfigTemplate>,
) -> Vec<ConfigTemplate> {
    let mut merged = definition;
    for tpl in version {
        match merged.iter_mut().find(|t| t.name == tpl.name) {
            Some(existing) => *existing = tpl,
            None => merged.push(tpl),
        }
    }
    merged
}

/// Config templates available to one component of a cluster.
pub async fn get_config_template_list(
    accessor: &dyn ResourceAccessor,
    cluster_name: &str,
    namespace: &str,
    component_name: &str,
) -> Result<Vec<ConfigTemplate>, OpsError> {
    let cluster = get_cluster_spec(accessor, cluster_name, namespace).await?;
    let component = cluster
        .component(component_name)
        .ok_or_else(|| OpsError::not_found("Component", component_name, namespace))?;

    let definition = accessor
        .get(&gvr::cluster_definitions(), None, &cluster.cluster_definition_ref)
        .await?;
    let definition: ClusterDefinitionSpec = spec_of(&definition)?;
    let definition_templates = definition
        .components
        .into_iter()
        .find(|c| c.type_name == component.component_type)
        .and_then(|c| c.config_spec)
        .map(|s| s.config_template_refs)
        .unwrap_or_default();

    let version_templates = if cluster.cluster_version_ref.is_empty() {
        Vec::new()
    } else {
        let version = accessor
            .get(&gvr::cluster_versions(), None, &cluster.cluster_version_ref)
            .await?;
        let version: ClusterVersionSpec = spec_of(&version)?;
        version
            .components
            .into_iter()
            .find(|c| c.component_type == component.component_type)
            .map(|c| c.config_template_refs)
            .unwrap_or_default()
    };

    let templates = merge_config_templates(definition_templates, version_templates);
    tracing::debug!(
        cluster = cluster_name,
        component = component_name,
        count = templates.len(),
        "fetched config templates"
    );
    Ok(templates)
}

/// File name to content mapping of a config map.
pub async fn get_config_map_data(
    accessor: &dyn ResourceAccessor,
    name: &str,
    namespace: &str,
) -> Result<BTreeMap<String, String>, OpsError> {
    let object = accessor
        .get(&gvr::config_maps(), Some(namespace), name)
        .await?;

    match object.data.get("data") {
        Some(data) if !data.is_null() => Ok(serde_json::from_value(data.clone())?),
        _ => Ok(BTreeMap::new()),
    }
}

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

use super::gvr;
use crate::domain::ops::{OpsParams, ReconfigureParams, ValidatedOperation, VerticalScaleParams};
use crate::infrastructure::constants::{LABEL_INSTANCE, LABEL_MANAGED_BY, LABEL_MANAGED_BY_VALUE};
use crate::shared::error::OpsError;
use kube::api::DynamicObject;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

pub struct OpsRequestBuilder {
    operation: ValidatedOperation,
}

impl OpsRequestBuilder {
    pub fn new(operation: ValidatedOperation) -> Self {
        Self { operation }
    }

    pub fn build(&self) -> Result<DynamicObject, OpsError> {
        let descriptor = self.operation.descriptor();

        let mut object = DynamicObject::new("", &gvr::ops_requests()).within(descriptor.namespace());
        match descriptor.ops_request_name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => object.metadata.name = Some(name.to_string()),
            None => {
                object.metadata.name = None;
                object.metadata.generate_name = Some(format!(
                    "{}-{}-",
                    descriptor.cluster_name(),
                    descriptor.ops_type().to_lowercase()
                ));
            }
        }
        object.metadata.labels = Some(self.get_labels());
        let spec = self.build_spec()?;
        object.data = json!({ "spec": spec });

        Ok(object)
    }

    pub fn get_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(
            LABEL_INSTANCE.to_string(),
            self.operation.descriptor().cluster_name().to_string(),
        );
        labels.insert(
            LABEL_MANAGED_BY.to_string(),
            LABEL_MANAGED_BY_VALUE.to_string(),
        );
        labels
    }

    fn build_spec(&self) -> Result<Value, OpsError> {
        let descriptor = self.operation.descriptor();
        let components = descriptor.component_names();

        let mut spec = Map::new();
        spec.insert("clusterRef".to_string(), json!(descriptor.cluster_name()));
        spec.insert("type".to_string(), json!(descriptor.ops_type().as_str()));
        if let Some(ttl) = descriptor.ttl_seconds_after_succeed {
            spec.insert("ttlSecondsAfterSucceed".to_string(), json!(ttl));
        }

        match descriptor.params() {
            OpsParams::Restart => {
                let restart: Vec<Value> = components
                    .iter()
                    .map(|c| json!({ "componentName": c }))
                    .collect();
                spec.insert("restart".to_string(), json!(restart));
            }
            OpsParams::Upgrade(params) => {
                spec.insert(
                    "upgrade".to_string(),
                    json!({ "clusterVersionRef": params.cluster_version_ref }),
                );
            }
            OpsParams::VerticalScale(params) => {
                let scaling: Vec<Value> = components
                    .iter()
                    .map(|c| vertical_scaling(c, params))
                    .collect();
                spec.insert("verticalScaling".to_string(), json!(scaling));
            }
            OpsParams::HorizontalScale(params) => {
                let scaling: Vec<Value> = components
                    .iter()
                    .map(|c| json!({ "componentName": c, "replicas": params.replicas }))
                    .collect();
                spec.insert("horizontalScaling".to_string(), json!(scaling));
            }
            OpsParams::VolumeExpand(params) => {
                let vcts: Vec<Value> = params
                    .vct_names
                    .iter()
                    .map(|name| json!({ "name": name, "storage": params.storage }))
                    .collect();
                let expansion: Vec<Value> = components
                    .iter()
                    .map(|c| json!({ "componentName": c, "volumeClaimTemplates": vcts }))
                    .collect();
                spec.insert("volumeExpansion".to_string(), json!(expansion));
            }
            OpsParams::Reconfigure(params) => {
                let component = components.first().cloned().unwrap_or_default();
                spec.insert("reconfigure".to_string(), reconfigure(&component, params)?);
            }
        }

        Ok(Value::Object(spec))
    }
}

fn vertical_scaling(component: &str, params: &VerticalScaleParams) -> Value {
    fn quantities(cpu: &Option<String>, memory: &Option<String>) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(cpu) = cpu.as_ref().filter(|s| !s.is_empty()) {
            map.insert("cpu".to_string(), json!(cpu));
        }
        if let Some(memory) = memory.as_ref().filter(|s| !s.is_empty()) {
            map.insert("memory".to_string(), json!(memory));
        }
        map
    }

    let mut entry = Map::new();
    entry.insert("componentName".to_string(), json!(component));
    let requests = quantities(&params.requests_cpu, &params.requests_memory);
    if !requests.is_empty() {
        entry.insert("requests".to_string(), Value::Object(requests));
    }
    let limits = quantities(&params.limits_cpu, &params.limits_memory);
    if !limits.is_empty() {
        entry.insert("limits".to_string(), Value::Object(limits));
    }
    Value::Object(entry)
}

fn reconfigure(component: &str, params: &ReconfigureParams) -> Result<Value, OpsError> {
    let key = if let Some(path) = &params.local_file {
        let content = std::fs::read_to_string(path).map_err(|source| OpsError::LocalFile {
            path: path.clone(),
            source,
        })?;
        let file_name = params.config_file.clone().unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        json!({ "key": file_name, "fileContent": content })
    } else {
        let parameters: Vec<Value> = params
            .key_values
            .iter()
            .map(|(k, v)| json!({ "key": k, "value": v }))
            .collect();
        json!({
            "key": params.config_file.clone().unwrap_or_default(),
            "parameters": parameters,
        })
    };

    let mut configuration = Map::new();
    if let Some(name) = params.template_name.as_ref().filter(|n| !n.is_empty()) {
        configuration.insert("name".to_string(), json!(name));
    }
    configuration.insert("keys".to_string(), json!([key]));

    Ok(json!({
        "componentName": component,
        "configurations": [Value::Object(configuration)],
    }))
}

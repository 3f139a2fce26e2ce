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

//! Resource types addressed by group-version-resource

use crate::infrastructure::constants::*;
use kube::api::ApiResource;

fn dbaas(kind: &str, plural: &str) -> ApiResource {
    ApiResource {
        group: DBAAS_GROUP.to_string(),
        version: DBAAS_VERSION.to_string(),
        api_version: format!("{}/{}", DBAAS_GROUP, DBAAS_VERSION),
        kind: kind.to_string(),
        plural: plural.to_string(),
    }
}

pub fn clusters() -> ApiResource {
    dbaas(KIND_CLUSTER, RESOURCE_CLUSTERS)
}

pub fn cluster_definitions() -> ApiResource {
    dbaas(KIND_CLUSTER_DEFINITION, RESOURCE_CLUSTER_DEFINITIONS)
}

pub fn cluster_versions() -> ApiResource {
    dbaas(KIND_CLUSTER_VERSION, RESOURCE_CLUSTER_VERSIONS)
}

pub fn config_constraints() -> ApiResource {
    dbaas(KIND_CONFIG_CONSTRAINT, RESOURCE_CONFIG_CONSTRAINTS)
}

pub fn ops_requests() -> ApiResource {
    dbaas(KIND_OPS_REQUEST, RESOURCE_OPS_REQUESTS)
}

pub fn config_maps() -> ApiResource {
    ApiResource {
        group: String::new(),
        version: "v1".to_string(),
        api_version: "v1".to_string(),
        kind: KIND_CONFIG_MAP.to_string(),
        plural: RESOURCE_CONFIG_MAPS.to_string(),
    }
}

/// Looks up a known resource type by `apiVersion` and `kind`.
pub fn for_kind(api_version: &str, kind: &str) -> Option<ApiResource> {
    [
        clusters(),
        cluster_definitions(),
        cluster_versions(),
        config_constraints(),
        ops_requests(),
        config_maps(),
    ]
    .into_iter()
    .find(|ar| ar.api_version == api_version && ar.kind == kind)
}

/// Stable key for a resource type, `<group>/<version>/<plural>`.
pub fn resource_key(ar: &ApiResource) -> String {
    format!("{}/{}/{}", ar.group, ar.version, ar.plural)
}

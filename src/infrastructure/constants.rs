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

/// DBaaS API group
pub const DBAAS_GROUP: &str = "dbaas.kubeblocks.io";
pub const DBAAS_VERSION: &str = "v1alpha1";

/// Kinds
pub const KIND_CLUSTER: &str = "Cluster";
pub const KIND_CLUSTER_DEFINITION: &str = "ClusterDefinition";
pub const KIND_CLUSTER_VERSION: &str = "ClusterVersion";
pub const KIND_CONFIG_CONSTRAINT: &str = "ConfigConstraint";
pub const KIND_OPS_REQUEST: &str = "OpsRequest";
pub const KIND_CONFIG_MAP: &str = "ConfigMap";

/// Plural resource names
pub const RESOURCE_CLUSTERS: &str = "clusters";
pub const RESOURCE_CLUSTER_DEFINITIONS: &str = "clusterdefinitions";
pub const RESOURCE_CLUSTER_VERSIONS: &str = "clusterversions";
pub const RESOURCE_CONFIG_CONSTRAINTS: &str = "configconstraints";
pub const RESOURCE_OPS_REQUESTS: &str = "opsrequests";
pub const RESOURCE_CONFIG_MAPS: &str = "configmaps";

/// Resource labels
pub const LABEL_INSTANCE: &str = "app.kubernetes.io/instance";
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const LABEL_MANAGED_BY_VALUE: &str = "kubeblocks";

/// Field manager used for submissions
pub const FIELD_MANAGER: &str = "cluster-ops";

/// Name of the component config map rendered for a config template volume.
pub fn component_config_map_name(cluster: &str, component: &str, volume: &str) -> String {
    format!("{}-{}-{}", cluster, component, volume)
}

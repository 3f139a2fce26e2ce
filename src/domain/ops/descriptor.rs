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
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Replica count meaning "not given on the command line".
pub const REPLICAS_UNSET: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpsType {
    Restart,
    Upgrade,
    VerticalScaling,
    HorizontalScaling,
    VolumeExpansion,
    Reconfiguring,
}

impl OpsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpsType::Restart => "Restart",
            OpsType::Upgrade => "Upgrade",
            OpsType::VerticalScaling => "VerticalScaling",
            OpsType::HorizontalScaling => "HorizontalScaling",
            OpsType::VolumeExpansion => "VolumeExpansion",
            OpsType::Reconfiguring => "Reconfiguring",
        }
    }

    pub fn to_lowercase(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl std::fmt::Display for OpsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OpsType {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Restart" => Ok(OpsType::Restart),
            "Upgrade" => Ok(OpsType::Upgrade),
            "VerticalScaling" => Ok(OpsType::VerticalScaling),
            "HorizontalScaling" => Ok(OpsType::HorizontalScaling),
            "VolumeExpansion" => Ok(OpsType::VolumeExpansion),
            "Reconfiguring" => Ok(OpsType::Reconfiguring),
            _ => Err(OpsError::usage(format!("Invalid operation type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeParams {
    pub cluster_version_ref: String,
}

/// Resource quantities are opaque here; the control plane parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerticalScaleParams {
    pub requests_cpu: Option<String>,
    pub requests_memory: Option<String>,
    pub limits_cpu: Option<String>,
    pub limits_memory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizontalScaleParams {
    pub replicas: i32,
}

impl Default for HorizontalScaleParams {
    fn default() -> Self {
        Self {
            replicas: REPLICAS_UNSET,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeExpandParams {
    pub vct_names: Vec<String>,
    pub storage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconfigureParams {
    /// Raw `--set` entries, each holding one or more `key=value` pairs.
    pub parameters: Vec<String>,
    /// Parsed from `parameters` during validation.
    pub key_values: BTreeMap<String, String>,
    pub template_name: Option<String>,
    pub config_file: Option<String>,
    /// Local file used as the full replacement content.
    pub local_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpsParams {
    Restart,
    Upgrade(UpgradeParams),
    VerticalScale(VerticalScaleParams),
    HorizontalScale(HorizontalScaleParams),
    VolumeExpand(VolumeExpandParams),
    Reconfigure(ReconfigureParams),
}

impl OpsParams {
    pub fn ops_type(&self) -> OpsType {
        match self {
            OpsParams::Restart => OpsType::Restart,
            OpsParams::Upgrade(_) => OpsType::Upgrade,
            OpsParams::VerticalScale(_) => OpsType::VerticalScaling,
            OpsParams::HorizontalScale(_) => OpsType::HorizontalScaling,
            OpsParams::VolumeExpand(_) => OpsType::VolumeExpansion,
            OpsParams::Reconfigure(_) => OpsType::Reconfiguring,
        }
    }
}

/// One requested operation against one cluster.
///
/// The operation kind is fixed by the parameter variant chosen at
/// construction. Mutable access only reaches the inner parameter struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    cluster_name: String,
    namespace: String,
    component_names: Vec<String>,
    pub ops_request_name: Option<String>,
    pub ttl_seconds_after_succeed: Option<i64>,
    params: OpsParams,
}

impl OperationDescriptor {
    pub fn new(
        cluster_name: impl Into<String>,
        namespace: impl Into<String>,
        params: OpsParams,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            namespace: namespace.into(),
            component_names: Vec::new(),
            ops_request_name: None,
            ttl_seconds_after_succeed: None,
            params,
        }
    }

    pub fn with_components<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_component_names(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn ops_type(&self) -> OpsType {
        self.params.ops_type()
    }

    pub fn component_names(&self) -> &[String] {
        &self.component_names
    }

    /// Replaces the component list, dropping duplicates and empty names.
    pub fn set_component_names(&mut self, names: Vec<String>) {
        let mut seen = HashSet::new();
        self.component_names = names
            .into_iter()
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();
    }

    pub fn params(&self) -> &OpsParams {
        &self.params
    }

    pub fn reconfigure_params_mut(&mut self) -> Option<&mut ReconfigureParams> {
        match &mut self.params {
            OpsParams::Reconfigure(params) => Some(params),
            _ => None,
        }
    }
}

/// A descriptor that passed validation and confirmation. Read-only.
#[derive(Debug, Clone)]
pub struct ValidatedOperation {
    descriptor: OperationDescriptor,
}

impl ValidatedOperation {
    pub(crate) fn new(descriptor: OperationDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ops_type_from_params() {
        let descriptor = OperationDescriptor::new(
            "mycluster",
            "default",
            OpsParams::HorizontalScale(HorizontalScaleParams::default()),
        );
        assert_eq!(descriptor.ops_type(), OpsType::HorizontalScaling);
        assert_eq!(descriptor.ops_type().to_lowercase(), "horizontalscaling");
        assert_eq!("VolumeExpansion".parse::<OpsType>().unwrap(), OpsType::VolumeExpansion);
        assert!("Scale".parse::<OpsType>().is_err());
    }

    #[test]
    fn test_component_names_are_an_ordered_set() {
        let descriptor = OperationDescriptor::new("c", "default", OpsParams::Restart)
            .with_components(["proxy", "mysql", "proxy", "", "mysql"]);
        assert_eq!(descriptor.component_names(), ["proxy", "mysql"]);
    }

    #[test]
    fn test_reconfigure_params_mut_only_for_reconfigure() {
        let mut restart = OperationDescriptor::new("c", "default", OpsParams::Restart);
        assert!(restart.reconfigure_params_mut().is_none());

        let mut reconfigure = OperationDescriptor::new(
            "c",
            "default",
            OpsParams::Reconfigure(ReconfigureParams::default()),
        );
        reconfigure.reconfigure_params_mut().unwrap().template_name = Some("tpl".to_string());
        assert_eq!(reconfigure.ops_type(), OpsType::Reconfiguring);
    }

    #[test]
    fn test_replicas_default_is_unset() {
        assert_eq!(HorizontalScaleParams::default().replicas, REPLICAS_UNSET);
    }
}

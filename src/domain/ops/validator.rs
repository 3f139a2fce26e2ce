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

use super::descriptor::{
    HorizontalScaleParams, OperationDescriptor, OpsParams, OpsType, UpgradeParams,
    VolumeExpandParams, REPLICAS_UNSET,
};
use super::reconfigure::{fill_component_name, ReconfigureValidator};
use crate::domain::cluster::record::get_restartable_components;
use crate::infrastructure::kubernetes::ResourceAccessor;
use crate::shared::error::OpsError;

pub struct OpsValidator<'a> {
    accessor: &'a dyn ResourceAccessor,
}

impl<'a> OpsValidator<'a> {
    pub fn new(accessor: &'a dyn ResourceAccessor) -> Self {
        Self { accessor }
    }

    /// Fill in component names the user left out.
    ///
    /// Restart falls back to every restartable component, Reconfiguring to
    /// the only component of the cluster.
    pub async fn complete(&self, descriptor: &mut OperationDescriptor) -> Result<(), OpsError> {
        validate_cluster_name(descriptor)?;
        if !descriptor.component_names().is_empty() {
            return Ok(());
        }

        match descriptor.ops_type() {
            OpsType::Restart => {
                let names = get_restartable_components(
                    self.accessor,
                    descriptor.cluster_name(),
                    descriptor.namespace(),
                )
                .await?;
                if names.is_empty() {
                    return Err(OpsError::usage(format!(
                        "cluster {} has no restartable components",
                        descriptor.cluster_name()
                    )));
                }
                tracing::info!(components = ?names, "restarting all restartable components");
                descriptor.set_component_names(names);
            }
            OpsType::Reconfiguring => {
                let name = fill_component_name(
                    self.accessor,
                    descriptor.cluster_name(),
                    descriptor.namespace(),
                )
                .await?;
                tracing::debug!(component = %name, "auto-filled component");
                descriptor.set_component_names(vec![name]);
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate command flags against the operation kind.
    pub async fn validate(&self, descriptor: &mut OperationDescriptor) -> Result<(), OpsError> {
        validate_flags(descriptor)?;
        if descriptor.ops_type() != OpsType::Reconfiguring {
            return Ok(());
        }

        if descriptor.component_names().is_empty() {
            return Err(OpsError::usage("missing component-names"));
        }
        self.validate_reconfiguring(descriptor).await
    }

    async fn validate_reconfiguring(
        &self,
        descriptor: &mut OperationDescriptor,
    ) -> Result<(), OpsError> {
        let cluster_name = descriptor.cluster_name().to_string();
        let namespace = descriptor.namespace().to_string();
        let component_names = descriptor.component_names().to_vec();
        let Some(params) = descriptor.reconfigure_params_mut() else {
            return Ok(());
        };
        ReconfigureValidator::new(self.accessor, &cluster_name, &namespace)
            .validate(&component_names, params)
            .await
    }
}

/// Checks that need no lookups: the cluster name, then the flags of every
/// kind whose components cannot be auto-filled.
pub fn validate_flags(descriptor: &OperationDescriptor) -> Result<(), OpsError> {
    validate_cluster_name(descriptor)?;

    match descriptor.params() {
        OpsParams::Restart | OpsParams::Reconfigure(_) => return Ok(()),
        OpsParams::Upgrade(params) => return validate_upgrade(params),
        _ => {}
    }

    if descriptor.component_names().is_empty() {
        return Err(OpsError::usage("missing component-names"));
    }

    match descriptor.params() {
        OpsParams::HorizontalScale(params) => validate_horizontal_scaling(params),
        OpsParams::VolumeExpand(params) => validate_volume_expansion(params),
        _ => Ok(()),
    }
}

fn validate_cluster_name(descriptor: &OperationDescriptor) -> Result<(), OpsError> {
    if descriptor.cluster_name().is_empty() {
        return Err(OpsError::usage("missing cluster name"));
    }
    Ok(())
}

fn validate_upgrade(params: &UpgradeParams) -> Result<(), OpsError> {
    if params.cluster_version_ref.is_empty() {
        return Err(OpsError::usage("missing cluster-version"));
    }
    Ok(())
}

fn validate_horizontal_scaling(params: &HorizontalScaleParams) -> Result<(), OpsError> {
    if params.replicas < REPLICAS_UNSET {
        return Err(OpsError::usage("replicas required natural number"));
    }
    if params.replicas == REPLICAS_UNSET {
        return Err(OpsError::usage("missing replicas"));
    }
    Ok(())
}

fn validate_volume_expansion(params: &VolumeExpandParams) -> Result<(), OpsError> {
    if params.vct_names.is_empty() {
        return Err(OpsError::usage("missing volume-claim-template-names"));
    }
    if params.storage.is_empty() {
        return Err(OpsError::usage("missing storage"));
    }
    Ok(())
}

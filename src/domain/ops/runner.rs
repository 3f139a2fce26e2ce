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

use super::confirm::ConfirmationGate;
use super::descriptor::{OperationDescriptor, ValidatedOperation};
use super::validator::OpsValidator;
use crate::infrastructure::kubernetes::resources::{gvr, OpsRequestBuilder};
use crate::infrastructure::kubernetes::{KubeResourceAccessor, ResourceAccessor};
use crate::shared::error::OpsError;
use kube::api::DynamicObject;

/// Completes, validates, confirms and submits operation requests.
pub struct OpsRunner {
    accessor: Box<dyn ResourceAccessor>,
    gate: Box<dyn ConfirmationGate>,
}

impl OpsRunner {
    pub fn new(accessor: Box<dyn ResourceAccessor>, gate: Box<dyn ConfirmationGate>) -> Self {
        Self { accessor, gate }
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
        gate: Box<dyn ConfirmationGate>,
    ) -> Result<Self, OpsError> {
        let accessor = KubeResourceAccessor::new_with_config(kubeconfig_path, context).await?;
        Ok(Self::new(Box::new(accessor), gate))
    }

    /// Run completion and validation, then ask for confirmation.
    pub async fn prepare(
        &mut self,
        mut descriptor: OperationDescriptor,
    ) -> Result<ValidatedOperation, OpsError> {
        let validator = OpsValidator::new(self.accessor.as_ref());
        validator.complete(&mut descriptor).await?;
        validator.validate(&mut descriptor).await?;

        let names = vec![descriptor.cluster_name().to_string()];
        if !self.gate.confirm(&names)? {
            return Err(OpsError::Aborted(format!(
                "{} of cluster {} was not confirmed",
                descriptor.ops_type(),
                descriptor.cluster_name()
            )));
        }

        Ok(ValidatedOperation::new(descriptor))
    }

    /// Render and create the OpsRequest.
    pub async fn submit(&self, operation: ValidatedOperation) -> Result<DynamicObject, OpsError> {
        let namespace = operation.descriptor().namespace().to_string();
        let request = OpsRequestBuilder::new(operation).build()?;
        let created = self
            .accessor
            .create(&gvr::ops_requests(), &namespace, &request)
            .await?;
        tracing::info!(
            name = created.metadata.name.as_deref().unwrap_or_default(),
            namespace = %namespace,
            "created OpsRequest"
        );
        Ok(created)
    }

    pub async fn run(&mut self, descriptor: OperationDescriptor) -> Result<DynamicObject, OpsError> {
        let operation = self.prepare(descriptor).await?;
        self.submit(operation).await
    }
}

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

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsError {
    /// Missing or invalid user input.
    #[error("{0}")]
    Usage(String),

    /// Several candidates exist and nothing selects one of them.
    #[error("{0}")]
    Ambiguity(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Kubernetes API error: {0}")]
    Remote(String),

    /// Kubeconfig could not be found, parsed or turned into a client.
    #[error("Invalid kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("failed to validate updated parameters of [{file}]: {detail}")]
    SchemaViolation { file: String, detail: String },

    #[error("failed to check if {} exists: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation aborted: {0}")]
    Aborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for OpsError {
    fn from(err: kube::Error) -> Self {
        OpsError::Remote(err.to_string())
    }
}

impl OpsError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn ambiguity(message: impl Into<String>) -> Self {
        Self::Ambiguity(message.into())
    }

    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Self::InvalidResource(message.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn schema_violation(file: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaViolation {
            file: file.into(),
            detail: detail.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

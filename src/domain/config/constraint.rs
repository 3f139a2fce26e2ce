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

//! Config constraint lookup and parameter checks

use crate::domain::cluster::record::spec_of;
use crate::infrastructure::kubernetes::resources::gvr;
use crate::infrastructure::kubernetes::ResourceAccessor;
use crate::shared::error::OpsError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigConstraintSpec {
    /// Property under which the parameters live in `configuration_schema`.
    pub cfg_schema_top_level_name: String,
    pub configuration_schema: Option<ConfigurationSchema>,
    pub static_parameters: Vec<String>,
    pub dynamic_parameters: Vec<String>,
    pub immutable_parameters: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationSchema {
    /// OpenAPI v3 schema of the configuration file.
    pub schema: Option<Value>,
}

impl ConfigConstraintSpec {
    /// Whether updating `keys` restarts the component. A key counts as
    /// dynamic only when the constraint lists dynamic parameters and it is
    /// one of them.
    pub fn requires_restart<'a>(&self, mut keys: impl Iterator<Item = &'a String>) -> bool {
        keys.any(|key| {
            self.static_parameters.contains(key)
                || (!self.dynamic_parameters.is_empty() && !self.dynamic_parameters.contains(key))
        })
    }

    fn parameter_schema(&self) -> Option<&Value> {
        let schema = self.configuration_schema.as_ref()?.schema.as_ref()?;
        if self.cfg_schema_top_level_name.is_empty() {
            return Some(schema);
        }
        schema
            .get("properties")
            .and_then(|p| p.get(&self.cfg_schema_top_level_name))
            .or(Some(schema))
    }
}

/// Config constraints are cluster scoped.
pub async fn get_config_constraint(
    accessor: &dyn ResourceAccessor,
    name: &str,
) -> Result<ConfigConstraintSpec, OpsError> {
    let object = accessor
        .get(&gvr::config_constraints(), None, name)
        .await?;
    spec_of(&object)
}

/// Check updated parameters of `file` against the constraint.
pub fn validate_updated_params(
    spec: &ConfigConstraintSpec,
    file: &str,
    key_values: &BTreeMap<String, String>,
) -> Result<(), OpsError> {
    for key in key_values.keys() {
        if spec.immutable_parameters.contains(key) {
            return Err(OpsError::schema_violation(
                file,
                format!("parameter [{}] is immutable and cannot be updated", key),
            ));
        }
    }

    let Some(schema) = spec.parameter_schema() else {
        tracing::debug!(file, "config constraint has no schema, skipping type checks");
        return Ok(());
    };

    let properties = schema.get("properties").and_then(Value::as_object);
    let additional_allowed = schema.get("additionalProperties") != Some(&Value::Bool(false));

    for (key, value) in key_values {
        match properties.and_then(|p| p.get(key)) {
            Some(property) => check_value(key, value, property)
                .map_err(|detail| OpsError::schema_violation(file, detail))?,
            None if properties.is_some() && !additional_allowed => {
                return Err(OpsError::schema_violation(
                    file,
                    format!("parameter [{}] is not defined in the schema", key),
                ));
            }
            None => {}
        }
    }

    Ok(())
}

fn check_value(key: &str, value: &str, property: &Value) -> Result<(), String> {
    let number = match property.get("type").and_then(Value::as_str) {
        Some("integer") => Some(
            value
                .parse::<i64>()
                .map_err(|_| format!("parameter [{}]: [{}] is not an integer", key, value))?
                as f64,
        ),
        Some("number") => Some(
            value
                .parse::<f64>()
                .map_err(|_| format!("parameter [{}]: [{}] is not a number", key, value))?,
        ),
        Some("boolean") => {
            if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
                return Err(format!("parameter [{}]: [{}] is not a boolean", key, value));
            }
            None
        }
        _ => None,
    };

    if let Some(n) = number {
        if let Some(min) = property.get("minimum").and_then(Value::as_f64) {
            if n < min {
                return Err(format!(
                    "parameter [{}]: [{}] is less than minimum {}",
                    key, value, min
                ));
            }
        }
        if let Some(max) = property.get("maximum").and_then(Value::as_f64) {
            if n > max {
                return Err(format!(
                    "parameter [{}]: [{}] is greater than maximum {}",
                    key, value, max
                ));
            }
        }
    }

    if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
        let allowed: Vec<String> = allowed
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        if !allowed.iter().any(|a| a == value) {
            return Err(format!(
                "parameter [{}]: [{}] is not one of [{}]",
                key,
                value,
                allowed.join(", ")
            ));
        }
    }

    if let Some(pattern) = property.get("pattern").and_then(Value::as_str) {
        let re = Regex::new(pattern)
            .map_err(|e| format!("parameter [{}]: invalid pattern {}: {}", key, pattern, e))?;
        if !re.is_match(value) {
            return Err(format!(
                "parameter [{}]: [{}] does not match pattern {}",
                key, value, pattern
            ));
        }
    }

    Ok(())
}

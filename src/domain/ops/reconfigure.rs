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

//! Reconfiguring validation
//!
//! Steps run in a fixed order and stop at the first failure:
//! component count, local file, parameter parsing, template, config file,
//! constraint. The config file is looked up in the config map of the chosen
//! template, so template resolution must come first.

use super::descriptor::ReconfigureParams;
use super::params::parse_key_values;
use crate::domain::cluster::record::get_components_from_cluster;
use crate::domain::config::constraint::{get_config_constraint, validate_updated_params};
use crate::domain::config::template::{get_config_map_data, get_config_template_list, ConfigTemplate};
use crate::infrastructure::constants::component_config_map_name;
use crate::infrastructure::kubernetes::ResourceAccessor;
use crate::shared::error::OpsError;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Pick the config template to update.
pub fn resolve_template(
    templates: &[ConfigTemplate],
    requested: Option<&str>,
) -> Result<ConfigTemplate, OpsError> {
    if templates.is_empty() {
        return Err(OpsError::usage(
            "not support reconfiguring because there is no config template.",
        ));
    }

    match requested {
        None if templates.len() > 1 => Err(OpsError::ambiguity(
            "when multi templates exist, must specify which template to use.",
        )),
        None => Ok(templates[0].clone()),
        Some(name) => templates
            .iter()
            .find(|tpl| tpl.name == name)
            .cloned()
            .ok_or_else(|| {
                OpsError::usage(format!("specify template name[{}] is not exist.", name))
            }),
    }
}

/// Pick the file (config map key) to update.
pub fn resolve_config_file(
    data: &BTreeMap<String, String>,
    requested: Option<&str>,
) -> Result<String, OpsError> {
    if data.is_empty() {
        return Err(OpsError::usage(
            "not support reconfiguring because there is no config file.",
        ));
    }

    match requested {
        None if data.len() == 1 => Ok(data.keys().next().cloned().unwrap_or_default()),
        None => Err(OpsError::ambiguity(
            "when multi config files exist, must specify which file to use.",
        )),
        Some(name) if data.contains_key(name) => Ok(name.to_string()),
        Some(name) => Err(OpsError::usage(format!(
            "specify file name[{}] is not exist.",
            name
        ))),
    }
}

/// With no component given, adopt the only component of the cluster.
pub async fn fill_component_name(
    accessor: &dyn ResourceAccessor,
    cluster_name: &str,
    namespace: &str,
) -> Result<String, OpsError> {
    let mut names = get_components_from_cluster(accessor, cluster_name, namespace).await?;
    if names.len() != 1 {
        return Err(OpsError::ambiguity(
            "when multi component exist, must specify which component to use.",
        ));
    }
    Ok(names.remove(0))
}

pub struct ReconfigureValidator<'a> {
    accessor: &'a dyn ResourceAccessor,
    cluster_name: &'a str,
    namespace: &'a str,
}

impl<'a> ReconfigureValidator<'a> {
    pub fn new(accessor: &'a dyn ResourceAccessor, cluster_name: &'a str, namespace: &'a str) -> Self {
        Self {
            accessor,
            cluster_name,
            namespace,
        }
    }

    /// Validates `params` and writes back the resolved parameters, template
    /// and file names.
    pub async fn validate(
        &self,
        component_names: &[String],
        params: &mut ReconfigureParams,
    ) -> Result<(), OpsError> {
        if component_names.len() != 1 {
            return Err(OpsError::usage("reconfiguring only support one component."));
        }
        let component_name = &component_names[0];

        if let Some(path) = &params.local_file {
            std::fs::metadata(path).map_err(|source| OpsError::LocalFile {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "using local file as replacement configuration");
            return Ok(());
        }

        if params.parameters.is_empty() {
            return Err(OpsError::usage(
                "reconfiguring required configure file or updated parameters.",
            ));
        }
        params.key_values = parse_key_values(&params.parameters)?;

        let tpl = self.validate_template(component_name, params).await?;
        let file = self.validate_config_file(component_name, &tpl, params).await?;
        self.validate_config_params(&tpl, &file, &params.key_values)
            .await
    }

    async fn validate_template(
        &self,
        component_name: &str,
        params: &mut ReconfigureParams,
    ) -> Result<ConfigTemplate, OpsError> {
        let templates =
            get_config_template_list(self.accessor, self.cluster_name, self.namespace, component_name)
                .await?;
        let tpl = resolve_template(&templates, non_empty(params.template_name.as_ref()))?;
        if params.template_name.as_deref() != Some(tpl.name.as_str()) {
            debug!(template = %tpl.name, "auto-filled config template");
        }
        params.template_name = Some(tpl.name.clone());
        Ok(tpl)
    }

    async fn validate_config_file(
        &self,
        component_name: &str,
        tpl: &ConfigTemplate,
        params: &mut ReconfigureParams,
    ) -> Result<String, OpsError> {
        let cm_name = component_config_map_name(self.cluster_name, component_name, &tpl.volume_name);
        let data = get_config_map_data(self.accessor, &cm_name, self.namespace).await?;
        let file = resolve_config_file(&data, non_empty(params.config_file.as_ref()))?;
        if params.config_file.as_deref() != Some(file.as_str()) {
            debug!(config_map = %cm_name, file = %file, "auto-filled config file");
        }
        params.config_file = Some(file.clone());
        Ok(file)
    }

    async fn validate_config_params(
        &self,
        tpl: &ConfigTemplate,
        file: &str,
        key_values: &BTreeMap<String, String>,
    ) -> Result<(), OpsError> {
        if tpl.config_constraint_ref.is_empty() {
            warn!(template = %tpl.name, "config template has no constraint, parameters are not checked");
            return Ok(());
        }
        let constraint = get_config_constraint(self.accessor, &tpl.config_constraint_ref).await?;
        validate_updated_params(&constraint, file, key_values)?;
        if constraint.requires_restart(key_values.keys()) {
            info!(file, "updated parameters are static, the component will be restarted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tpl(name: &str) -> ConfigTemplate {
        ConfigTemplate {
            name: name.to_string(),
            volume_name: format!("{}-config", name),
            ..Default::default()
        }
    }

    fn files(keys: &[&str]) -> BTreeMap<String, String> {
        keys.iter().map(|k| (k.to_string(), String::new())).collect()
    }

    #[test]
    fn test_resolve_template_single_autofill() {
        let selected = resolve_template(&[tpl("mysql")], None).unwrap();
        assert_eq!(selected.name, "mysql");
    }

    #[test]
    fn test_resolve_template_single_must_match() {
        assert!(resolve_template(&[tpl("mysql")], Some("mysql")).is_ok());
        let err = resolve_template(&[tpl("mysql")], Some("other")).unwrap_err();
        assert!(err.to_string().contains("not exist"));
    }

    #[test]
    fn test_resolve_template_multiple() {
        let templates = [tpl("a"), tpl("b")];
        let err = resolve_template(&templates, None).unwrap_err();
        assert!(matches!(err, OpsError::Ambiguity(_)));
        assert!(err.to_string().contains("must specify which template"));

        assert_eq!(resolve_template(&templates, Some("b")).unwrap().name, "b");
        assert!(resolve_template(&templates, Some("c"))
            .unwrap_err()
            .to_string()
            .contains("not exist"));
    }

    #[test]
    fn test_resolve_template_empty() {
        let err = resolve_template(&[], Some("a")).unwrap_err();
        assert!(err.to_string().contains("no config template"));
    }

    #[test]
    fn test_resolve_config_file() {
        assert_eq!(resolve_config_file(&files(&["my.cnf"]), None).unwrap(), "my.cnf");
        assert_eq!(
            resolve_config_file(&files(&["a.cnf", "b.cnf"]), Some("b.cnf")).unwrap(),
            "b.cnf"
        );

        let err = resolve_config_file(&files(&[]), None).unwrap_err();
        assert!(err.to_string().contains("no config file"));

        let err = resolve_config_file(&files(&["my.cnf"]), Some("other.cnf")).unwrap_err();
        assert!(err.to_string().contains("not exist"));

        let err = resolve_config_file(&files(&["a.cnf", "b.cnf"]), None).unwrap_err();
        assert!(matches!(err, OpsError::Ambiguity(_)));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(&String::new())), None);
        assert_eq!(non_empty(Some(&"x".to_string())), Some("x"));
    }
}

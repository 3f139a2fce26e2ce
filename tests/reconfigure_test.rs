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

use cluster_ops::domain::ops::ReconfigureParams;
use cluster_ops::infrastructure::constants::component_config_map_name;
use cluster_ops::infrastructure::kubernetes::fake::{
    self, CLUSTER_NAME, COMPONENT_NAME, COMPONENT_TYPE, NAMESPACE,
};
use cluster_ops::infrastructure::kubernetes::resources::gvr;
use cluster_ops::*;
use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::sync::Arc;

mod test_utils {
    use super::*;

    pub const VOLUME: &str = "mysql-config";
    pub const CONSTRAINT: &str = "mysql-constraint";

    /// Cluster with one component whose definition carries `templates`.
    pub fn fixture(templates: Vec<Value>, files: &[(&str, &str)]) -> FakeResourceAccessor {
        let fake = FakeResourceAccessor::with_objects([
            (
                gvr::clusters(),
                fake::cluster(CLUSTER_NAME, NAMESPACE, &[(COMPONENT_NAME, COMPONENT_TYPE)]),
            ),
            (
                gvr::cluster_definitions(),
                fake::cluster_definition(COMPONENT_TYPE, templates),
            ),
            (
                gvr::cluster_versions(),
                fake::cluster_version(COMPONENT_TYPE, vec![]),
            ),
            (
                gvr::config_constraints(),
                fake::config_constraint(
                    CONSTRAINT,
                    json!({
                        "cfgSchemaTopLevelName": "MysqlParameter",
                        "configurationSchema": {
                            "schema": {
                                "properties": {
                                    "MysqlParameter": {
                                        "properties": {
                                            "max_connections": { "type": "integer", "minimum": 1 },
                                            "general_log": { "type": "string", "enum": ["ON", "OFF"] }
                                        }
                                    }
                                }
                            }
                        },
                        "immutableParameters": ["port"]
                    }),
                ),
            ),
        ]);
        fake.insert(
            &gvr::config_maps(),
            fake::config_map(
                &component_config_map_name(CLUSTER_NAME, COMPONENT_NAME, VOLUME),
                NAMESPACE,
                files,
            ),
        );
        fake
    }

    pub fn single_template() -> Vec<Value> {
        vec![fake::config_template("mysql-3node", VOLUME, CONSTRAINT)]
    }

    pub fn reconfigure(params: ReconfigureParams) -> OperationDescriptor {
        OperationDescriptor::new(CLUSTER_NAME, NAMESPACE, OpsParams::Reconfigure(params))
    }

    pub fn set(parameters: &[&str]) -> ReconfigureParams {
        ReconfigureParams {
            parameters: parameters.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub async fn complete_and_validate(
        accessor: &dyn ResourceAccessor,
        mut descriptor: OperationDescriptor,
    ) -> Result<OperationDescriptor, OpsError> {
        let validator = OpsValidator::new(accessor);
        validator.complete(&mut descriptor).await?;
        validator.validate(&mut descriptor).await?;
        Ok(descriptor)
    }

    pub fn reconfigure_params(descriptor: &OperationDescriptor) -> &ReconfigureParams {
        match descriptor.params() {
            OpsParams::Reconfigure(params) => params,
            other => panic!("unexpected params {:?}", other),
        }
    }
}

use test_utils::*;

#[tokio::test]
async fn test_auto_fills_component_template_and_file() {
    let fake = fixture(single_template(), &[("my.cnf", "[mysqld]\n")]);

    let descriptor = complete_and_validate(
        &fake,
        reconfigure(set(&["max_connections=1000,general_log=OFF"])),
    )
    .await
    .unwrap();

    assert_eq!(descriptor.component_names(), [COMPONENT_NAME]);
    let params = reconfigure_params(&descriptor);
    assert_eq!(params.template_name.as_deref(), Some("mysql-3node"));
    assert_eq!(params.config_file.as_deref(), Some("my.cnf"));
    assert_eq!(params.key_values["max_connections"], "1000");
    assert_eq!(params.key_values["general_log"], "OFF");
}

#[tokio::test]
async fn test_component_fill_fails_with_several_components() {
    let fake = FakeResourceAccessor::with_objects([(
        gvr::clusters(),
        fake::cluster(
            CLUSTER_NAME,
            NAMESPACE,
            &[("mysql", COMPONENT_TYPE), ("proxy", COMPONENT_TYPE)],
        ),
    )]);

    let err = complete_and_validate(&fake, reconfigure(set(&["a=1"])))
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::Ambiguity(_)));
    assert_eq!(
        err.to_string(),
        "when multi component exist, must specify which component to use."
    );
}

#[tokio::test]
async fn test_only_one_component_allowed() {
    let fake = FakeResourceAccessor::new();
    let descriptor = reconfigure(set(&["a=1"])).with_components(["mysql", "proxy"]);

    let err = complete_and_validate(&fake, descriptor).await.unwrap_err();
    assert_eq!(err.to_string(), "reconfiguring only support one component.");
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn test_requires_parameters_or_local_file() {
    let fake = FakeResourceAccessor::new();
    let descriptor = reconfigure(ReconfigureParams::default()).with_components([COMPONENT_NAME]);

    let err = complete_and_validate(&fake, descriptor).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "reconfiguring required configure file or updated parameters."
    );
}

#[tokio::test]
async fn test_malformed_parameter() {
    let fake = FakeResourceAccessor::new();
    let descriptor = reconfigure(set(&["a=1,broken"])).with_components([COMPONENT_NAME]);

    let err = complete_and_validate(&fake, descriptor).await.unwrap_err();
    assert_eq!(err.to_string(), "updated parameter formatter: key=value");
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn test_no_config_template() {
    let fake = fixture(vec![], &[("my.cnf", "")]);

    let err = complete_and_validate(&fake, reconfigure(set(&["a=1"])))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "not support reconfiguring because there is no config template."
    );
}

#[tokio::test]
async fn test_several_templates_need_a_name() {
    let templates = vec![
        fake::config_template("mysql-3node", VOLUME, CONSTRAINT),
        fake::config_template("mysql-proxy", "proxy-config", ""),
    ];
    let fake = fixture(templates, &[("my.cnf", "")]);

    let err = complete_and_validate(&fake, reconfigure(set(&["max_connections=10"])))
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::Ambiguity(_)));

    let mut params = set(&["max_connections=10"]);
    params.template_name = Some("mysql-3node".to_string());
    let descriptor = complete_and_validate(&fake, reconfigure(params)).await.unwrap();
    assert_eq!(reconfigure_params(&descriptor).config_file.as_deref(), Some("my.cnf"));
}

#[tokio::test]
async fn test_unknown_template_name() {
    let fake = fixture(single_template(), &[("my.cnf", "")]);
    let mut params = set(&["a=1"]);
    params.template_name = Some("nope".to_string());

    let err = complete_and_validate(&fake, reconfigure(params)).await.unwrap_err();
    assert_eq!(err.to_string(), "specify template name[nope] is not exist.");
}

#[tokio::test]
async fn test_config_file_resolution() {
    let fake = fixture(single_template(), &[("my.cnf", ""), ("extra.cnf", "")]);

    let err = complete_and_validate(&fake, reconfigure(set(&["max_connections=10"])))
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::Ambiguity(_)));

    let mut params = set(&["max_connections=10"]);
    params.config_file = Some("other.cnf".to_string());
    let err = complete_and_validate(&fake, reconfigure(params)).await.unwrap_err();
    assert_eq!(err.to_string(), "specify file name[other.cnf] is not exist.");

    let mut params = set(&["max_connections=10"]);
    params.config_file = Some("extra.cnf".to_string());
    assert!(complete_and_validate(&fake, reconfigure(params)).await.is_ok());
}

#[tokio::test]
async fn test_empty_config_map() {
    let fake = fixture(single_template(), &[]);

    let err = complete_and_validate(&fake, reconfigure(set(&["a=1"])))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "not support reconfiguring because there is no config file."
    );
}

#[tokio::test]
async fn test_schema_violation() {
    let fake = fixture(single_template(), &[("my.cnf", "")]);

    let err = complete_and_validate(&fake, reconfigure(set(&["max_connections=many"])))
        .await
        .unwrap_err();
    assert!(matches!(err, OpsError::SchemaViolation { .. }));
    assert!(err.to_string().contains("[my.cnf]"));

    let err = complete_and_validate(&fake, reconfigure(set(&["port=3307"])))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("immutable"));
}

#[tokio::test]
async fn test_template_without_constraint_skips_schema() {
    let fake = fixture(
        vec![fake::config_template("mysql-3node", VOLUME, "")],
        &[("my.cnf", "")],
    );

    assert!(complete_and_validate(&fake, reconfigure(set(&["max_connections=many"])))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_local_file_skips_lookups_and_parameter_parsing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[mysqld]").unwrap();

    let fake = FakeResourceAccessor::new();
    let params = ReconfigureParams {
        local_file: Some(file.path().to_path_buf()),
        parameters: vec!["bad_token".to_string()],
        ..Default::default()
    };
    let descriptor = reconfigure(params).with_components([COMPONENT_NAME]);

    let descriptor = complete_and_validate(&fake, descriptor).await.unwrap();
    assert!(reconfigure_params(&descriptor).key_values.is_empty());
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn test_missing_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeResourceAccessor::new();
    let params = ReconfigureParams {
        local_file: Some(dir.path().join("absent.cnf")),
        ..Default::default()
    };
    let descriptor = reconfigure(params).with_components([COMPONENT_NAME]);

    let err = complete_and_validate(&fake, descriptor).await.unwrap_err();
    assert!(matches!(err, OpsError::LocalFile { .. }));
    assert!(err.to_string().starts_with("failed to check if"));
}

#[tokio::test]
async fn test_reconfigure_end_to_end() {
    let fake = Arc::new(fixture(single_template(), &[("my.cnf", "")]));
    let gate = PromptConfirmation::new(
        Cursor::new(format!("{}\n", CLUSTER_NAME).into_bytes()),
        Vec::new(),
    );
    let mut runner = OpsRunner::new(Box::new(fake.clone()), Box::new(gate));

    runner
        .run(reconfigure(set(&["max_connections=1000"])))
        .await
        .unwrap();

    let stored = fake.objects(&gvr::ops_requests(), Some(NAMESPACE));
    assert_eq!(stored.len(), 1);
    let reconfigure = &stored[0].data["spec"]["reconfigure"];
    assert_eq!(reconfigure["componentName"], COMPONENT_NAME);
    let configuration = &reconfigure["configurations"][0];
    assert_eq!(configuration["name"], "mysql-3node");
    assert_eq!(configuration["keys"][0]["key"], "my.cnf");
    assert_eq!(
        configuration["keys"][0]["parameters"][0],
        json!({ "key": "max_connections", "value": "1000" })
    );
}

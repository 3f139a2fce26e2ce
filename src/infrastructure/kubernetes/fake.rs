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

//! In-memory resource accessor and record fixtures for tests

use super::client::ResourceAccessor;
use super::resources::gvr;
use crate::shared::error::OpsError;
use kube::api::{ApiResource, DynamicObject};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const CLUSTER_NAME: &str = "fake-cluster-name";
pub const NAMESPACE: &str = "default";
pub const CLUSTER_DEF_NAME: &str = "fake-cluster-definition";
pub const CLUSTER_VERSION_NAME: &str = "fake-cluster-version";
pub const COMPONENT_NAME: &str = "fake-component-name";
pub const COMPONENT_TYPE: &str = "fake-component-type";

/// (resource key, namespace or "", name)
type ObjectKey = (String, String, String);

#[derive(Default)]
pub struct FakeResourceAccessor {
    objects: Mutex<BTreeMap<ObjectKey, DynamicObject>>,
    requests: AtomicUsize,
    generated: AtomicUsize,
}

impl FakeResourceAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(objects: impl IntoIterator<Item = (ApiResource, DynamicObject)>) -> Self {
        let fake = Self::new();
        for (resource, object) in objects {
            fake.insert(&resource, object);
        }
        fake
    }

    /// Loads a multi-document YAML stream of records.
    pub fn from_yaml(yaml: &str) -> Result<Self, OpsError> {
        let fake = Self::new();
        for document in serde_yaml::Deserializer::from_str(yaml) {
            let object = DynamicObject::deserialize(document)?;
            let types = object
                .types
                .as_ref()
                .ok_or_else(|| OpsError::invalid_resource("record without apiVersion/kind"))?;
            let resource = gvr::for_kind(&types.api_version, &types.kind).ok_or_else(|| {
                OpsError::invalid_resource(format!(
                    "unknown resource type {}/{}",
                    types.api_version, types.kind
                ))
            })?;
            fake.insert(&resource, object);
        }
        Ok(fake)
    }

    pub fn insert(&self, resource: &ApiResource, object: DynamicObject) {
        let key = object_key(
            resource,
            object.metadata.namespace.as_deref(),
            object.metadata.name.as_deref().unwrap_or_default(),
        );
        self.lock().insert(key, object);
    }

    /// Number of get/list/create calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn objects(&self, resource: &ApiResource, namespace: Option<&str>) -> Vec<DynamicObject> {
        let prefix = gvr::resource_key(resource);
        let namespace = namespace.unwrap_or_default();
        self.lock()
            .iter()
            .filter(|((key, ns, _), _)| *key == prefix && ns == namespace)
            .map(|(_, object)| object.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ObjectKey, DynamicObject>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn object_key(resource: &ApiResource, namespace: Option<&str>, name: &str) -> ObjectKey {
    (
        gvr::resource_key(resource),
        namespace.unwrap_or_default().to_string(),
        name.to_string(),
    )
}

fn matches_selector(object: &DynamicObject, selector: Option<&str>) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    let labels = object.metadata.labels.clone().unwrap_or_default();
    selector
        .split(',')
        .filter(|term| !term.is_empty())
        .all(|term| match term.split_once('=') {
            Some((k, v)) => labels.get(k.trim()).map(String::as_str) == Some(v.trim()),
            None => labels.contains_key(term.trim()),
        })
}

#[async_trait::async_trait]
impl ResourceAccessor for FakeResourceAccessor {
    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<DynamicObject, OpsError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.lock()
            .get(&object_key(resource, namespace, name))
            .cloned()
            .ok_or_else(|| OpsError::not_found(&resource.kind, name, namespace.unwrap_or_default()))
    }

    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        label_selector: Option<&str>,
    ) -> Result<Vec<DynamicObject>, OpsError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects(resource, namespace)
            .into_iter()
            .filter(|object| matches_selector(object, label_selector))
            .collect())
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: &str,
        object: &DynamicObject,
    ) -> Result<DynamicObject, OpsError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let mut created = object.clone();
        created.metadata.namespace = Some(namespace.to_string());
        if created.metadata.name.is_none() {
            let prefix = created.metadata.generate_name.clone().ok_or_else(|| {
                OpsError::invalid_resource("name or generateName is required")
            })?;
            let n = self.generated.fetch_add(1, Ordering::SeqCst);
            created.metadata.name = Some(format!("{}{:05}", prefix, n));
        }

        let name = created.metadata.name.clone().unwrap_or_default();
        let key = object_key(resource, Some(namespace), &name);
        let mut objects = self.lock();
        if objects.contains_key(&key) {
            return Err(OpsError::Remote(format!(
                "{} \"{}\" already exists",
                resource.plural, name
            )));
        }
        objects.insert(key, created.clone());
        Ok(created)
    }
}

/// Cluster record with the given `(name, type)` components.
pub fn cluster(name: &str, namespace: &str, components: &[(&str, &str)]) -> DynamicObject {
    let components: Vec<Value> = components
        .iter()
        .map(|(name, component_type)| json!({ "name": name, "type": component_type }))
        .collect();
    DynamicObject::new(name, &gvr::clusters())
        .within(namespace)
        .data(json!({
            "spec": {
                "clusterDefinitionRef": CLUSTER_DEF_NAME,
                "clusterVersionRef": CLUSTER_VERSION_NAME,
                "components": components,
            }
        }))
}

/// Cluster record whose status lists restartable components.
pub fn cluster_with_restartable(name: &str, namespace: &str, restartable: &[&str]) -> DynamicObject {
    let mut object = cluster(name, namespace, &[(COMPONENT_NAME, COMPONENT_TYPE)]);
    object.data["status"] = json!({ "operations": { "restartable": restartable } });
    object
}

pub fn config_template(name: &str, volume_name: &str, constraint: &str) -> Value {
    json!({
        "name": name,
        "configTplRef": format!("{}-tpl", name),
        "configConstraintRef": constraint,
        "namespace": NAMESPACE,
        "volumeName": volume_name,
    })
}

/// Cluster definition declaring one component type with the given templates.
pub fn cluster_definition(component_type: &str, templates: Vec<Value>) -> DynamicObject {
    DynamicObject::new(CLUSTER_DEF_NAME, &gvr::cluster_definitions()).data(json!({
        "spec": {
            "components": [{
                "typeName": component_type,
                "configSpec": { "configTemplateRefs": templates },
            }]
        }
    }))
}

pub fn cluster_version(component_type: &str, templates: Vec<Value>) -> DynamicObject {
    DynamicObject::new(CLUSTER_VERSION_NAME, &gvr::cluster_versions()).data(json!({
        "spec": {
            "clusterDefinitionRef": CLUSTER_DEF_NAME,
            "components": [{
                "type": component_type,
                "configTemplateRefs": templates,
            }]
        }
    }))
}

pub fn config_map(name: &str, namespace: &str, files: &[(&str, &str)]) -> DynamicObject {
    let data: BTreeMap<&str, &str> = files.iter().copied().collect();
    DynamicObject::new(name, &gvr::config_maps())
        .within(namespace)
        .data(json!({ "data": data }))
}

pub fn config_constraint(name: &str, spec: Value) -> DynamicObject {
    DynamicObject::new(name, &gvr::config_constraints()).data(json!({ "spec": spec }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_cluster_fixture() {
        let fake = FakeResourceAccessor::with_objects([(
            gvr::clusters(),
            cluster(CLUSTER_NAME, NAMESPACE, &[(COMPONENT_NAME, COMPONENT_TYPE)]),
        )]);

        let object = fake
            .get(&gvr::clusters(), Some(NAMESPACE), CLUSTER_NAME)
            .await
            .unwrap();
        assert_eq!(object.metadata.name.as_deref(), Some(CLUSTER_NAME));
        assert_eq!(fake.request_count(), 1);

        let missing = fake.get(&gvr::clusters(), Some("other"), CLUSTER_NAME).await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_with_label_selector() {
        let fake = FakeResourceAccessor::new();
        let mut labelled = config_map("a", NAMESPACE, &[("my.cnf", "")]);
        labelled.metadata.labels = Some([("app".to_string(), "db".to_string())].into());
        fake.insert(&gvr::config_maps(), labelled);
        fake.insert(&gvr::config_maps(), config_map("b", NAMESPACE, &[]));

        let all = fake.list(&gvr::config_maps(), Some(NAMESPACE), None).await.unwrap();
        assert_eq!(all.len(), 2);

        let selected = fake
            .list(&gvr::config_maps(), Some(NAMESPACE), Some("app=db"))
            .await
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].metadata.name.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_create_generates_name() {
        let fake = FakeResourceAccessor::new();
        let mut object = DynamicObject::new("", &gvr::ops_requests());
        object.metadata.name = None;
        object.metadata.generate_name = Some("c-restart-".to_string());

        let created = fake.create(&gvr::ops_requests(), NAMESPACE, &object).await.unwrap();
        assert!(created.metadata.name.unwrap().starts_with("c-restart-"));
        assert_eq!(fake.objects(&gvr::ops_requests(), Some(NAMESPACE)).len(), 1);
    }

    #[test]
    fn test_from_yaml() {
        let fake = FakeResourceAccessor::from_yaml(
            r#"
apiVersion: dbaas.kubeblocks.io/v1alpha1
kind: Cluster
metadata:
  name: mycluster
  namespace: default
spec:
  clusterDefinitionRef: apecloud-mysql
  components:
    - name: mysql
      type: replicasets
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: mycluster-mysql-config
  namespace: default
data:
  my.cnf: "[mysqld]"
"#,
        )
        .unwrap();

        assert_eq!(fake.objects(&gvr::clusters(), Some("default")).len(), 1);
        assert_eq!(fake.objects(&gvr::config_maps(), Some("default")).len(), 1);
    }

    #[test]
    fn test_from_yaml_unknown_kind() {
        let result = FakeResourceAccessor::from_yaml(
            "apiVersion: apps/v1\nkind: StatefulSet\nmetadata:\n  name: x\n",
        );
        assert!(matches!(result, Err(OpsError::InvalidResource(_))));
    }
}

//! Whole-policy snapshot

use super::role::{ClusterRole, ClusterRoleBinding, Role, RoleBinding, RoleRefKind};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every policy object in one value.
///
/// This is the on-disk format of the file store and the seed format of
/// the in-memory store. Unknown keys are rejected so that a misspelled
/// section fails to load instead of reading as an empty policy. The
/// capitalised section names of older policy files are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default, alias = "Roles")]
    pub roles: Vec<Role>,

    #[serde(default, alias = "RoleBindings")]
    pub role_bindings: Vec<RoleBinding>,

    #[serde(default, alias = "ClusterRoles")]
    pub cluster_roles: Vec<ClusterRole>,

    #[serde(default, alias = "ClusterRoleBindings")]
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
}

impl PolicyDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_role(&self, name: &str, namespace: &str) -> Option<usize> {
        self.roles
            .iter()
            .position(|r| r.name == name && r.namespace == namespace)
    }

    pub fn find_role_binding(&self, name: &str, namespace: &str) -> Option<usize> {
        self.role_bindings
            .iter()
            .position(|b| b.name == name && b.namespace == namespace)
    }

    pub fn find_cluster_role(&self, name: &str) -> Option<usize> {
        self.cluster_roles.iter().position(|r| r.name == name)
    }

    pub fn find_cluster_role_binding(&self, name: &str) -> Option<usize> {
        self.cluster_role_bindings.iter().position(|b| b.name == name)
    }

    /// Check every object, identity uniqueness, and that every role
    /// reference points at an existing role.
    pub fn validate(&self) -> Result<()> {
        let mut roles = HashSet::new();
        for role in &self.roles {
            role.validate()?;
            if !roles.insert((role.namespace.as_str(), role.name.as_str())) {
                return Err(CoreError::invalid(format!(
                    "Duplicate Role '{}/{}'",
                    role.namespace, role.name
                )));
            }
        }

        let mut cluster_roles = HashSet::new();
        for role in &self.cluster_roles {
            role.validate()?;
            if !cluster_roles.insert(role.name.as_str()) {
                return Err(CoreError::invalid(format!(
                    "Duplicate ClusterRole '{}'",
                    role.name
                )));
            }
        }

        let mut bindings = HashSet::new();
        for binding in &self.role_bindings {
            binding.validate()?;
            if !bindings.insert((binding.namespace.as_str(), binding.name.as_str())) {
                return Err(CoreError::invalid(format!(
                    "Duplicate RoleBinding '{}/{}'",
                    binding.namespace, binding.name
                )));
            }
            let resolves = match binding.role_ref.kind {
                RoleRefKind::Role => {
                    roles.contains(&(binding.namespace.as_str(), binding.role_ref.name.as_str()))
                }
                RoleRefKind::ClusterRole => cluster_roles.contains(binding.role_ref.name.as_str()),
            };
            if !resolves {
                return Err(CoreError::invalid(format!(
                    "RoleBinding '{}/{}' references missing {} '{}'",
                    binding.namespace, binding.name, binding.role_ref.kind, binding.role_ref.name
                )));
            }
        }

        let mut cluster_bindings = HashSet::new();
        for binding in &self.cluster_role_bindings {
            binding.validate()?;
            if !cluster_bindings.insert(binding.name.as_str()) {
                return Err(CoreError::invalid(format!(
                    "Duplicate ClusterRoleBinding '{}'",
                    binding.name
                )));
            }
            if !cluster_roles.contains(binding.role_ref.name.as_str()) {
                return Err(CoreError::invalid(format!(
                    "ClusterRoleBinding '{}' references missing ClusterRole '{}'",
                    binding.name, binding.role_ref.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PolicyRule, RoleRef, Subject};

    fn sample() -> PolicyDocument {
        PolicyDocument {
            roles: vec![Role::new(
                "pod-reader",
                "dev",
                vec![PolicyRule::resource(["get"], [""], ["pods"])],
            )],
            role_bindings: vec![RoleBinding::new(
                "read-pods",
                "dev",
                vec![Subject::user("alice")],
                RoleRef::role("pod-reader"),
            )],
            cluster_roles: vec![ClusterRole::new(
                "discovery",
                vec![PolicyRule::non_resource(["GET"], ["/api"])],
            )],
            cluster_role_bindings: vec![ClusterRoleBinding::new(
                "discovery-all",
                vec![Subject::user("*")],
                RoleRef::cluster_role("discovery"),
            )],
        }
    }

    #[test]
    fn test_valid_document() {
        assert!(sample().validate().is_ok());
        assert!(PolicyDocument::new().validate().is_ok());
    }

    #[test]
    fn test_dangling_role_ref() {
        let mut doc = sample();
        doc.role_bindings[0].role_ref = RoleRef::role("missing");
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("missing Role 'missing'"));

        let mut doc = sample();
        doc.cluster_role_bindings[0].role_ref = RoleRef::cluster_role("missing");
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_role_ref_resolves_in_binding_namespace() {
        let mut doc = sample();
        doc.role_bindings[0].namespace = "prod".to_string();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_duplicate_identity() {
        let mut doc = sample();
        doc.roles.push(doc.roles[0].clone());
        assert!(doc.validate().is_err());

        // Same name in another namespace is a different role
        let mut doc = sample();
        let mut other = doc.roles[0].clone();
        other.namespace = "prod".to_string();
        doc.roles.push(other);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_document_json_roundtrip_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        for key in ["roles", "roleBindings", "clusterRoles", "clusterRoleBindings"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }

        let empty: PolicyDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PolicyDocument::new());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let misspelled: serde_json::Result<PolicyDocument> =
            serde_json::from_str(r#"{"roleBinding": []}"#);
        assert!(misspelled.is_err());

        let extra: serde_json::Result<PolicyDocument> =
            serde_json::from_str(r#"{"roles": [], "comment": "staging"}"#);
        assert!(extra.is_err());
    }

    #[test]
    fn test_capitalised_section_names_accepted() {
        let doc: PolicyDocument = serde_json::from_str(
            r#"{
                "Roles": [{"name": "pod-reader", "namespace": "dev", "rules": []}],
                "RoleBindings": [{
                    "name": "read-pods",
                    "namespace": "dev",
                    "subjects": [{"kind": "User", "name": "alice"}],
                    "roleRef": {"kind": "Role", "name": "pod-reader"}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.roles.len(), 1);
        assert_eq!(doc.role_bindings.len(), 1);
        assert!(doc.validate().is_ok());
    }
}

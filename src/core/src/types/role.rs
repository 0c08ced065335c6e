//! Roles, cluster roles and the bindings that grant them

use super::policy::PolicyRule;
use super::subject::Subject;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Kind of role a binding points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleRefKind {
    Role,
    ClusterRole,
}

impl std::fmt::Display for RoleRefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleRefKind::Role => write!(f, "Role"),
            RoleRefKind::ClusterRole => write!(f, "ClusterRole"),
        }
    }
}

/// Reference from a binding to the role it grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub kind: RoleRefKind,

    pub name: String,

    /// Ignored for cluster roles
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl RoleRef {
    /// Reference a role; it is looked up in the binding's namespace
    pub fn role(name: impl Into<String>) -> Self {
        Self {
            kind: RoleRefKind::Role,
            name: name.into(),
            namespace: String::new(),
        }
    }

    pub fn cluster_role(name: impl Into<String>) -> Self {
        Self {
            kind: RoleRefKind::ClusterRole,
            name: name.into(),
            namespace: String::new(),
        }
    }
}

/// Namespaced set of rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,

    pub namespace: String,

    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

impl Role {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        rules: Vec<PolicyRule>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            rules,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CoreError::invalid("Role name cannot be empty"));
        }
        if self.namespace.is_empty() {
            return Err(CoreError::invalid(format!(
                "Role '{}' must belong to a namespace",
                self.name
            )));
        }
        Ok(())
    }
}

/// Cluster-scoped set of rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRole {
    pub name: String,

    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

impl ClusterRole {
    pub fn new(name: impl Into<String>, rules: Vec<PolicyRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CoreError::invalid("ClusterRole name cannot be empty"));
        }
        Ok(())
    }
}

/// Grants a role or cluster role to subjects within one namespace.
///
/// Even when it references a cluster role, the grant only has effect in
/// the binding's own namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    pub name: String,

    pub namespace: String,

    #[serde(default)]
    pub subjects: Vec<Subject>,

    pub role_ref: RoleRef,
}

impl RoleBinding {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        subjects: Vec<Subject>,
        role_ref: RoleRef,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            subjects,
            role_ref,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CoreError::invalid("RoleBinding name cannot be empty"));
        }
        if self.namespace.is_empty() {
            return Err(CoreError::invalid(format!(
                "RoleBinding '{}' must belong to a namespace",
                self.name
            )));
        }
        if self.role_ref.name.is_empty() {
            return Err(CoreError::invalid(format!(
                "RoleBinding '{}/{}' has an empty role reference",
                self.namespace, self.name
            )));
        }
        if self.role_ref.kind == RoleRefKind::Role
            && !self.role_ref.namespace.is_empty()
            && self.role_ref.namespace != self.namespace
        {
            return Err(CoreError::invalid(format!(
                "RoleBinding '{}/{}' references Role '{}' in namespace '{}'",
                self.namespace, self.name, self.role_ref.name, self.role_ref.namespace
            )));
        }
        validate_subjects(&self.subjects).map_err(|e| {
            CoreError::invalid(format!(
                "RoleBinding '{}/{}': {}",
                self.namespace, self.name, e
            ))
        })
    }
}

/// Grants a cluster role to subjects in every namespace and for
/// non-resource URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    pub name: String,

    #[serde(default)]
    pub subjects: Vec<Subject>,

    pub role_ref: RoleRef,
}

impl ClusterRoleBinding {
    pub fn new(name: impl Into<String>, subjects: Vec<Subject>, role_ref: RoleRef) -> Self {
        Self {
            name: name.into(),
            subjects,
            role_ref,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CoreError::invalid("ClusterRoleBinding name cannot be empty"));
        }
        if self.role_ref.kind != RoleRefKind::ClusterRole {
            return Err(CoreError::invalid(format!(
                "ClusterRoleBinding '{}' must reference a ClusterRole, not a {}",
                self.name, self.role_ref.kind
            )));
        }
        if self.role_ref.name.is_empty() {
            return Err(CoreError::invalid(format!(
                "ClusterRoleBinding '{}' has an empty role reference",
                self.name
            )));
        }
        validate_subjects(&self.subjects)
            .map_err(|e| CoreError::invalid(format!("ClusterRoleBinding '{}': {}", self.name, e)))
    }
}

fn validate_subjects(subjects: &[Subject]) -> std::result::Result<(), String> {
    subjects.iter().try_for_each(Subject::validate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_validation() {
        assert!(Role::new("viewer", "dev", vec![]).validate().is_ok());
        assert!(Role::new("", "dev", vec![]).validate().is_err());
        assert!(Role::new("viewer", "", vec![]).validate().is_err());
        assert!(ClusterRole::new("admin", vec![]).validate().is_ok());
        assert!(ClusterRole::new("", vec![]).validate().is_err());
    }

    #[test]
    fn test_role_binding_validation() {
        let binding =
            RoleBinding::new("b", "dev", vec![Subject::user("alice")], RoleRef::role("viewer"));
        assert!(binding.validate().is_ok());

        let binding = RoleBinding::new("b", "dev", vec![], RoleRef::cluster_role("admin"));
        assert!(binding.validate().is_ok());

        // Role refs cannot cross namespaces
        let mut cross = RoleRef::role("viewer");
        cross.namespace = "prod".to_string();
        let binding = RoleBinding::new("b", "dev", vec![], cross);
        assert!(binding.validate().is_err());

        let binding = RoleBinding::new(
            "b",
            "dev",
            vec![Subject::service_account("builder", "")],
            RoleRef::role("viewer"),
        );
        let err = binding.validate().unwrap_err();
        assert!(err.to_string().contains("no namespace"));
    }

    #[test]
    fn test_cluster_role_binding_requires_cluster_role() {
        let binding =
            ClusterRoleBinding::new("b", vec![Subject::user("alice")], RoleRef::role("viewer"));
        assert!(binding.validate().is_err());

        let binding = ClusterRoleBinding::new(
            "b",
            vec![Subject::user("alice")],
            RoleRef::cluster_role("admin"),
        );
        assert!(binding.validate().is_ok());
    }

    #[test]
    fn test_binding_json() {
        let json = r#"{
            "name": "read-pods",
            "namespace": "dev",
            "subjects": [{"kind": "User", "name": "alice"}],
            "roleRef": {"kind": "ClusterRole", "name": "view"}
        }"#;
        let binding: RoleBinding = serde_json::from_str(json).unwrap();
        assert_eq!(binding.role_ref, RoleRef::cluster_role("view"));
        assert_eq!(binding.subjects, vec![Subject::user("alice")]);
    }
}

//! Rule resolution
//!
//! Collects the policy rules that apply to a user in a namespace by
//! walking every binding whose subjects match the user and following
//! each binding's role reference.
//!
//! # Example
//!
//! ```rust
//! use rbac_authz::resolver::RuleResolver;
//! use rbac_authz::store::InMemoryPolicyStore;
//! use rbac_core::{ClusterRole, ClusterRoleBinding, PolicyDocument, PolicyRule, RoleRef, Subject};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryPolicyStore::from_document(PolicyDocument {
//!     cluster_roles: vec![ClusterRole::new(
//!         "discovery",
//!         vec![PolicyRule::non_resource(["GET"], ["/api"])],
//!     )],
//!     cluster_role_bindings: vec![ClusterRoleBinding::new(
//!         "discovery-all",
//!         vec![Subject::user("*")],
//!         RoleRef::cluster_role("discovery"),
//!     )],
//!     ..Default::default()
//! });
//!
//! let resolver = RuleResolver::new(Arc::new(store));
//! let rules = resolver.resolve("alice", &[], "").await?;
//! assert_eq!(rules.len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthzError, Result};
use rbac_core::traits::{
    ClusterRoleBindingRepository, ClusterRoleRepository, RoleBindingRepository, RoleRepository,
};
use rbac_core::{
    CoreError, PolicyRepository, PolicyRule, RoleRef, RoleRefKind, Subject, SubjectKind, WILDCARD,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Resolves the rules that apply to a subject
///
/// The repository is injected so tests can substitute in-memory fixtures.
/// Cloning is cheap and clones share the repository.
#[derive(Clone)]
pub struct RuleResolver {
    repository: Arc<dyn PolicyRepository>,
}

impl RuleResolver {
    pub fn new(repository: Arc<dyn PolicyRepository>) -> Self {
        Self { repository }
    }

    /// Get the rules that apply to the user and groups in a namespace.
    ///
    /// Role bindings from `namespace` contribute rules only when it is
    /// non-empty; cluster role bindings always contribute. Rules are
    /// returned in binding order and are not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository cannot be read (`AuthzError::Storage`)
    /// - A matching binding references a role that does not exist, or a
    ///   cluster role binding references a namespaced role
    ///   (`AuthzError::ConfigurationIntegrity`)
    ///
    /// Bindings that match nobody yield an empty list, not an error.
    pub async fn resolve(
        &self,
        user: &str,
        groups: &[String],
        namespace: &str,
    ) -> Result<Vec<PolicyRule>> {
        let mut rules = Vec::new();

        if !namespace.is_empty() {
            let bindings = self.repository.list_role_bindings(namespace).await?;
            for binding in &bindings {
                if !binding.subjects.iter().any(|s| subject_matches(s, user, groups)) {
                    continue;
                }
                debug!(
                    "RoleBinding {}/{} matches user {}",
                    binding.namespace, binding.name, user
                );
                rules.extend(self.role_rules(&binding.role_ref, &binding.namespace).await?);
            }
        }

        let cluster_bindings = self.repository.list_cluster_role_bindings().await?;
        for binding in &cluster_bindings {
            if !binding.subjects.iter().any(|s| subject_matches(s, user, groups)) {
                continue;
            }
            if binding.role_ref.kind != RoleRefKind::ClusterRole {
                return Err(AuthzError::ConfigurationIntegrity(format!(
                    "ClusterRoleBinding '{}' references {} '{}'; only ClusterRole is allowed",
                    binding.name, binding.role_ref.kind, binding.role_ref.name
                )));
            }
            debug!("ClusterRoleBinding {} matches user {}", binding.name, user);
            rules.extend(self.role_rules(&binding.role_ref, "").await?);
        }

        debug!(
            "Resolved {} rules for user {} in namespace '{}'",
            rules.len(),
            user,
            namespace
        );

        Ok(rules)
    }

    /// Fetch the rules of the referenced role. Namespaced roles are looked
    /// up in the binding's own namespace.
    async fn role_rules(
        &self,
        role_ref: &RoleRef,
        binding_namespace: &str,
    ) -> Result<Vec<PolicyRule>> {
        let fetched = match role_ref.kind {
            RoleRefKind::Role => self
                .repository
                .get_role(&role_ref.name, binding_namespace)
                .await
                .map(|role| role.rules),
            RoleRefKind::ClusterRole => self
                .repository
                .get_cluster_role(&role_ref.name)
                .await
                .map(|role| role.rules),
        };

        fetched.map_err(|e| match e {
            CoreError::NotFound(msg) => AuthzError::ConfigurationIntegrity(format!(
                "binding references missing {} '{}': {}",
                role_ref.kind, role_ref.name, msg
            )),
            other => AuthzError::Storage(other),
        })
    }
}

/// Check whether a binding subject designates the user.
///
/// Users match by name or the `"*"` wildcard, groups by exact membership,
/// and service accounts by their `system:service:<name>:<namespace>`
/// identity. A service account without a namespace never matches.
pub fn subject_matches(subject: &Subject, user: &str, groups: &[String]) -> bool {
    match subject.kind {
        SubjectKind::User => subject.name == user || subject.name == WILDCARD,
        SubjectKind::Group => groups.iter().any(|g| *g == subject.name),
        SubjectKind::ServiceAccount => match subject.service_account_identity() {
            Some(identity) => identity == user,
            None => {
                error!(
                    "ServiceAccount subject with no namespace defined. Subject name: {}",
                    subject.name
                );
                false
            }
        },
    }
}

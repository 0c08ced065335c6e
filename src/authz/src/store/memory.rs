//! In-memory policy store

use super::ops;
use async_trait::async_trait;
use rbac_core::traits::{
    ClusterRoleBindingRepository, ClusterRoleRepository, RoleBindingRepository, RoleRepository,
};
use rbac_core::{ClusterRole, ClusterRoleBinding, PolicyDocument, Result, Role, RoleBinding};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Policy store that keeps the whole document in memory
pub struct InMemoryPolicyStore {
    document: Arc<RwLock<PolicyDocument>>,
}

impl InMemoryPolicyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::from_document(PolicyDocument::new())
    }

    /// Seed the store with a document as-is.
    ///
    /// The document is not validated, so fixtures can contain the same
    /// mistakes a hand-edited policy file might.
    pub fn from_document(document: PolicyDocument) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
        }
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> PolicyDocument {
        self.document.read().await.clone()
    }
}

impl Default for InMemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleRepository for InMemoryPolicyStore {
    async fn get_role(&self, name: &str, namespace: &str) -> Result<Role> {
        ops::get_role(&*self.document.read().await, name, namespace)
    }

    async fn create_role(&self, role: Role) -> Result<()> {
        ops::create_role(&mut *self.document.write().await, role)
    }

    async fn update_role(&self, role: Role) -> Result<()> {
        ops::update_role(&mut *self.document.write().await, role)
    }

    async fn delete_role(&self, name: &str, namespace: &str) -> Result<()> {
        ops::delete_role(&mut *self.document.write().await, name, namespace)
    }
}

#[async_trait]
impl RoleBindingRepository for InMemoryPolicyStore {
    async fn get_role_binding(&self, name: &str, namespace: &str) -> Result<RoleBinding> {
        ops::get_role_binding(&*self.document.read().await, name, namespace)
    }

    async fn create_role_binding(&self, binding: RoleBinding) -> Result<()> {
        ops::create_role_binding(&mut *self.document.write().await, binding)
    }

    async fn update_role_binding(&self, binding: RoleBinding) -> Result<()> {
        ops::update_role_binding(&mut *self.document.write().await, binding)
    }

    async fn delete_role_binding(&self, name: &str, namespace: &str) -> Result<()> {
        ops::delete_role_binding(&mut *self.document.write().await, name, namespace)
    }

    async fn list_role_bindings(&self, namespace: &str) -> Result<Vec<RoleBinding>> {
        Ok(ops::list_role_bindings(&*self.document.read().await, namespace))
    }
}

#[async_trait]
impl ClusterRoleRepository for InMemoryPolicyStore {
    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole> {
        ops::get_cluster_role(&*self.document.read().await, name)
    }

    async fn create_cluster_role(&self, role: ClusterRole) -> Result<()> {
        ops::create_cluster_role(&mut *self.document.write().await, role)
    }

    async fn update_cluster_role(&self, role: ClusterRole) -> Result<()> {
        ops::update_cluster_role(&mut *self.document.write().await, role)
    }

    async fn delete_cluster_role(&self, name: &str) -> Result<()> {
        ops::delete_cluster_role(&mut *self.document.write().await, name)
    }
}

#[async_trait]
impl ClusterRoleBindingRepository for InMemoryPolicyStore {
    async fn get_cluster_role_binding(&self, name: &str) -> Result<ClusterRoleBinding> {
        ops::get_cluster_role_binding(&*self.document.read().await, name)
    }

    async fn create_cluster_role_binding(&self, binding: ClusterRoleBinding) -> Result<()> {
        ops::create_cluster_role_binding(&mut *self.document.write().await, binding)
    }

    async fn update_cluster_role_binding(&self, binding: ClusterRoleBinding) -> Result<()> {
        ops::update_cluster_role_binding(&mut *self.document.write().await, binding)
    }

    async fn delete_cluster_role_binding(&self, name: &str) -> Result<()> {
        ops::delete_cluster_role_binding(&mut *self.document.write().await, name)
    }

    async fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>> {
        Ok(self.document.read().await.cluster_role_bindings.clone())
    }
}

//! Policy repository contract
//!
//! The rule resolver only needs the read half (`list_*` and `get_*`);
//! the create/update/delete operations serve management tooling.
//! Implementations must give each call a consistent view of the store.

use crate::error::Result;
use crate::types::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use async_trait::async_trait;

/// Access to persisted roles
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Get the role with the given name in the given namespace.
    /// Fails with `NotFound` when absent.
    async fn get_role(&self, name: &str, namespace: &str) -> Result<Role>;

    async fn create_role(&self, role: Role) -> Result<()>;

    async fn update_role(&self, role: Role) -> Result<()>;

    async fn delete_role(&self, name: &str, namespace: &str) -> Result<()>;
}

/// Access to persisted role bindings
#[async_trait]
pub trait RoleBindingRepository: Send + Sync {
    async fn get_role_binding(&self, name: &str, namespace: &str) -> Result<RoleBinding>;

    async fn create_role_binding(&self, binding: RoleBinding) -> Result<()>;

    async fn update_role_binding(&self, binding: RoleBinding) -> Result<()>;

    async fn delete_role_binding(&self, name: &str, namespace: &str) -> Result<()>;

    /// List role bindings in the given namespace
    async fn list_role_bindings(&self, namespace: &str) -> Result<Vec<RoleBinding>>;
}

/// Access to persisted cluster roles
#[async_trait]
pub trait ClusterRoleRepository: Send + Sync {
    /// Fails with `NotFound` when absent.
    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole>;

    async fn create_cluster_role(&self, role: ClusterRole) -> Result<()>;

    async fn update_cluster_role(&self, role: ClusterRole) -> Result<()>;

    async fn delete_cluster_role(&self, name: &str) -> Result<()>;
}

/// Access to persisted cluster role bindings
#[async_trait]
pub trait ClusterRoleBindingRepository: Send + Sync {
    async fn get_cluster_role_binding(&self, name: &str) -> Result<ClusterRoleBinding>;

    async fn create_cluster_role_binding(&self, binding: ClusterRoleBinding) -> Result<()>;

    async fn update_cluster_role_binding(&self, binding: ClusterRoleBinding) -> Result<()>;

    async fn delete_cluster_role_binding(&self, name: &str) -> Result<()>;

    async fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>>;
}

/// Everything the authorizer and management tooling need from storage
pub trait PolicyRepository:
    RoleRepository + RoleBindingRepository + ClusterRoleRepository + ClusterRoleBindingRepository
{
}

impl<T> PolicyRepository for T where
    T: RoleRepository + RoleBindingRepository + ClusterRoleRepository + ClusterRoleBindingRepository
{
}

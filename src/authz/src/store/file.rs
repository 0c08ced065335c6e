//! File-backed policy store
//!
//! The whole policy lives in one JSON document. Each call reads and
//! parses the file once, so a single call always sees one consistent
//! snapshot. Writes go to a temporary sibling that is then renamed over
//! the policy file.

use super::ops;
use async_trait::async_trait;
use rbac_core::traits::{
    ClusterRoleBindingRepository, ClusterRoleRepository, RoleBindingRepository, RoleRepository,
};
use rbac_core::{
    ClusterRole, ClusterRoleBinding, CoreError, PolicyDocument, Result, Role, RoleBinding,
};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Policy store persisted as a JSON file
pub struct FilePolicyStore {
    path: PathBuf,
    /// Serialises writers; readers only wait while a write is in flight
    lock: RwLock<()>,
}

impl FilePolicyStore {
    /// Open the store, creating an empty policy file if none exists
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: RwLock::new(()),
        };

        if !tokio::fs::try_exists(&store.path).await? {
            info!("Creating empty policy file at {}", store.path.display());
            store.write_document(&PolicyDocument::new()).await?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole policy document
    pub async fn load(&self) -> Result<PolicyDocument> {
        let _guard = self.lock.read().await;
        self.read_document().await
    }

    async fn read_document(&self) -> Result<PolicyDocument> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            CoreError::storage(format!(
                "Error reading the policy file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_slice(&data)?)
    }

    async fn write_document(&self, document: &PolicyDocument) -> Result<()> {
        let data = serde_json::to_vec_pretty(document)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, data).await.map_err(|e| {
            CoreError::storage(format!("Error writing the policy file {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            CoreError::storage(format!(
                "Error replacing the policy file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Wrote policy file {}", self.path.display());
        Ok(())
    }

    /// Apply a change to the document and persist it. Nothing is written
    /// when the change fails.
    async fn modify<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut PolicyDocument) -> Result<()> + Send,
    {
        let _guard = self.lock.write().await;
        let mut document = self.read_document().await?;
        change(&mut document)?;
        self.write_document(&document).await
    }
}

#[async_trait]
impl RoleRepository for FilePolicyStore {
    async fn get_role(&self, name: &str, namespace: &str) -> Result<Role> {
        ops::get_role(&self.load().await?, name, namespace)
    }

    async fn create_role(&self, role: Role) -> Result<()> {
        self.modify(|doc| ops::create_role(doc, role)).await
    }

    async fn update_role(&self, role: Role) -> Result<()> {
        self.modify(|doc| ops::update_role(doc, role)).await
    }

    async fn delete_role(&self, name: &str, namespace: &str) -> Result<()> {
        self.modify(|doc| ops::delete_role(doc, name, namespace)).await
    }
}

#[async_trait]
impl RoleBindingRepository for FilePolicyStore {
    async fn get_role_binding(&self, name: &str, namespace: &str) -> Result<RoleBinding> {
        ops::get_role_binding(&self.load().await?, name, namespace)
    }

    async fn create_role_binding(&self, binding: RoleBinding) -> Result<()> {
        self.modify(|doc| ops::create_role_binding(doc, binding)).await
    }

    async fn update_role_binding(&self, binding: RoleBinding) -> Result<()> {
        self.modify(|doc| ops::update_role_binding(doc, binding)).await
    }

    async fn delete_role_binding(&self, name: &str, namespace: &str) -> Result<()> {
        self.modify(|doc| ops::delete_role_binding(doc, name, namespace)).await
    }

    async fn list_role_bindings(&self, namespace: &str) -> Result<Vec<RoleBinding>> {
        Ok(ops::list_role_bindings(&self.load().await?, namespace))
    }
}

#[async_trait]
impl ClusterRoleRepository for FilePolicyStore {
    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole> {
        ops::get_cluster_role(&self.load().await?, name)
    }

    async fn create_cluster_role(&self, role: ClusterRole) -> Result<()> {
        self.modify(|doc| ops::create_cluster_role(doc, role)).await
    }

    async fn update_cluster_role(&self, role: ClusterRole) -> Result<()> {
        self.modify(|doc| ops::update_cluster_role(doc, role)).await
    }

    async fn delete_cluster_role(&self, name: &str) -> Result<()> {
        self.modify(|doc| ops::delete_cluster_role(doc, name)).await
    }
}

#[async_trait]
impl ClusterRoleBindingRepository for FilePolicyStore {
    async fn get_cluster_role_binding(&self, name: &str) -> Result<ClusterRoleBinding> {
        ops::get_cluster_role_binding(&self.load().await?, name)
    }

    async fn create_cluster_role_binding(&self, binding: ClusterRoleBinding) -> Result<()> {
        self.modify(|doc| ops::create_cluster_role_binding(doc, binding)).await
    }

    async fn update_cluster_role_binding(&self, binding: ClusterRoleBinding) -> Result<()> {
        self.modify(|doc| ops::update_cluster_role_binding(doc, binding)).await
    }

    async fn delete_cluster_role_binding(&self, name: &str) -> Result<()> {
        self.modify(|doc| ops::delete_cluster_role_binding(doc, name)).await
    }

    async fn list_cluster_role_bindings(&self) -> Result<Vec<ClusterRoleBinding>> {
        Ok(self.load().await?.cluster_role_bindings)
    }
}

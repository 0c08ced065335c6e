//! Shared traits for RBAC policy storage

pub mod repository;

// Re-export commonly used traits
pub use repository::{
    ClusterRoleBindingRepository, ClusterRoleRepository, PolicyRepository, RoleBindingRepository,
    RoleRepository,
};

//! RBAC data model

pub mod policy;
pub mod subject;
pub mod role;
pub mod document;

// Re-export commonly used types
pub use policy::{PolicyRule, WILDCARD};
pub use subject::{Subject, SubjectKind, SERVICE_ACCOUNT_PREFIX};
pub use role::{ClusterRole, ClusterRoleBinding, Role, RoleBinding, RoleRef, RoleRefKind};
pub use document::PolicyDocument;

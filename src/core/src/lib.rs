//! # RBAC Core
//!
//! Shared data model, storage traits, and error handling for the RBAC
//! authorizer. Storage backends and the decision engine depend on this
//! crate; it depends on neither.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::PolicyRepository;
pub use types::{
    ClusterRole, ClusterRoleBinding, PolicyDocument, PolicyRule, Role, RoleBinding, RoleRef,
    RoleRefKind, Subject, SubjectKind, WILDCARD,
};

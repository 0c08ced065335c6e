//! # Kubernetes RBAC Authorization Engine
//!
//! Decides whether a user, together with the groups they belong to, may
//! perform an API action, given a set of roles and bindings.
//!
//! ## Features
//!
//! - **Rule resolution** across RoleBindings and ClusterRoleBindings
//! - **Rule evaluation** with `*` wildcards and resource-name restrictions
//! - **Pluggable storage** behind async repository traits (in-memory and JSON file)
//! - **SubjectAccessReview webhook** served over axum
//!
//! ## Example
//!
//! ```rust
//! use rbac_authz::{Authorizer, AuthzRequest, InMemoryPolicyStore, ResourceAction};
//! use rbac_core::{PolicyDocument, PolicyRule, Role, RoleBinding, RoleRef, Subject};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut document = PolicyDocument::new();
//!     document.roles.push(Role::new(
//!         "pod-reader",
//!         "dev",
//!         vec![PolicyRule::resource(["get", "list"], [""], ["pods"])],
//!     ));
//!     document.role_bindings.push(RoleBinding::new(
//!         "read-pods",
//!         "dev",
//!         vec![Subject::user("alice")],
//!         RoleRef::role("pod-reader"),
//!     ));
//!
//!     let authorizer = Authorizer::new(Arc::new(InMemoryPolicyStore::from_document(document)));
//!
//!     let action = ResourceAction::new("get", "pods").in_namespace("dev");
//!     let request = AuthzRequest::new("alice", action);
//!     if authorizer.authorize(&request).await? {
//!         println!("Access granted!");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod policy;
pub mod resolver;
pub mod engine;
pub mod store;
pub mod webhook;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::{ApiAction, AuthzRequest, NonResourceAction, ResourceAction};
pub use policy::is_authorized;
pub use resolver::RuleResolver;
pub use engine::Authorizer;
pub use store::{FilePolicyStore, InMemoryPolicyStore};
pub use config::ServerConfig;
pub use error::{AuthzError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

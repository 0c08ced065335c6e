//! Kubernetes authorization webhook
//!
//! Accepts `SubjectAccessReview` objects and answers them with the
//! [`Authorizer`](crate::engine::Authorizer).

pub mod types;
pub mod handler;

pub use types::{
    NonResourceAttributes, ResourceAttributes, SubjectAccessReview, SubjectAccessReviewSpec,
    SubjectAccessReviewStatus,
};
pub use handler::{create_router, AppState};

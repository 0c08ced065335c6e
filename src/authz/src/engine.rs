//! Decision orchestration
//!
//! ```text
//! AuthzRequest → RuleResolver (namespace of the action) → is_authorized → bool
//! ```
//!
//! The authorizer holds no mutable state; concurrent requests share it
//! through `Arc` without coordination.

use crate::error::Result;
use crate::policy::is_authorized;
use crate::resolver::RuleResolver;
use crate::types::AuthzRequest;
use rbac_core::PolicyRepository;
use std::sync::Arc;
use tracing::debug;

/// Answers allow/deny for authorization requests
#[derive(Clone)]
pub struct Authorizer {
    resolver: RuleResolver,
}

impl Authorizer {
    pub fn new(repository: Arc<dyn PolicyRepository>) -> Self {
        Self {
            resolver: RuleResolver::new(repository),
        }
    }

    pub fn resolver(&self) -> &RuleResolver {
        &self.resolver
    }

    /// Decide whether the request is allowed.
    ///
    /// Resolution errors are returned as-is. The caller picks the
    /// fail-safe outcome; this method never turns an error into a
    /// decision.
    pub async fn authorize(&self, request: &AuthzRequest) -> Result<bool> {
        let rules = self
            .resolver
            .resolve(&request.user, &request.groups, request.action.namespace())
            .await?;

        let allowed = is_authorized(&rules, &request.action);

        debug!(
            "Authorization decision for user {}: {} ({} applicable rules)",
            request.user,
            if allowed { "ALLOW" } else { "DENY" },
            rules.len()
        );

        Ok(allowed)
    }
}

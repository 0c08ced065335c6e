//! Authorization request types

use serde::{Deserialize, Serialize};

/// Action on an API resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAction {
    /// API verb (get, list, create, ...)
    pub verb: String,

    /// API group containing the resource; empty for the core group
    #[serde(default)]
    pub api_group: String,

    pub resource: String,

    #[serde(default)]
    pub subresource: String,

    /// Name of the object acted on; empty when acting on a collection
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,
}

impl ResourceAction {
    pub fn new(verb: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            resource: resource.into(),
            ..Default::default()
        }
    }

    pub fn with_api_group(mut self, api_group: impl Into<String>) -> Self {
        self.api_group = api_group.into();
        self
    }

    pub fn with_subresource(mut self, subresource: impl Into<String>) -> Self {
        self.subresource = subresource.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Action on a URL path outside the resource API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonResourceAction {
    pub verb: String,

    #[serde(rename = "nonResourceURL")]
    pub url: String,
}

impl NonResourceAction {
    pub fn new(verb: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            url: url.into(),
        }
    }
}

/// The action being authorized; exactly one shape per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiAction {
    Resource(ResourceAction),
    NonResource(NonResourceAction),
}

impl ApiAction {
    pub fn verb(&self) -> &str {
        match self {
            ApiAction::Resource(action) => &action.verb,
            ApiAction::NonResource(action) => &action.verb,
        }
    }

    /// Namespace rules are resolved in. Non-resource actions are not
    /// namespaced, so only cluster role bindings apply to them.
    pub fn namespace(&self) -> &str {
        match self {
            ApiAction::Resource(action) => &action.namespace,
            ApiAction::NonResource(_) => "",
        }
    }
}

impl From<ResourceAction> for ApiAction {
    fn from(action: ResourceAction) -> Self {
        ApiAction::Resource(action)
    }
}

impl From<NonResourceAction> for ApiAction {
    fn from(action: NonResourceAction) -> Self {
        ApiAction::NonResource(action)
    }
}

/// Authorization request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthzRequest {
    /// Who is making the request
    pub user: String,

    /// Groups the user belongs to
    #[serde(default)]
    pub groups: Vec<String>,

    /// What the user is trying to do
    pub action: ApiAction,
}

impl AuthzRequest {
    pub fn new(user: impl Into<String>, action: impl Into<ApiAction>) -> Self {
        Self {
            user: user.into(),
            groups: Vec::new(),
            action: action.into(),
        }
    }

    pub fn with_groups<G>(mut self, groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

//! SubjectAccessReview wire types

use crate::error::{AuthzError, Result};
use crate::types::{ApiAction, AuthzRequest, NonResourceAction, ResourceAction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asks whether a user or group can perform an action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAccessReview {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// The request being evaluated
    pub spec: SubjectAccessReviewSpec,

    /// Filled in by the authorizer
    #[serde(default)]
    pub status: SubjectAccessReviewStatus,
}

/// Exactly one of `resource_attributes` and `non_resource_attributes`
/// must be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAccessReviewSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_attributes: Option<ResourceAttributes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_resource_attributes: Option<NonResourceAttributes>,

    #[serde(default)]
    pub user: String,

    /// Also read as `groups`. A review carrying both keys is rejected as
    /// a duplicate field.
    #[serde(default, alias = "groups", skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<String>,

    /// Authenticator extras; carried through, not evaluated
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Vec<String>>,
}

/// Attributes of a resource request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAttributes {
    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub verb: String,

    /// API group of the resource
    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub resource: String,

    #[serde(default)]
    pub subresource: String,

    #[serde(default)]
    pub name: String,
}

/// Attributes of a non-resource request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NonResourceAttributes {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub verb: String,
}

/// Decision written back into the review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectAccessReviewStatus {
    pub allowed: bool,

    /// Only set when the decision could not be evaluated
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

impl SubjectAccessReview {
    /// Build the authorization request described by the review.
    ///
    /// Resource attributes take precedence; a review with neither kind of
    /// attributes is rejected.
    pub fn to_request(&self) -> Result<AuthzRequest> {
        let action = match (&self.spec.resource_attributes, &self.spec.non_resource_attributes) {
            (Some(attrs), _) => ApiAction::Resource(ResourceAction {
                verb: attrs.verb.clone(),
                api_group: attrs.group.clone(),
                resource: attrs.resource.clone(),
                subresource: attrs.subresource.clone(),
                name: attrs.name.clone(),
                namespace: attrs.namespace.clone(),
            }),
            (None, Some(attrs)) => ApiAction::NonResource(NonResourceAction {
                verb: attrs.verb.clone(),
                url: attrs.path.clone(),
            }),
            (None, None) => {
                return Err(AuthzError::MalformedRequest(
                    "SubjectAccessReview has neither resourceAttributes nor nonResourceAttributes"
                        .to_string(),
                ))
            }
        };

        Ok(AuthzRequest {
            user: self.spec.user.clone(),
            groups: self.spec.group.clone(),
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_review_to_request() {
        let review: SubjectAccessReview = serde_json::from_str(
            r#"{
                "apiVersion": "authorization.k8s.io/v1beta1",
                "kind": "SubjectAccessReview",
                "spec": {
                    "resourceAttributes": {
                        "namespace": "kittensandponies",
                        "verb": "get",
                        "group": "unicorn.example.org",
                        "resource": "pods",
                        "name": "nginx"
                    },
                    "user": "jane",
                    "group": ["group1", "group2"]
                }
            }"#,
        )
        .unwrap();

        let request = review.to_request().unwrap();
        assert_eq!(request.user, "jane");
        assert_eq!(request.groups, vec!["group1", "group2"]);
        assert_eq!(
            request.action,
            ApiAction::Resource(ResourceAction {
                verb: "get".into(),
                api_group: "unicorn.example.org".into(),
                resource: "pods".into(),
                subresource: String::new(),
                name: "nginx".into(),
                namespace: "kittensandponies".into(),
            })
        );
        assert!(!review.status.allowed);
    }

    #[test]
    fn test_non_resource_review_to_request() {
        let review: SubjectAccessReview = serde_json::from_str(
            r#"{
                "spec": {
                    "nonResourceAttributes": {"path": "/debug", "verb": "get"},
                    "user": "jane",
                    "groups": ["group1"]
                }
            }"#,
        )
        .unwrap();

        let request = review.to_request().unwrap();
        assert_eq!(request.groups, vec!["group1"]);
        assert_eq!(request.action, ApiAction::from(NonResourceAction::new("get", "/debug")));
    }

    #[test]
    fn test_resource_attributes_win() {
        let mut review = SubjectAccessReview::default();
        review.spec.resource_attributes = Some(ResourceAttributes {
            verb: "list".into(),
            resource: "pods".into(),
            ..Default::default()
        });
        review.spec.non_resource_attributes = Some(NonResourceAttributes {
            path: "/api".into(),
            verb: "get".into(),
        });

        assert!(matches!(review.to_request().unwrap().action, ApiAction::Resource(_)));
    }

    #[test]
    fn test_review_without_attributes_is_malformed() {
        let review = SubjectAccessReview::default();
        assert!(matches!(review.to_request(), Err(AuthzError::MalformedRequest(_))));
    }

    #[test]
    fn test_group_and_groups_together_rejected() {
        let both: serde_json::Result<SubjectAccessReview> = serde_json::from_str(
            r#"{"spec": {"user": "jane", "group": ["a"], "groups": ["b"]}}"#,
        );
        let err = both.unwrap_err();
        assert!(err.to_string().contains("duplicate field"), "{}", err);
    }

    #[test]
    fn test_status_serialization() {
        let status = SubjectAccessReviewStatus {
            allowed: true,
            reason: String::new(),
        };
        assert_eq!(serde_json::to_value(&status).unwrap(), serde_json::json!({"allowed": true}));
    }
}

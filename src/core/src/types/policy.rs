//! Policy rules

use serde::{Deserialize, Serialize};

/// Sentinel that matches any value in a rule field.
///
/// It is compared literally; `"get*"` is an ordinary string, not a pattern.
pub const WILDCARD: &str = "*";

/// Describes what a subject may do, without saying who or where.
///
/// A resource rule populates `verbs`, `api_groups` and `resources`; a
/// non-resource rule populates `verbs` and `non_resource_urls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    /// Verbs the rule allows (`"*"` for all)
    #[serde(default)]
    pub verbs: Vec<String>,

    /// API groups containing the resources (`""` is the core group)
    #[serde(default)]
    pub api_groups: Vec<String>,

    /// Resource kinds the rule applies to
    #[serde(default)]
    pub resources: Vec<String>,

    /// Optional whitelist of object names. Empty allows every name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_names: Vec<String>,

    /// URL paths outside the resource API
    #[serde(
        default,
        rename = "nonResourceURLs",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub non_resource_urls: Vec<String>,
}

impl PolicyRule {
    /// Create a resource rule
    pub fn resource<V, G, R>(verbs: V, api_groups: G, resources: R) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            verbs: collect(verbs),
            api_groups: collect(api_groups),
            resources: collect(resources),
            ..Default::default()
        }
    }

    /// Create a non-resource rule
    pub fn non_resource<V, U>(verbs: V, urls: U) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        U: IntoIterator,
        U::Item: Into<String>,
    {
        Self {
            verbs: collect(verbs),
            non_resource_urls: collect(urls),
            ..Default::default()
        }
    }

    /// Restrict the rule to the given object names
    pub fn with_resource_names<N>(mut self, names: N) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
    {
        self.resource_names = collect(names);
        self
    }
}

fn collect<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builders() {
        let rule =
            PolicyRule::resource(["get", "list"], [""], ["pods"]).with_resource_names(["nginx"]);
        assert_eq!(rule.verbs, vec!["get", "list"]);
        assert_eq!(rule.api_groups, vec![""]);
        assert_eq!(rule.resources, vec!["pods"]);
        assert_eq!(rule.resource_names, vec!["nginx"]);
        assert!(rule.non_resource_urls.is_empty());

        let rule = PolicyRule::non_resource(["GET"], ["/healthz"]);
        assert!(rule.resources.is_empty());
        assert_eq!(rule.non_resource_urls, vec!["/healthz"]);
    }

    #[test]
    fn test_rule_json_field_names() {
        let json = r#"{
            "verbs": ["get"],
            "apiGroups": ["apps"],
            "resources": ["deployments"],
            "resourceNames": ["web"],
            "nonResourceURLs": ["/api"]
        }"#;
        let rule: PolicyRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.api_groups, vec!["apps"]);
        assert_eq!(rule.resource_names, vec!["web"]);
        assert_eq!(rule.non_resource_urls, vec!["/api"]);

        let out = serde_json::to_value(PolicyRule::resource(["*"], ["*"], ["*"])).unwrap();
        assert!(out.get("apiGroups").is_some());
        assert!(out.get("resourceNames").is_none());
        assert!(out.get("nonResourceURLs").is_none());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let rule: PolicyRule = serde_json::from_str(r#"{"verbs": ["*"]}"#).unwrap();
        assert!(rule.api_groups.is_empty());
        assert!(rule.resources.is_empty());
    }
}

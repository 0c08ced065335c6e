//! Policy evaluation
//!
//! Rules are purely additive: an action is allowed when any rule covers
//! it and denied otherwise. Everything here is a pure function of its
//! inputs, so it is safe to call from any number of tasks at once.

use crate::types::{ApiAction, NonResourceAction, ResourceAction};
use rbac_core::{PolicyRule, WILDCARD};

/// Check whether any rule allows the action
pub fn is_authorized(rules: &[PolicyRule], action: &ApiAction) -> bool {
    match action {
        ApiAction::Resource(action) => rules
            .iter()
            .any(|rule| is_resource_action_allowed(rule, action)),
        ApiAction::NonResource(action) => rules
            .iter()
            .any(|rule| is_non_resource_action_allowed(rule, action)),
    }
}

/// Match a rule against a resource action.
///
/// Group, verb and resource must each be listed or wildcarded. When the
/// rule has a resource name whitelist the object name must appear in it
/// literally.
pub fn is_resource_action_allowed(rule: &PolicyRule, action: &ResourceAction) -> bool {
    allows(&rule.api_groups, &action.api_group)
        && allows(&rule.verbs, &action.verb)
        && allows(&rule.resources, &action.resource)
        && allows_name(&rule.resource_names, &action.name)
}

/// Match a rule against a non-resource action
pub fn is_non_resource_action_allowed(rule: &PolicyRule, action: &NonResourceAction) -> bool {
    allows(&rule.verbs, &action.verb) && allows(&rule.non_resource_urls, &action.url)
}

fn allows(set: &[String], value: &str) -> bool {
    contains(set, WILDCARD) || contains(set, value)
}

// No wildcard inside the whitelist
fn allows_name(whitelist: &[String], name: &str) -> bool {
    whitelist.is_empty() || contains(whitelist, name)
}

fn contains(set: &[String], value: &str) -> bool {
    set.iter().any(|e| e == value)
}

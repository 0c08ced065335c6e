//! Binding subjects

use serde::{Deserialize, Serialize};

/// Prefix of the identity string carried by service account users
pub const SERVICE_ACCOUNT_PREFIX: &str = "system:service";

/// Kind of identity a binding applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    User,
    Group,
    ServiceAccount,
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKind::User => write!(f, "User"),
            SubjectKind::Group => write!(f, "Group"),
            SubjectKind::ServiceAccount => write!(f, "ServiceAccount"),
        }
    }
}

/// Identity a role binding grants its role to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,

    pub name: String,

    /// Only meaningful for service accounts, where it is required
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl Subject {
    /// A user subject. The name `"*"` matches every user.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::User,
            name: name.into(),
            namespace: String::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::Group,
            name: name.into(),
            namespace: String::new(),
        }
    }

    pub fn service_account(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::ServiceAccount,
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// User name a service account authenticates as.
    ///
    /// Returns `None` for non service account subjects and for service
    /// accounts without a namespace.
    pub fn service_account_identity(&self) -> Option<String> {
        if self.kind != SubjectKind::ServiceAccount || self.namespace.is_empty() {
            return None;
        }
        Some(format!(
            "{}:{}:{}",
            SERVICE_ACCOUNT_PREFIX, self.name, self.namespace
        ))
    }

    /// Check the subject is well formed
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err(format!("{} subject has an empty name", self.kind));
        }
        match self.kind {
            SubjectKind::ServiceAccount if self.namespace.is_empty() => Err(format!(
                "ServiceAccount subject '{}' has no namespace",
                self.name
            )),
            SubjectKind::User | SubjectKind::Group if !self.namespace.is_empty() => Err(format!(
                "{} subject '{}' cannot have a namespace, got '{}'",
                self.kind, self.name, self.namespace
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_account_identity() {
        let sa = Subject::service_account("builder", "ci");
        assert_eq!(
            sa.service_account_identity().as_deref(),
            Some("system:service:builder:ci")
        );

        let missing_ns = Subject::service_account("builder", "");
        assert_eq!(missing_ns.service_account_identity(), None);

        assert_eq!(Subject::user("alice").service_account_identity(), None);
    }

    #[test]
    fn test_subject_validation() {
        assert!(Subject::user("alice").validate().is_ok());
        assert!(Subject::group("developers").validate().is_ok());
        assert!(Subject::user("").validate().is_err());
        assert!(Subject::service_account("builder", "").validate().is_err());
    }

    #[test]
    fn test_user_and_group_subjects_are_not_namespaced() {
        let mut alice = Subject::user("alice");
        alice.namespace = "dev".to_string();
        assert!(alice.validate().unwrap_err().contains("cannot have a namespace"));

        let mut developers = Subject::group("developers");
        developers.namespace = "dev".to_string();
        assert!(developers.validate().is_err());

        assert!(Subject::service_account("builder", "ci").validate().is_ok());
    }

    #[test]
    fn test_subject_json() {
        let subject: Subject = serde_json::from_str(
            r#"{"kind": "ServiceAccount", "name": "builder", "namespace": "ci"}"#,
        )
        .unwrap();
        assert_eq!(subject, Subject::service_account("builder", "ci"));

        let out = serde_json::to_value(Subject::user("alice")).unwrap();
        assert_eq!(out, serde_json::json!({"kind": "User", "name": "alice"}));

        let unknown: Result<Subject, _> =
            serde_json::from_str(r#"{"kind": "Robot", "name": "r2"}"#);
        assert!(unknown.is_err());
    }
}

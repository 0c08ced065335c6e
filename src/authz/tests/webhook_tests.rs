//! Webhook HTTP tests, driven in-process through the router

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rbac_authz::webhook::{create_router, AppState};
use rbac_authz::{Authorizer, InMemoryPolicyStore};
use rbac_core::{
    ClusterRole, ClusterRoleBinding, PolicyDocument, PolicyRule, Role, RoleBinding, RoleRef,
    Subject,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn policy() -> PolicyDocument {
    PolicyDocument {
        roles: vec![Role::new(
            "pod-reader",
            "kittensandponies",
            vec![PolicyRule::resource(["get", "list"], ["*"], ["pods"])],
        )],
        role_bindings: vec![
            RoleBinding::new(
                "readers",
                "kittensandponies",
                vec![Subject::group("group1")],
                RoleRef::role("pod-reader"),
            ),
            RoleBinding::new(
                "broken",
                "broken-ns",
                vec![Subject::user("jane")],
                RoleRef::role("missing"),
            ),
        ],
        cluster_roles: vec![ClusterRole::new(
            "debugger",
            vec![PolicyRule::non_resource(["get"], ["/debug"])],
        )],
        cluster_role_bindings: vec![ClusterRoleBinding::new(
            "debuggers",
            vec![Subject::user("jane")],
            RoleRef::cluster_role("debugger"),
        )],
    }
}

fn app() -> Router {
    let store = InMemoryPolicyStore::from_document(policy());
    create_router(AppState::new(Authorizer::new(Arc::new(store))))
}

async fn post_review(body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/authorize")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn resource_review(user: &str, groups: &[&str], namespace: &str, verb: &str) -> Value {
    json!({
        "apiVersion": "authorization.k8s.io/v1beta1",
        "kind": "SubjectAccessReview",
        "spec": {
            "resourceAttributes": {
                "namespace": namespace,
                "verb": verb,
                "group": "unicorn.example.org",
                "resource": "pods",
                "name": "nginx"
            },
            "user": user,
            "group": groups
        }
    })
}

#[tokio::test]
async fn test_resource_review_allowed() {
    let review = resource_review("jane", &["group1"], "kittensandponies", "get");
    let (status, body) = post_review(review).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["allowed"], json!(true));
    assert!(body["status"].get("reason").is_none());
    assert_eq!(body["kind"], json!("SubjectAccessReview"));
    assert_eq!(body["spec"]["user"], json!("jane"));
}

#[tokio::test]
async fn test_resource_review_denied() {
    let review = resource_review("jane", &["group1"], "kittensandponies", "delete");
    let (status, body) = post_review(review).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["allowed"], json!(false));
}

#[tokio::test]
async fn test_non_resource_review() {
    let review = json!({
        "spec": {
            "nonResourceAttributes": {"path": "/debug", "verb": "get"},
            "user": "jane"
        }
    });
    let (status, body) = post_review(review).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["allowed"], json!(true));

    let review = json!({
        "spec": {
            "nonResourceAttributes": {"path": "/metrics", "verb": "get"},
            "user": "jane"
        }
    });
    let (_, body) = post_review(review).await;
    assert_eq!(body["status"]["allowed"], json!(false));
}

#[tokio::test]
async fn test_review_without_attributes_is_bad_request() {
    let (status, body) = post_review(json!({"spec": {"user": "jane"}})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("bad_request"));
    assert!(body["message"].as_str().unwrap().contains("Malformed request"));
}

#[tokio::test]
async fn test_integrity_error_denies_with_reason() {
    let (status, body) = post_review(resource_review("jane", &[], "broken-ns", "get")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["allowed"], json!(false));
    let reason = body["status"]["reason"].as_str().unwrap();
    assert!(reason.contains("Configuration integrity error"), "reason: {}", reason);
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["version"], json!(rbac_authz::VERSION));
}

#[tokio::test]
async fn test_review_with_group_and_groups_is_rejected() {
    let review = json!({
        "spec": {
            "nonResourceAttributes": {"path": "/debug", "verb": "get"},
            "user": "jane",
            "group": ["group1"],
            "groups": ["group2"]
        }
    });

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/authorize")
                .header("content-type", "application/json")
                .body(Body::from(review.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

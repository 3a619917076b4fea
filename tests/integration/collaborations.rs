//! Integration tests for entitlements, grants and grant mutations

use super::*;
use integrations_lucidchart::connector::{
    role_entitlement, ResourceId, DOCUMENT_RESOURCE_TYPE, FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID,
    USER_RESOURCE_TYPE,
};
use integrations_lucidchart::errors::ResponseError;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{any, bearer_token, body_json};

fn folder() -> Resource {
    Resource::new(&FOLDER_RESOURCE_TYPE, "12", "Designs")
}

fn document() -> Resource {
    Resource::new(&DOCUMENT_RESOURCE_TYPE, "doc-1", "Org chart")
}

fn user() -> Resource {
    Resource::new(&USER_RESOURCE_TYPE, "34", "ada@example.com")
}

async fn no_requests() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_entitlements_per_role() {
    let server = no_requests().await;
    let connector = connector(&server);

    let entitlements = assert_ok!(connector.folders().entitlements(&folder()).await);
    let slugs: Vec<&str> = entitlements.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["user/owner", "user/editandshare", "user/edit", "user/comment", "user/view"]
    );
    assert_eq!(entitlements[4].display_name, "User is view of Designs");
    assert_eq!(entitlements[4].description, "User can view on Designs");

    let entitlements = assert_ok!(connector.documents().entitlements(&document()).await);
    assert_eq!(entitlements.len(), 5);
    assert!(entitlements.iter().all(|e| e.resource.id == document().id));
}

#[tokio::test]
async fn test_folder_grants() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folders/12/shares/users"))
        .and(bearer_token(API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            collaboration(34, "owner"),
            collaboration(35, "view")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);

    let page = assert_ok!(connector.folders().grants(&folder(), None).await);
    assert_eq!(page.len(), 2);
    assert_eq!(page.next_page_token, None);

    let grant = &page.items[0];
    assert_eq!(grant.entitlement.slug, "user/owner");
    assert_eq!(grant.entitlement.resource.id, folder().id);
    assert_eq!(grant.principal, ResourceId::new(&USER_RESOURCE_TYPE, "34"));
    assert_eq!(grant.metadata["role"], "owner");
    assert_eq!(grant.metadata["created"], "2024-03-01T10:00:00+00:00");

    assert_eq!(page.items[1].entitlement.slug, "user/view");
}

#[tokio::test]
async fn test_root_folder_has_no_grants() {
    let server = no_requests().await;
    let connector = connector(&server);

    let root = Resource::new(&FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID, ROOT_FOLDER_ID);
    let page = assert_ok!(connector.folders().grants(&root, None).await);
    assert!(page.is_empty());
    assert_eq!(page.next_page_token, None);
}

#[tokio::test]
async fn test_editandshare_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/folders/12/shares/users/34"))
        .and(bearer_token(API_KEY))
        .and(body_json(json!({"role": "editandshare"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(collaboration(34, "editandshare")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/folders/12/shares/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([collaboration(34, "editandshare")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let syncer = connector.folders();
    let provisioner = syncer.provisioner().unwrap();

    let entitlement = role_entitlement(&folder(), CollaboratorRole::EditAndShare);
    let granted = assert_ok!(provisioner.grant(&user(), &entitlement).await);
    assert_eq!(granted.entitlement.slug, "user/editandshare");
    assert_eq!(granted.entitlement.resource.id, folder().id);
    assert_eq!(granted.principal, user().id);
    assert_eq!(granted.metadata["role"], "editandshare");

    let listed = assert_ok!(syncer.grants(&folder(), None).await);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.items[0].entitlement.slug, "user/editandshare");
    assert_eq!(listed.items[0].principal, user().id);
    assert_eq!(listed.items[0].id, granted.id);
}

#[tokio::test]
async fn test_document_grant() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/documents/doc-1/shares/users/34"))
        .and(body_json(json!({"role": "comment"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentId": "doc-1",
            "userId": 34,
            "role": "comment",
            "created": "2024-03-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let syncer = connector.documents();

    let entitlement = role_entitlement(&document(), CollaboratorRole::Comment);
    let grant = assert_ok!(syncer.provisioner().unwrap().grant(&user(), &entitlement).await);
    assert_eq!(grant.entitlement.resource.id, document().id);
    assert_eq!(grant.entitlement.slug, "user/comment");
}

#[tokio::test]
async fn test_grant_response_must_echo_request() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/folders/12/shares/users/34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collaboration(34, "view")))
        .mount(&server)
        .await;

    let connector = connector(&server);
    let syncer = connector.folders();

    let entitlement = role_entitlement(&folder(), CollaboratorRole::Edit);
    let err = assert_err!(syncer.provisioner().unwrap().grant(&user(), &entitlement).await);
    assert!(matches!(
        err,
        LucidchartError::Response(ResponseError::UnexpectedFormat(_))
    ));
}

#[tokio::test]
async fn test_grant_rejects_invalid_arguments() {
    let server = no_requests().await;
    let connector = connector(&server);
    let syncer = connector.folders();
    let provisioner = syncer.provisioner().unwrap();

    let mut malformed = role_entitlement(&folder(), CollaboratorRole::View);
    malformed.slug = "view".to_string();
    let err = assert_err!(provisioner.grant(&user(), &malformed).await);
    assert!(err.is_invalid_argument());

    let mut unknown_role = role_entitlement(&folder(), CollaboratorRole::View);
    unknown_role.slug = "user/admin".to_string();
    let err = assert_err!(provisioner.grant(&user(), &unknown_role).await);
    assert!(err.is_invalid_argument());

    let entitlement = role_entitlement(&folder(), CollaboratorRole::View);
    let err = assert_err!(provisioner.grant(&document(), &entitlement).await);
    assert!(err.is_invalid_argument());

    let root = Resource::new(&FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID, ROOT_FOLDER_ID);
    let on_root = role_entitlement(&root, CollaboratorRole::View);
    let err = assert_err!(provisioner.grant(&user(), &on_root).await);
    assert!(err.is_invalid_argument());

    let on_document = role_entitlement(&document(), CollaboratorRole::View);
    let err = assert_err!(provisioner.grant(&user(), &on_document).await);
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_revoke() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/folders/12/shares/users/34"))
        .and(bearer_token(API_KEY))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let syncer = connector.folders();

    let grant = Grant::new(role_entitlement(&folder(), CollaboratorRole::Edit), user().id);
    let outcome = assert_ok!(syncer.provisioner().unwrap().revoke(&grant).await);
    assert_eq!(outcome, RevokeOutcome::Revoked);
}

#[tokio::test]
async fn test_revoke_missing_collaboration_is_already_revoked() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/documents/doc-1/shares/users/34"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "notFound",
            "message": "collaborator not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let syncer = connector.documents();

    let grant = Grant::new(role_entitlement(&document(), CollaboratorRole::View), user().id);
    let outcome = assert_ok!(syncer.provisioner().unwrap().revoke(&grant).await);
    assert_eq!(outcome, RevokeOutcome::AlreadyRevoked);
}

#[tokio::test]
async fn test_revoke_propagates_other_failures() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/folders/12/shares/users/34"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let connector = connector(&server);
    let syncer = connector.folders();

    let grant = Grant::new(role_entitlement(&folder(), CollaboratorRole::Edit), user().id);
    let err = assert_err!(syncer.provisioner().unwrap().revoke(&grant).await);
    assert!(matches!(err, LucidchartError::Authorization(_)));
}

#[tokio::test]
async fn test_revoke_rejects_non_user_principal() {
    let server = no_requests().await;
    let connector = connector(&server);
    let syncer = connector.folders();

    let grant = Grant::new(role_entitlement(&folder(), CollaboratorRole::Edit), document().id);
    let err = assert_err!(syncer.provisioner().unwrap().revoke(&grant).await);
    assert!(err.is_invalid_argument());
}

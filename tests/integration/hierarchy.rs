//! Integration tests for folder and document listing

use super::*;
use integrations_lucidchart::connector::{
    ResourceId, DOCUMENT_RESOURCE_TYPE, FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID,
};
use tokio_test::assert_ok;
use wiremock::matchers::{any, bearer_token, query_param};

fn mixed_contents() -> Value {
    json!([
        {"id": 397240323.0, "type": "folder", "name": "Designs", "shortcut": false},
        {"id": "0b1e6f3a-doc", "type": "document", "name": "Org chart", "product": "lucidchart"}
    ])
}

#[tokio::test]
async fn test_first_listing_bootstraps_root_without_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let connector = connector(&server);

    let page = assert_ok!(connector.folders().list(None, None).await);
    assert_eq!(page.len(), 1);
    assert_eq!(page.next_page_token, None);

    let root = &page.items[0];
    assert_eq!(root.id, ResourceId::new(&FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID));
    assert_eq!(root.parent_id, None);
    assert_eq!(root.child_resource_types, vec!["folder", "document"]);

    // Documents are never listed without a parent.
    let page = assert_ok!(connector.documents().list(None, None).await);
    assert!(page.is_empty());
    assert_eq!(page.next_page_token, None);
}

#[tokio::test]
async fn test_root_contents_routed_by_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folders/root/contents"))
        .and(bearer_token(API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_contents()))
        .expect(2)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let root = ResourceId::new(&FOLDER_RESOURCE_TYPE, ROOT_FOLDER_ID);

    let folders = assert_ok!(connector.folders().list(Some(&root), None).await);
    assert_eq!(folders.len(), 1);
    let folder = &folders.items[0];
    assert_eq!(folder.id, ResourceId::new(&FOLDER_RESOURCE_TYPE, "397240323"));
    assert_eq!(folder.display_name, "Designs");
    assert_eq!(folder.parent_id.as_ref(), Some(&root));
    assert_eq!(folder.child_resource_types, vec!["folder", "document"]);

    let documents = assert_ok!(connector.documents().list(Some(&root), None).await);
    assert_eq!(documents.len(), 1);
    let document = &documents.items[0];
    assert_eq!(document.id, ResourceId::new(&DOCUMENT_RESOURCE_TYPE, "0b1e6f3a-doc"));
    assert_eq!(document.display_name, "Org chart");
    assert_eq!(document.parent_id.as_ref(), Some(&root));
    assert!(document.child_resource_types.is_empty());
}

#[tokio::test]
async fn test_nested_folder_contents_with_cursor() {
    let server = MockServer::start().await;
    let link = format!(
        "<{}/folders/397240323/contents?pageToken=next-docs>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/folders/397240323/contents"))
        .and(query_param("pageToken", "docs"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link.as_str())
                .set_body_json(mixed_contents()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let parent = ResourceId::new(&FOLDER_RESOURCE_TYPE, "397240323");

    let page = assert_ok!(connector.documents().list(Some(&parent), Some("docs")).await);
    assert_eq!(page.len(), 1);
    assert_eq!(page.items[0].parent_id.as_ref(), Some(&parent));
    assert_eq!(page.next_page_token.as_deref(), Some("next-docs"));
}

#[tokio::test]
async fn test_unknown_content_types_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folders/5/contents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 6, "type": "board", "name": "Whiteboard"}
        ])))
        .mount(&server)
        .await;

    let connector = connector(&server);
    let parent = ResourceId::new(&FOLDER_RESOURCE_TYPE, "5");

    assert!(assert_ok!(connector.folders().list(Some(&parent), None).await).is_empty());
    assert!(assert_ok!(connector.documents().list(Some(&parent), None).await).is_empty());
}

#[tokio::test]
async fn test_failed_page_returns_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folders/5/contents"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let connector = connector(&server);
    let parent = ResourceId::new(&FOLDER_RESOURCE_TYPE, "5");

    let err = connector.folders().list(Some(&parent), None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_untyped_item_does_not_fail_page() {
    let server = MockServer::start().await;
    let link = format!(
        "<{}/folders/5/contents?fields=id,type,name&pageToken=more>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/folders/5/contents"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link.as_str())
                .set_body_json(json!([
                    {"id": 6, "type": "folder", "name": "Kept"},
                    {"id": 7, "name": "Untyped"},
                    {"id": "doc-8", "type": "document", "name": "Also kept"}
                ])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let connector = connector(&server);
    let parent = ResourceId::new(&FOLDER_RESOURCE_TYPE, "5");

    let folders = assert_ok!(connector.folders().list(Some(&parent), None).await);
    assert_eq!(folders.len(), 1);
    assert_eq!(folders.items[0].id.resource, "6");
    assert_eq!(folders.next_page_token.as_deref(), Some("more"));

    let documents = assert_ok!(connector.documents().list(Some(&parent), None).await);
    assert_eq!(documents.len(), 1);
    assert_eq!(documents.items[0].id.resource, "doc-8");
}

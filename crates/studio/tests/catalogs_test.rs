//! Bundled template fetching

mod common;

use common::TestServer;
use pretty_assertions::assert_eq;
use serde_json::json;
use template_studio::{get_blank_template, StudioError, TemplateCatalog};

fn catalog(server: &TestServer) -> TemplateCatalog {
    TemplateCatalog::with_client(common::client(), &server.base_url)
}

#[tokio::test]
async fn test_fetches_and_validates_by_id() {
    let body = json!({
        "schemas": [[
            {"name": "title", "type": "text", "position": {"x": 10, "y": 10},
             "width": 100, "height": 10}
        ]],
        "basePdf": {"width": 210, "height": 297, "padding": [0, 0, 0, 0]}
    });
    let server = TestServer::start(vec![(
        "/template-assets/invoice/template.json",
        200,
        body.to_string().into_bytes(),
    )])
    .await;

    let template = catalog(&server).get_template_by_id("invoice").await.unwrap();

    assert_eq!(template.schemas.len(), 1);
    let names: Vec<&str> = template.named_schemas().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["title"]);
    assert_eq!(server.hits(), vec!["/template-assets/invoice/template.json".to_string()]);
}

#[tokio::test]
async fn test_missing_template_is_template_fetch() {
    let server = TestServer::start(vec![]).await;

    let err = catalog(&server).get_template_by_id("nope").await.unwrap_err();

    match err {
        StudioError::TemplateFetch { url, status } => {
            assert_eq!(url, server.url("/template-assets/nope/template.json"));
            assert_eq!(status, 404);
        }
        other => panic!("expected TemplateFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_bodies_fail_like_file_loading() {
    let no_pages = json!({
        "schemas": [],
        "basePdf": {"width": 210, "height": 297, "padding": [0, 0, 0, 0]}
    });
    let server = TestServer::start(vec![
        ("/template-assets/html/template.json", 200, b"<html></html>".to_vec()),
        ("/template-assets/empty/template.json", 200, no_pages.to_string().into_bytes()),
    ])
    .await;
    let catalog = catalog(&server);

    let err = catalog.get_template_by_id("html").await.unwrap_err();
    assert!(matches!(err, StudioError::MalformedJson(_)), "{err:?}");

    let err = catalog.get_template_by_id("empty").await.unwrap_err();
    assert!(matches!(err, StudioError::InvalidTemplate(_)), "{err:?}");
}

#[tokio::test]
async fn test_blank_template_serves_as_bundled_template() {
    let blank = serde_json::to_vec(&get_blank_template()).unwrap();
    let server =
        TestServer::start(vec![("/template-assets/blank/template.json", 200, blank)]).await;

    let template = catalog(&server).get_template_by_id("blank").await.unwrap();

    assert_eq!(template, get_blank_template());
}

//! Font loading against a local HTTP server

mod common;

use common::TestServer;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use template::{default_font, FontEntry, FontSource, DEFAULT_FONT_NAME};
use template_studio::{FontLoader, FontProvider, StudioConfig, StudioError};

fn config_for(server: &TestServer) -> StudioConfig {
    StudioConfig {
        asset_base_url: server.base_url.clone(),
        ..StudioConfig::default()
    }
}

#[tokio::test]
async fn test_not_found_is_an_error_not_a_payload() {
    let server = TestServer::start(vec![]).await;
    let loader = FontLoader::with_client(common::client(), &config_for(&server));

    let url = server.url("/assets/fonts/missing.ttf");
    let err = loader.load_font_as_bytes(&url).await.unwrap_err();
    match err {
        StudioError::FontFetch { url: failed, status } => {
            assert_eq!(failed, url);
            assert_eq!(status, 404);
        }
        other => panic!("expected FontFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_font_fetch() {
    let server = TestServer::start(vec![("/f.ttf", 500, b"oops".to_vec())]).await;
    let loader = FontLoader::with_client(common::client(), &config_for(&server));
    let err = loader.load_font_as_bytes(&server.url("/f.ttf")).await.unwrap_err();
    assert!(matches!(err, StudioError::FontFetch { status: 500, .. }));
}

#[tokio::test]
async fn test_get_fonts_data_adds_five_non_fallback_entries() {
    let server = TestServer::start(vec![
        ("/assets/fonts/tinos/Tinos-Regular.ttf", 200, b"regular".to_vec()),
        ("/assets/fonts/tinos/Tinos-Bold.ttf", 200, b"bold".to_vec()),
    ])
    .await;
    let loader = FontLoader::with_client(common::client(), &config_for(&server));

    let font = loader.get_fonts_data().await.unwrap();

    let defaults = default_font();
    assert_eq!(font.len(), defaults.len() + 5);
    assert_eq!(font[DEFAULT_FONT_NAME], defaults[DEFAULT_FONT_NAME]);

    let added: Vec<(&String, &FontEntry)> = font
        .iter()
        .filter(|(name, _)| !defaults.contains_key(*name))
        .collect();
    assert_eq!(added.len(), 5);
    assert!(added.iter().all(|(_, entry)| !entry.fallback));

    assert_eq!(font["Tinos-Regular"].data, FontSource::Data(b"regular".to_vec()));
    assert_eq!(font["Tinos-Bold"].data, FontSource::Data(b"bold".to_vec()));
    for name in ["NotoSerifJP", "NotoSansJP", "PinyonScript-Regular"] {
        let remote = matches!(
            &font[name].data,
            FontSource::Url(url) if url.starts_with("https://fonts.gstatic.com/")
        );
        assert!(remote, "{name}");
    }

    let mut hits = server.hits();
    hits.sort();
    assert_eq!(
        hits,
        vec![
            "/assets/fonts/tinos/Tinos-Bold.ttf".to_string(),
            "/assets/fonts/tinos/Tinos-Regular.ttf".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_local_font_failure_propagates() {
    let server = TestServer::start(vec![(
        "/assets/fonts/tinos/Tinos-Regular.ttf",
        200,
        b"regular".to_vec(),
    )])
    .await;
    let loader = FontLoader::with_client(common::client(), &config_for(&server));

    let err = loader.fonts().await.unwrap_err();
    let bold_missing = matches!(
        &err,
        StudioError::FontFetch { url, status: 404 } if url.ends_with("Tinos-Bold.ttf")
    );
    assert!(bold_missing, "{err:?}");
}

#[tokio::test]
async fn test_resolve_urls_only_fetches_named_entries() {
    let server = TestServer::start(vec![("/fonts/used.ttf", 200, b"used".to_vec())]).await;
    let loader = FontLoader::with_client(common::client(), &config_for(&server));

    let mut font = default_font();
    font.insert("Used".to_string(), FontEntry::url("/fonts/used.ttf"));
    font.insert("Unused".to_string(), FontEntry::url("/fonts/unused.ttf"));

    let names: BTreeSet<String> =
        ["Used".to_string(), "NotRegistered".to_string()].into_iter().collect();
    loader.resolve_urls(&mut font, &names).await.unwrap();

    assert_eq!(font["Used"].data, FontSource::Data(b"used".to_vec()));
    assert_eq!(font["Unused"].data, FontSource::Url("/fonts/unused.ttf".to_string()));
    assert!(matches!(font[DEFAULT_FONT_NAME].data, FontSource::Url(_)));
    assert_eq!(server.hits(), vec!["/fonts/used.ttf".to_string()]);
}

/// Integration tests for the HTTP fetcher against a mock server.
///
/// Test coverage:
/// - Query parameters and browser headers on the wire
/// - Payload decoding, including boolean-like isNew values
/// - Non-200 statuses, malformed bodies and unreachable hosts map to the error sentinel
use crafter::adapters::fetchers::HttpFetcher;
use crafter::domain::ports::Fetcher;
use crafter::{Element, FetcherConfig, Pair};
use mockito::{Matcher, Server};

fn config_for(server: &Server) -> FetcherConfig {
    FetcherConfig {
        base_url: format!("{}/api/infinite-craft/pair", server.url()),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn water_fire() -> Pair {
    let base = Element::base_set();
    let water = base.iter().find(|e| e.name() == "Water").cloned().unwrap();
    let fire = base.iter().find(|e| e.name() == "Fire").cloned().unwrap();
    Pair::new(water, fire)
}

#[tokio::test]
async fn test_resolve_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/infinite-craft/pair")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("first".into(), "Fire".into()),
            Matcher::UrlEncoded("second".into(), "Water".into()),
        ]))
        .match_header("referer", "https://neal.fun/infinite-craft/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": "Steam", "emoji": "💨", "isNew": false}"#)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let element = fetcher.resolve(&water_fire()).await;

    mock.assert_async().await;
    assert_eq!(element.name(), "Steam");
    assert_eq!(element.glyph(), "💨");
    assert!(!element.is_new());
}

#[tokio::test]
async fn test_resolve_accepts_textual_is_new() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/infinite-craft/pair")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"result": "Obsidian", "emoji": "🪨", "isNew": "True"}"#)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let element = fetcher.resolve(&water_fire()).await;
    assert_eq!(element.name(), "Obsidian");
    assert!(element.is_new());
}

#[tokio::test]
async fn test_non_200_becomes_error_sentinel() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/infinite-craft/pair")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let element = fetcher.resolve(&water_fire()).await;
    assert!(element.is_error());
}

#[tokio::test]
async fn test_malformed_body_becomes_error_sentinel() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/infinite-craft/pair")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"emoji": "💨"}"#)
        .expect(2)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    assert!(fetcher.resolve(&water_fire()).await.is_error());
    assert!(fetcher.resolve(&water_fire()).await.is_error());
}

#[tokio::test]
async fn test_empty_result_name_becomes_error_sentinel() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/infinite-craft/pair")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"result": "  ", "emoji": "", "isNew": false}"#)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    assert!(fetcher.resolve(&water_fire()).await.is_error());
}

#[tokio::test]
async fn test_unreachable_host_becomes_error_sentinel() {
    let config = FetcherConfig {
        base_url: "http://127.0.0.1:9/pair".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    assert!(fetcher.resolve(&water_fire()).await.is_error());
}

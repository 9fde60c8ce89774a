use crate::common::{SpyTransport, mock_client, spy_client};
use mockito::{Matcher, Server};
use robinhood_client::prelude::*;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_instrument_id_lookup_is_unauthenticated() {
    let mut server = Server::new_async().await;
    let lookup = server
        .mock("GET", "/instruments/")
        .match_query(Matcher::UrlEncoded("symbol".into(), "AAPL".into()))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"id":"450dfc6d-5510-4d40-abfb-f633b7d9be3e","symbol":"AAPL"}],"next":null}"#)
        .create_async()
        .await;

    let (client, _sink) = mock_client(&server);
    let id = client.get_instrument_id("aapl").await.unwrap();

    assert_eq!(id, "450dfc6d-5510-4d40-abfb-f633b7d9be3e");
    lookup.assert_async().await;
}

#[tokio::test]
async fn test_unknown_symbol_is_instrument_not_found() {
    let spy = SpyTransport::sequence(vec![json!({"results": [], "next": null})]);
    let (client, _sink) = spy_client(&spy);

    match client.get_instrument_id("ZZZZ").await {
        Err(AppError::InstrumentNotFound(symbol)) => assert_eq!(symbol, "ZZZZ"),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_symbol_is_rejected_locally() {
    let spy = SpyTransport::sequence(vec![]);
    let (client, _sink) = spy_client(&spy);

    for symbol in ["", "AA PL", "AAPL&x=1", "WAYTOOLONGSYMBOL"] {
        assert!(matches!(
            client.get_instrument_id(symbol).await,
            Err(AppError::InvalidInput(_))
        ));
    }
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn test_listing_follows_next_links() {
    let mut server = Server::new_async().await;
    let page_two = format!("{}/instruments/?cursor=page2", server.url());
    let first = server
        .mock("GET", "/instruments/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "results": [{"symbol": "AAPL"}, {"symbol": "MSFT"}],
                "next": page_two
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/instruments/")
        .match_query(Matcher::UrlEncoded("cursor".into(), "page2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"symbol":"TSLA"}],"next":null}"#)
        .create_async()
        .await;

    let (client, _sink) = mock_client(&server);
    let instruments = client.get_all_instruments().await.unwrap();

    let symbols: Vec<&str> = instruments
        .iter()
        .filter_map(|i| i["symbol"].as_str())
        .collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_batch_lookup_keeps_order_and_bounds_concurrency() {
    let spy = SpyTransport::with_responder(|request| {
        let symbol = request
            .query
            .iter()
            .find(|(k, _)| k == "symbol")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        if symbol == "NOPE" {
            json!({"results": [], "next": null})
        } else {
            json!({"results": [{"id": format!("id-{symbol}")}], "next": null})
        }
    })
    .with_delay(Duration::from_millis(20));
    let (client, _sink) = spy_client(&spy);

    let symbols: Vec<String> = ["aapl", "MSFT", "NOPE", "TSLA", "AMZN", "GOOG"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let resolved = client.lookup_instrument_ids(&symbols).await.unwrap();

    assert_eq!(
        resolved,
        vec![
            ("AAPL".to_string(), Some("id-AAPL".to_string())),
            ("MSFT".to_string(), Some("id-MSFT".to_string())),
            ("NOPE".to_string(), None),
            ("TSLA".to_string(), Some("id-TSLA".to_string())),
            ("AMZN".to_string(), Some("id-AMZN".to_string())),
            ("GOOG".to_string(), Some("id-GOOG".to_string())),
        ]
    );
    assert_eq!(spy.calls(), 6);
    assert!(spy.max_in_flight() <= client.config().instrument_lookup_concurrency);
}

#[tokio::test]
async fn test_batch_lookup_rejects_bad_symbol_before_sending() {
    let spy = SpyTransport::sequence(vec![]);
    let (client, _sink) = spy_client(&spy);

    let symbols = vec!["AAPL".to_string(), "bad symbol".to_string()];
    assert!(matches!(
        client.lookup_instrument_ids(&symbols).await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(spy.calls(), 0);
}

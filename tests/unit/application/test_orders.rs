use crate::common::{SpyTransport, authenticated_mock_client, authenticated_spy_client, spy_client};
use mockito::{Matcher, Mock, ServerGuard};
use robinhood_client::prelude::*;
use serde_json::json;
use tracing::Level;

async fn mock_lookups(server: &mut ServerGuard) -> (Mock, Mock) {
    let instrument = server
        .mock("GET", "/instruments/")
        .match_query(Matcher::UrlEncoded("symbol".into(), "AAPL".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"id":"inst-1","symbol":"AAPL"}],"next":null}"#)
        .create_async()
        .await;
    let accounts = server
        .mock("GET", "/accounts/")
        .match_header("authorization", "Token abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results":[{"account_number":"XJ123"}]}"#)
        .create_async()
        .await;
    (instrument, accounts)
}

#[tokio::test]
async fn test_buy_order_submits_form_and_returns_confirmation() {
    let mut server = mockito::Server::new_async().await;
    let (client, sink) = authenticated_mock_client(&mut server).await;
    let (instrument, accounts) = mock_lookups(&mut server).await;
    let base = server.url();

    let order = server
        .mock("POST", "/orders/")
        .match_header("authorization", "Token abc123")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("account".into(), format!("{base}/accounts/XJ123/")),
            Matcher::UrlEncoded("instrument".into(), format!("{base}/instruments/inst-1/")),
            Matcher::UrlEncoded("symbol".into(), "AAPL".into()),
            Matcher::UrlEncoded("type".into(), "limit".into()),
            Matcher::UrlEncoded("time_in_force".into(), "gfd".into()),
            Matcher::UrlEncoded("price".into(), "150.25".into()),
            Matcher::UrlEncoded("trigger".into(), "immediate".into()),
            Matcher::UrlEncoded("quantity".into(), "3".into()),
            Matcher::UrlEncoded("side".into(), "buy".into()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "order-1",
                "state": "queued",
                "side": "buy",
                "quantity": "3.00000",
                "price": "150.25000000"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request =
        OrderRequest::new("aapl", OrderType::Limit, TimeInForce::Gfd, 3).with_price("150.25");
    let outcome = client.buy_order(&request).await.unwrap();

    assert!(outcome.is_placed());
    assert_eq!(outcome.order_id(), Some("order-1"));
    assert!(sink.messages_at(Level::ERROR).is_empty());
    instrument.assert_async().await;
    accounts.assert_async().await;
    order.assert_async().await;
}

#[tokio::test]
async fn test_short_order_response_is_rejection() {
    let mut server = mockito::Server::new_async().await;
    let (client, sink) = authenticated_mock_client(&mut server).await;
    let (_instrument, _accounts) = mock_lookups(&mut server).await;

    let order = server
        .mock("POST", "/orders/")
        .match_body(Matcher::UrlEncoded("side".into(), "sell".into()))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Not enough shares to sell."}"#)
        .create_async()
        .await;

    let request = OrderRequest::new("AAPL", OrderType::Market, TimeInForce::Gtc, 1);
    let outcome = client.sell_order(&request).await.unwrap();

    match outcome {
        OrderOutcome::Rejected { detail, .. } => {
            assert_eq!(detail.as_deref(), Some("Not enough shares to sell."));
        }
        other => panic!("Unexpected outcome: {other:?}"),
    }
    let errors = sink.messages_at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("sell order failed"));
    order.assert_async().await;
}

#[tokio::test]
async fn test_order_without_session_sends_nothing() {
    let spy = SpyTransport::sequence(vec![]);
    let (client, sink) = spy_client(&spy);

    let request = OrderRequest::new("AAPL", OrderType::Market, TimeInForce::Gfd, 1);
    assert!(matches!(
        client.buy_order(&request).await,
        Err(AppError::NotAuthenticated)
    ));
    assert_eq!(spy.calls(), 0);
    assert_eq!(sink.messages_at(Level::ERROR).len(), 1);
}

#[tokio::test]
async fn test_order_for_unknown_symbol() {
    let (client, spy, _sink) =
        authenticated_spy_client(vec![json!({"results": [], "next": null})]).await;

    let request = OrderRequest::new("ZZZZ", OrderType::Market, TimeInForce::Gfd, 1);
    assert!(matches!(
        client.buy_order(&request).await,
        Err(AppError::InstrumentNotFound(_))
    ));
    // Only the instrument lookup went out
    assert_eq!(spy.calls(), 1);
}

#[tokio::test]
async fn test_invalid_order_is_rejected_before_lookups() {
    let (client, spy, _sink) = authenticated_spy_client(vec![]).await;

    let zero = OrderRequest::new("AAPL", OrderType::Market, TimeInForce::Gfd, 0);
    assert!(matches!(
        client.buy_order(&zero).await,
        Err(AppError::InvalidInput(_))
    ));
    let free = OrderRequest::new("AAPL", OrderType::Limit, TimeInForce::Gfd, 1).with_price("0");
    assert!(matches!(
        client.sell_order(&free).await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(spy.calls(), 0);
}

#[tokio::test]
async fn test_order_request_sequence_with_spy() {
    let (client, spy, _sink) = authenticated_spy_client(vec![
        json!({"results": [{"id": "inst-9"}]}),
        json!({"results": [{"account_number": "XJ123"}]}),
        json!({"id": "o-1", "state": "queued", "side": "sell"}),
    ])
    .await;

    let request = OrderRequest::new("MSFT", OrderType::Market, TimeInForce::Gfd, 2)
        .with_trigger(Trigger::Stop)
        .with_price("300.00");
    let outcome = client.sell_order(&request).await.unwrap();
    assert!(outcome.is_placed());

    let requests = spy.requests();
    let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.test.local/instruments/",
            "https://api.test.local/accounts/",
            "https://api.test.local/orders/",
        ]
    );
    assert!(requests[0].token.is_none());
    let submit = &requests[2];
    assert_eq!(submit.token.as_deref(), Some("abc123"));
    assert_eq!(
        submit.form_value("account"),
        Some("https://api.test.local/accounts/XJ123/")
    );
    assert_eq!(
        submit.form_value("instrument"),
        Some("https://api.test.local/instruments/inst-9/")
    );
    assert_eq!(submit.form_value("trigger"), Some("stop"));
    assert_eq!(submit.form_value("side"), Some("sell"));
}

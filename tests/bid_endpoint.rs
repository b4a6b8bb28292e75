use std::time::{Duration, Instant};

use actix_web::{test, web, App};
use bidder::bidding::{BidResponder, BID_AMOUNT_RANGE};
use bidder::registration::BidderIdentity;
use futures_util::future::join_all;
use serde_json::Value;

fn responder(delay: Duration) -> web::Data<BidResponder> {
    web::Data::new(BidResponder::new(BidderIdentity::new("bidder-7"), delay))
}

fn assert_well_formed(body: &Value, bidder_id: &str) {
    assert_eq!(body["data"]["bidder_id"], bidder_id);
    let amount = body["data"]["amount"]
        .as_u64()
        .expect("amount should be an integer");
    assert!(
        BID_AMOUNT_RANGE.contains(&(amount as u32)),
        "amount {amount} out of range"
    );
    assert_eq!(body["meta"]["status"], 200);
    assert!(body["meta"].get("message").is_none());
}

#[actix_web::test]
async fn bid_waits_for_configured_delay() {
    for delay_ms in [0u64, 25, 120] {
        let delay = Duration::from_millis(delay_ms);
        let app = test::init_service(
            App::new()
                .app_data(responder(delay))
                .configure(bidder::configure_routes),
        )
        .await;

        let started = Instant::now();
        let req = test::TestRequest::post().uri("/v1/bid").to_request();
        let res = test::call_service(&app, req).await;
        let elapsed = started.elapsed();

        assert_eq!(res.status(), 200);
        assert!(elapsed >= delay, "responded after {elapsed:?}, delay {delay:?}");
        let body: Value = test::read_body_json(res).await;
        assert_well_formed(&body, "bidder-7");
    }
}

#[actix_web::test]
async fn request_body_is_ignored() {
    let app = test::init_service(
        App::new()
            .app_data(responder(Duration::ZERO))
            .configure(bidder::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/bid")
        .set_json(serde_json::json!({ "auction_id": "a-1", "floor": 99999 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);

    let req = test::TestRequest::post()
        .uri("/v1/bid")
        .insert_header(("Content-Type", "text/plain"))
        .set_payload("not json at all")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);
    let body: Value = test::read_body_json(res).await;
    assert_well_formed(&body, "bidder-7");
}

#[actix_web::test]
async fn only_post_is_routed() {
    let app = test::init_service(
        App::new()
            .app_data(responder(Duration::ZERO))
            .configure(bidder::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/v1/bid").to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_client_error(), "got {}", res.status());
}

#[actix_web::test]
async fn concurrent_bids_each_wait_independently() {
    let delay = Duration::from_millis(100);
    let app = test::init_service(
        App::new()
            .app_data(responder(delay))
            .configure(bidder::configure_routes),
    )
    .await;

    let started = Instant::now();
    let calls = (0..50).map(|_| {
        let app = &app;
        async move {
            let begun = Instant::now();
            let req = test::TestRequest::post().uri("/v1/bid").to_request();
            let res = test::call_service(app, req).await;
            let status = res.status();
            let body: Value = test::read_body_json(res).await;
            (status, begun.elapsed(), body)
        }
    });
    let results = join_all(calls).await;
    let total = started.elapsed();

    assert_eq!(results.len(), 50);
    for (status, elapsed, body) in &results {
        assert_eq!(*status, 200);
        assert!(*elapsed >= delay, "a bid returned after {elapsed:?}");
        assert_well_formed(body, "bidder-7");
    }

    // sequential handling would take 50 delays
    assert!(total < delay * 25, "50 bids took {total:?}");

    let first = &results[0].2["data"]["amount"];
    assert!(
        results.iter().any(|(_, _, body)| &body["data"]["amount"] != first),
        "all concurrent bids drew the same amount"
    );
}

use actix_web::{App, http::StatusCode, test};
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;

mod common;

use common::{
    TestContext, book, create_default_spot, day, insert_booking, send, signup, today,
};
use spots_be::database::models::BookingWrite;
use spots_be::database::repositories::BookingRepository;

#[actix_rt::test]
async fn guest_books_free_dates() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let (status, body) = book(&app, &guest, spot_id, &day(10), &day(15)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["spotId"], spot_id);
    assert_eq!(body["userId"], guest.id);
    assert_eq!(body["startDate"], day(10));
    assert_eq!(body["endDate"], day(15));
}

#[actix_rt::test]
async fn owner_cannot_book_own_spot() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let (status, body) = book(&app, &owner, spot_id, &day(10), &day(15)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Forbidden" }));
}

#[actix_rt::test]
async fn overlapping_dates_conflict_and_adjacent_dates_do_not() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let first = signup(&app, "guest-one").await;
    let second = signup(&app, "guest-two").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let (status, _) = book(&app, &first, spot_id, &day(10), &day(15)).await;
    assert_eq!(status, StatusCode::CREATED);

    // inside, enclosing, overlapping either edge, sharing a boundary day
    for (start, end) in [(12, 13), (8, 20), (8, 11), (14, 18), (15, 18), (5, 10)] {
        let (status, body) = book(&app, &second, spot_id, &day(start), &day(end)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}..{}", start, end);
        assert_eq!(
            body,
            json!({
                "message": "Sorry, this spot is already booked for the specified dates",
                "errors": {
                    "startDate": "Start date conflicts with an existing booking",
                    "endDate": "End date conflicts with an existing booking",
                }
            })
        );
    }

    let (status, _) = book(&app, &second, spot_id, &day(16), &day(20)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = book(&app, &second, spot_id, &day(3), &day(9)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_rt::test]
async fn booking_dates_are_validated() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let (status, body) = book(&app, &guest, spot_id, &day(0), &day(3)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["startDate"], "startDate cannot be in the past");

    let (status, body) = book(&app, &guest, spot_id, &day(5), &day(5)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["endDate"],
        "endDate cannot be on or before startDate"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/spots/{}/bookings", spot_id))
        .cookie(guest.cookie.clone())
        .set_json(json!({}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "message": "Bad Request",
            "errors": {
                "startDate": "startDate is required",
                "endDate": "endDate is required",
            }
        })
    );
}

#[actix_rt::test]
async fn malformed_booking_dates_return_field_errors() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/spots/{}/bookings", spot_id))
        .cookie(guest.cookie.clone())
        .set_json(json!({ "startDate": "not-a-date", "endDate": 20250101 }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "message": "Bad Request",
            "errors": {
                "startDate": "startDate must be a date in YYYY-MM-DD format",
                "endDate": "endDate must be a date in YYYY-MM-DD format",
            }
        })
    );
}

#[actix_rt::test]
async fn booking_missing_spot_is_not_found() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let guest = signup(&app, "guest-one").await;
    let (status, body) = book(&app, &guest, 777, &day(2), &day(4)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Spot couldn't be found" }));
}

#[actix_rt::test]
async fn editing_a_booking_ignores_its_own_dates() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;
    let (_, booking) = book(&app, &guest, spot_id, &day(10), &day(15)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/bookings/{}", booking["id"]))
        .cookie(guest.cookie.clone())
        .set_json(json!({ "startDate": day(11), "endDate": day(16) }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], booking["id"]);
    assert_eq!(body["startDate"], day(11));
    assert_eq!(body["endDate"], day(16));
}

#[actix_rt::test]
async fn editing_into_another_booking_conflicts() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let first = signup(&app, "guest-one").await;
    let second = signup(&app, "guest-two").await;
    let spot_id = create_default_spot(&app, &owner).await;
    book(&app, &first, spot_id, &day(10), &day(15)).await;
    let (_, mine) = book(&app, &second, spot_id, &day(20), &day(25)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/bookings/{}", mine["id"]))
        .cookie(second.cookie.clone())
        .set_json(json!({ "startDate": day(14), "endDate": day(21) }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Sorry, this spot is already booked for the specified dates"
    );
}

#[actix_rt::test]
async fn only_booker_may_edit_or_delete() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;
    let (_, booking) = book(&app, &guest, spot_id, &day(10), &day(15)).await;
    let uri = format!("/api/bookings/{}", booking["id"]);

    let req = test::TestRequest::put()
        .uri(&uri)
        .cookie(owner.cookie.clone())
        .set_json(json!({ "startDate": day(11), "endDate": day(12) }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .cookie(owner.cookie.clone())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .cookie(guest.cookie.clone())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Successfully deleted" }));

    let req = test::TestRequest::delete()
        .uri(&uri)
        .cookie(guest.cookie.clone())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Booking couldn't be found" }));
}

#[actix_rt::test]
async fn past_bookings_cannot_be_modified() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;
    let booking_id = insert_booking(
        &ctx.pool,
        spot_id,
        guest.id,
        today() - Duration::days(10),
        today() - Duration::days(5),
    )
    .await
    .unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/bookings/{}", booking_id))
        .cookie(guest.cookie.clone())
        .set_json(json!({ "startDate": day(3), "endDate": day(6) }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Past bookings can't be modified" }));
}

#[actix_rt::test]
async fn started_bookings_cannot_be_deleted() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;
    let booking_id = insert_booking(
        &ctx.pool,
        spot_id,
        guest.id,
        today() - Duration::days(1),
        today() + Duration::days(2),
    )
    .await
    .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/bookings/{}", booking_id))
        .cookie(guest.cookie.clone())
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Bookings that have been started can't be deleted" })
    );
}

#[actix_rt::test]
async fn spot_bookings_view_depends_on_caller() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let first = signup(&app, "guest-one").await;
    let second = signup(&app, "guest-two").await;
    let spot_id = create_default_spot(&app, &owner).await;
    book(&app, &first, spot_id, &day(10), &day(12)).await;
    book(&app, &second, spot_id, &day(20), &day(22)).await;
    let uri = format!("/api/spots/{}/bookings", spot_id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .cookie(owner.cookie.clone())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["Bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0]["User"]["id"], first.id);
    assert!(bookings[0]["id"].is_i64());
    assert!(bookings[0]["createdAt"].is_string());

    let req = test::TestRequest::get()
        .uri(&uri)
        .cookie(second.cookie.clone())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Bookings": [
                { "spotId": spot_id, "startDate": day(20), "endDate": day(22) }
            ]
        })
    );
}

#[actix_rt::test]
async fn current_bookings_embed_spot_with_preview() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/spots/{}/images", spot_id))
        .cookie(owner.cookie.clone())
        .set_json(json!({ "url": "https://img.example/front.png", "preview": true }))
        .to_request();
    send(&app, req).await;
    book(&app, &guest, spot_id, &day(4), &day(6)).await;

    let req = test::TestRequest::get()
        .uri("/api/bookings/current")
        .cookie(guest.cookie.clone())
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    let booking = &body["Bookings"][0];
    assert_eq!(booking["spotId"], spot_id);
    assert_eq!(booking["startDate"], day(4));
    assert_eq!(booking["Spot"]["id"], spot_id);
    assert_eq!(booking["Spot"]["previewImage"], "https://img.example/front.png");
    assert!(booking["Spot"].get("description").is_none());
}

#[actix_rt::test]
async fn repository_reports_conflicts_on_overlap() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;

    let repo = BookingRepository::new(ctx.pool.clone());
    let start = today() + Duration::days(30);
    let end = start + Duration::days(4);

    let first = repo.create_booking(spot_id, guest.id, start, end).await.unwrap();
    assert!(matches!(first, BookingWrite::Saved(_)));

    let second = repo
        .create_booking(spot_id, guest.id, end, end + Duration::days(2))
        .await
        .unwrap();
    assert!(matches!(second, BookingWrite::Conflict));
}

#[actix_rt::test]
async fn overlap_trigger_rejects_direct_inserts() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let app = test::init_service(App::new().configure(|cfg| ctx.state.register(cfg))).await;

    let owner = signup(&app, "host-one").await;
    let guest = signup(&app, "guest-one").await;
    let spot_id = create_default_spot(&app, &owner).await;
    let start = today() + Duration::days(30);

    insert_booking(&ctx.pool, spot_id, guest.id, start, start + Duration::days(5))
        .await
        .unwrap();

    let err = insert_booking(
        &ctx.pool,
        spot_id,
        guest.id,
        start + Duration::days(2),
        start + Duration::days(3),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("booking_conflict"), "{}", err);

    // the next day after checkout is free
    insert_booking(
        &ctx.pool,
        spot_id,
        guest.id,
        start + Duration::days(6),
        start + Duration::days(8),
    )
    .await
    .unwrap();
}

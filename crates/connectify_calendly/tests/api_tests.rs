//! The Calendly router wired to the real client, with Calendly mocked.


use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use connectify_calendly::routes;
use fixtures::*;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_availability_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event_type_available_times"))
        .respond_with(ResponseTemplate::new(200).set_body_json(available_times_body(&[
            "2026-01-30T09:00:00Z",
            "2026-01-30T14:00:00Z",
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = routes(app_config(&server.uri())).unwrap();
    let response = app
        .oneshot(post_json(
            "/calendly/availability",
            json!({
                "eventName": "Test Event",
                "timezone": "Asia/Dhaka",
                "targetDate": "2026-01-30",
                "time": "09:00",
                "checkWithRange": { "from": "2025-09-28", "to": "2025-10-28" }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_specific_time_available"], true);
    assert_eq!(body["available_slots"].as_array().unwrap().len(), 2);
    assert_eq!(body["range_checked"]["to"], "2026-01-30T23:59:59.999Z");
}

#[tokio::test]
async fn test_fields_fetched_from_calendly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/event_types/DISCOVERY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discovery_event_type_body(&server.uri())))
        .mount(&server)
        .await;

    let app = routes(app_config(&server.uri())).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/calendly/fields?eventName=Discovery%20Call")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["event_details"]["scheduling_url"], "https://calendly.com/acme/discovery");
    assert_eq!(
        body["fields"],
        json!([
            { "name": "question_0", "label": "Company", "type": "text_single_line",
              "required": true, "options": [], "answer_key": "a1", "position": 0 },
            { "name": "question_1", "label": "Team size", "type": "radio",
              "required": false, "options": ["1", "2-10", "11-50"], "answer_key": "a2", "position": 1 }
        ])
    );
}

#[tokio::test]
async fn test_booking_confirmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invitees"))
        .and(body_partial_json(json!({
            "event_type": format!("{}/event_types/{}", server.uri(), EVENT_UUID),
            "start_time": "2026-01-30T14:00:00Z",
            "questions_and_answers": [
                { "question": "Please share anything that will help prepare for our meeting.",
                  "answer": "", "position": 0 },
                { "question": "Multiple lines\n*", "answer": "Detailed research notes.", "position": 1 }
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "resource": { "uri": "https://api.calendly.com/scheduled_events/EV/invitees/IN" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = routes(app_config(&server.uri())).unwrap();
    let response = app
        .oneshot(post_json(
            "/calendly/bookings",
            booking_body(
                "Test Event",
                json!([{ "name": "question_4", "value": "Detailed research notes." }]),
            ),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "booked");
    assert_eq!(body["uri"], "https://api.calendly.com/scheduled_events/EV/invitees/IN");
}

#[tokio::test]
async fn test_booking_degrades_to_link_on_403() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invitees"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "title": "Permission Denied",
            "message": "Upgrade your plan"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = routes(app_config(&server.uri())).unwrap();
    let response = app
        .oneshot(post_json(
            "/calendly/bookings",
            booking_body(
                "Test Event",
                json!([
                    { "answer_key": "a1", "value": "See you" },
                    { "question": "Multiple lines *", "value": "Notes" }
                ]),
            ),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "link_generated");
    assert_eq!(
        body["booking_link"],
        format!(
            "{}?name=John+Doe&email=john.doe%40example.com&date=2026-01-30&time=14%3A00&a1=See+you&a2=Notes",
            SCHEDULING_URL
        )
    );
    assert!(body["reason"].as_str().unwrap().contains("Upgrade your plan"));
}

#[tokio::test]
async fn test_missing_required_answer_never_reaches_calendly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invitees"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = routes(app_config(&server.uri())).unwrap();
    let response = app
        .oneshot(post_json("/calendly/bookings", booking_body("Test Event", json!([]))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["error"]["message"],
        "Validation error: Missing required fields: Multiple lines"
    );
}

#[tokio::test]
async fn test_calendly_server_error_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let app = routes(app_config(&server.uri())).unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/calendly/event-types")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

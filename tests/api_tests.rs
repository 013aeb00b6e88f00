// tests/api_tests.rs
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, HttpResponse, HttpServer};
use evalform::api::{configure_routes, AppState};
use evalform::config::AppConfig;
use evalform::evaluator::{Evaluator, HttpEvaluator};
use evalform::models::{FormInput, ResultView};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::time::Duration;

fn spawn_backend(status: u16, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new(move || {
        App::new().route(
            "/evaluate",
            web::post().to(move || async move {
                HttpResponse::build(StatusCode::from_u16(status).unwrap())
                    .content_type("application/json")
                    .body(body)
            }),
        )
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    actix_rt::spawn(server);
    format!("http://127.0.0.1:{}/evaluate", port)
}

fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/evaluate", port)
}

fn state_for(endpoint: String) -> AppState {
    AppState::new(AppConfig {
        endpoint,
        ..AppConfig::default()
    })
    .unwrap()
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

const FILLED_FORM: &str = "prompt=Compare+them&model1=first&model2=second&model3=third";

/// Polls the state endpoint until the in-flight request resolves.
macro_rules! wait_until_settled {
    ($app:expr) => {{
        let mut settled = None;
        for _ in 0..100 {
            let req = test::TestRequest::get().uri("/api/v1/state").to_request();
            let snapshot: Value = test::call_and_read_body_json($app, req).await;
            if snapshot["state"] != "loading" {
                settled = Some(snapshot);
                break;
            }
            actix_rt::time::sleep(Duration::from_millis(50)).await;
        }
        settled.expect("evaluation never settled")
    }};
}

#[actix_rt::test]
async fn health_reports_contract() {
    let state = state_for("http://localhost:8000/evaluate".to_string());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["endpoint"], "http://localhost:8000/evaluate");
    assert_eq!(body["result_view"], "structured");
}

#[actix_rt::test]
async fn form_page_renders_idle_state() {
    let state = state_for("http://localhost:8000/evaluate".to_string());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Model Evaluation Tool"));
    assert!(html.contains("Evaluate Models"));
}

#[actix_rt::test]
async fn stylesheet_is_embedded() {
    let state = state_for("http://localhost:8000/evaluate".to_string());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/static/style.css").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");

    let req = test::TestRequest::get().uri("/static/missing.js").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn field_updates_are_independent() {
    let state = state_for("http://localhost:8000/evaluate".to_string());
    let app = app!(state);

    for (name, value) in [("model2", "b"), ("prompt", "p"), ("model2", "b2")] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/fields/{}", name))
            .set_json(json!({ "value": value }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/v1/state").to_request();
    let snapshot: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        snapshot["input"],
        json!({"prompt": "p", "model1": "", "model2": "b2", "model3": ""})
    );
    assert_eq!(snapshot["state"], "idle");
}

#[actix_rt::test]
async fn unknown_field_is_not_found() {
    let state = state_for("http://localhost:8000/evaluate".to_string());
    let app = app!(state);

    let req = test::TestRequest::put()
        .uri("/api/v1/fields/model4")
        .set_json(json!({ "value": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn empty_fields_block_submission() {
    let state = state_for("http://localhost:8000/evaluate".to_string());
    let app = app!(state);

    let req = test::TestRequest::post().uri("/api/v1/submit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["missing"], json!(["prompt", "model1", "model2", "model3"]));

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("prompt=only+this&model1=&model2=&model3=")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Please fill in: Model 1, Model 2, Model 3"));
    assert!(html.contains("required>\nonly this</textarea>"));

    assert_eq!(state.controller.lock().await.state().tag(), "idle");
}

#[actix_rt::test]
async fn form_post_evaluates_and_renders_analysis() {
    let endpoint = spawn_backend(
        200,
        r#"{"analysis":"**hi**","metadata":{"prompt_length":5,"model1_length":1,"model2_length":1,"model3_length":1,"knowledge_used":true,"session_id":"abc"}}"#,
    );
    let state = state_for(endpoint);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(FILLED_FORM)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let snapshot = wait_until_settled!(&app);
    assert_eq!(snapshot["state"], "succeeded");
    assert_eq!(snapshot["result"]["metadata"]["session_id"], "abc");

    let req = test::TestRequest::get().uri("/").to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(html.contains("<strong>hi</strong>"));
    assert!(html.contains("Session ID: abc"));
    assert!(html.contains("Knowledge Used: Yes"));
    assert!(html.contains("required>\nfirst</textarea>"));
}

#[actix_rt::test]
async fn backend_error_shows_status_and_keeps_values() {
    let endpoint = spawn_backend(500, r#"{"detail":"ignored"}"#);
    let state = state_for(endpoint);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(FILLED_FORM)
        .to_request();
    test::call_service(&app, req).await;

    let snapshot = wait_until_settled!(&app);
    assert_eq!(snapshot["state"], "failed");
    assert_eq!(snapshot["error"], "HTTP error! status: 500");
    assert_eq!(snapshot["input"]["model3"], "third");

    let req = test::TestRequest::get().uri("/").to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(html.contains("HTTP error! status: 500"));
    assert!(!html.contains("ignored"));
}

#[actix_rt::test]
async fn second_submit_while_loading_conflicts() {
    // Bound but never accepted, so the evaluation stays pending.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/evaluate", listener.local_addr().unwrap());
    let state = state_for(endpoint);
    let app = app!(state);

    for (name, value) in [("prompt", "p"), ("model1", "a"), ("model2", "b"), ("model3", "c")] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/fields/{}", name))
            .set_json(json!({ "value": value }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::post().uri("/api/v1/submit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let req = test::TestRequest::post().uri("/api/v1/submit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/").to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(html.contains("Evaluating..."));
    assert!(html.contains("disabled"));

    drop(listener);
}

#[actix_rt::test]
async fn connection_refused_fails_and_reenables_submit() {
    let endpoint = refused_endpoint();
    let expected = HttpEvaluator::new(reqwest::Client::new(), endpoint.clone(), ResultView::Structured)
        .evaluate(&FormInput {
            prompt: "p".to_string(),
            model1: "a".to_string(),
            model2: "b".to_string(),
            model3: "c".to_string(),
        })
        .await
        .unwrap_err()
        .to_string();

    let state = state_for(endpoint);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(FILLED_FORM)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let snapshot = wait_until_settled!(&app);
    assert_eq!(snapshot["state"], "failed");
    assert_eq!(snapshot["error"], expected.as_str());
    assert_eq!(snapshot["submission"], Value::Null);
    assert_eq!(snapshot["input"]["prompt"], "Compare them");

    let req = test::TestRequest::get().uri("/").to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(html.contains("Evaluate Models"));
    assert!(!html.contains("disabled"));
    assert!(!html.contains("http-equiv=\"refresh\""));
    assert!(html.contains("class=\"error\""));
}

use actix_web::{App, http::StatusCode, http::header, test, web};
use chrono::Datelike;
use serde_json::{Value, json};
use std::sync::Arc;
use survey_collector::api::configure;
use survey_collector::services::SurveyService;
use survey_collector::store::MemoryStore;

fn service() -> SurveyService {
    SurveyService::new(Arc::new(MemoryStore::new()))
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_create_then_fetch_survey() {
    let app = app!(service());

    let req = test::TestRequest::post()
        .uri("/api/surveys")
        .set_json(json!({ "name": "Asha", "preferredParty": "AAP" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Asha");
    assert!(created["submittedAt"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!("/api/surveys/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn test_client_id_and_timestamps_are_replaced() {
    let app = app!(service());

    for body in [
        json!({ "name": "Ravi", "submittedAt": "yesterday" }),
        json!({ "name": "Ravi", "createdAt": "2024-01-05" }),
        json!({ "name": "Ravi", "id": 7 }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/surveys")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["name"], "Ravi");
        assert!(created["id"].is_string());

        let submitted_at = created["submittedAt"].as_str().unwrap();
        let submitted_at = chrono::DateTime::parse_from_rfc3339(submitted_at).unwrap();
        assert!(submitted_at.year() >= 2025);
    }
}

#[actix_web::test]
async fn test_unknown_survey_is_not_found() {
    let app = app!(service());

    let req = test::TestRequest::get()
        .uri("/api/surveys/does-not-exist")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Survey not found" }));
}

#[actix_web::test]
async fn test_malformed_submission_is_bad_request() {
    let app = app!(service());

    let req = test::TestRequest::post()
        .uri("/api/surveys")
        .set_json(json!({ "contact": 12345 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("invalid survey submission"));
}

#[actix_web::test]
async fn test_list_is_newest_first() {
    let app = app!(service());

    for name in ["first", "second"] {
        let req = test::TestRequest::post()
            .uri("/api/surveys")
            .set_json(json!({ "name": name }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/surveys").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["second", "first"]);
}

#[actix_web::test]
async fn test_analysis_on_empty_store() {
    let app = app!(service());

    let req = test::TestRequest::get().uri("/api/analysis").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalResponses"], 0);
    assert_eq!(body["demographics"]["totalWithName"]["percentage"], "0");
    assert_eq!(body["partyPreference"], json!({}));
}

#[actix_web::test]
async fn test_analysis_counts_other_override() {
    let app = app!(service());

    for body in [
        json!({ "preferredParty": "Other / अन्य" }),
        json!({ "preferredParty": "Other / अन्य", "customInputs": { "preferredParty": "Local Front" } }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/surveys")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/analysis").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["partyPreference"]["Other (Unspecified)"]["count"], 1);
    assert_eq!(body["partyPreference"]["Local Front"]["percentage"], "50.00");
}

#[actix_web::test]
async fn test_export_csv_headers_and_body() {
    let app = app!(service());

    let req = test::TestRequest::post()
        .uri("/api/surveys")
        .set_json(json!({ "name": "Asha", "bjpCandidate": "Other / अन्य" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/export-csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/csv");
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=survey_data.csv"
    );

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with('\u{FEFF}'));

    let row = text.lines().nth(1).unwrap();
    assert!(row.starts_with("\"Asha\",\"\",\"\",\"\",\"\",\"Other\","));
}

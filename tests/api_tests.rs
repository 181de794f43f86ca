use actix_web::{test, web, App};
use serde_json::{json, Value};

use marchen::schedule::utc;
use marchen::web::{configure, AppState, MAX_CANDIDATE_DAYS};

fn state_in(dir: &tempfile::TempDir) -> web::Data<AppState> {
    web::Data::new(AppState::new(Vec::new(), dir.path().join("availability.csv"), utc()))
}

#[actix_web::test]
async fn staffing_endpoint_returns_roles_and_total() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/staffing")
        .set_json(json!({"max_vendors": 5, "area_sq_m": 2500.0}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 6);
    assert_eq!(recs[5]["role"], "parking");
    assert_eq!(recs[5]["headcount"], 2);
    // 500 visitors: 3 guides and a single first aider
    assert_eq!(body["total_headcount"], 14);
}

#[actix_web::test]
async fn posted_vendors_are_ranked() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/optimal-dates")
        .set_json(json!({
            "vendors": [
                {"vendor_name": "Bakery A", "priority": "MUST_HAVE", "available_dates": ["2026-04-01"]},
                {"vendor_name": "Bakery B", "priority": "NICE_TO_HAVE", "available_dates": ["2026-04-01", "2026-04-02"]}
            ],
            "start": "2026-04-01",
            "end": "2026-04-02"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["days_evaluated"], 2);
    assert_eq!(body["dates"][0]["date"], "2026-04-01");
    assert_eq!(body["dates"][0]["score"], 13);
    assert_eq!(body["dates"][0]["all_must_have_available"], true);
    assert_eq!(body["dates"][1]["date"], "2026-04-02");
    assert_eq!(body["dates"][1]["score"], 3);
}

#[actix_web::test]
async fn submissions_feed_stored_ranking_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    // Nothing submitted yet: every day is still ranked, all at zero
    let req = test::TestRequest::get()
        .uri("/api/optimal-dates?start=2026-04-01&end=2026-04-03")
        .to_request();
    let empty: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty["days_evaluated"], 3);
    let days = empty["dates"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2026-04-01");
    assert!(days.iter().all(|d| d["score"] == 0 && d["all_must_have_available"] == true));

    for (name, priority, dates) in [
        ("Le Fournil", "must have", vec!["2026-04-02"]),
        ("Miche", "backup", vec!["2026-04-01", "2026-04-02"]),
        ("le fournil", "MUST_HAVE", vec!["2026-04-03"]),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/availability")
            .set_json(json!({"vendor_name": name, "priority": priority, "available_dates": dates}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get().uri("/api/availability").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/optimal-dates?start=2026-04-01&end=2026-04-03&limit=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["days_evaluated"], 3);
    assert_eq!(body["dates"].as_array().unwrap().len(), 1);
    assert_eq!(body["dates"][0]["date"], "2026-04-03");

    let req = test::TestRequest::get().uri("/api/stats").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["tier_counts"]["MUST_HAVE"], 1);
    assert_eq!(stats["tier_counts"]["BACKUP"], 1);
    assert_eq!(stats["tier_counts"]["NICE_TO_HAVE"], 0);
    assert_eq!(stats["date_popularity"]["2026-04-02"]["backup"], 1);

    // Every accepted submission is on disk
    let csv = std::fs::read_to_string(dir.path().join("availability.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
}

#[actix_web::test]
async fn invalid_submission_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/availability")
        .set_json(json!({"vendor_name": "Miche", "priority": "sometimes", "available_dates": ["2026-04-01"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("sometimes"));
    assert!(!dir.path().join("availability.csv").exists());
}

#[actix_web::test]
async fn plan_and_weather_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/plan")
        .set_json(json!({
            "event": {"id": "evt-9", "title": "Autumn Market", "status": "OPEN"},
            "counts": {"vendor_targets": 4, "meeting_slots": 2, "accepted_applications": 1}
        }))
        .to_request();
    let plan: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(plan["total_tasks"], 18);
    // publish + public page + the whole shops section
    assert_eq!(plan["completed_tasks"], 5);
    assert_eq!(plan["sections"][1]["completed"], true);

    let req = test::TestRequest::post()
        .uri("/api/weather")
        .set_json(json!({
            "date": "2026-04-01",
            "forecast": {"list": [
                {"dt_txt": "2026-04-01 12:00:00", "pop": 0.45, "main": {"temp": 15.0}, "weather": [{"description": "showers"}]}
            ]}
        }))
        .to_request();
    let forecast: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(forecast["risk_level"], "MEDIUM");
    assert_eq!(forecast["precipitation_probability"], 45);
}

#[actix_web::test]
async fn oversized_ranges_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/optimal-dates?start=0001-01-01&end=9999-12-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri("/api/optimal-dates")
        .set_json(json!({"vendors": [], "start": "0001-01-01", "end": "9999-12-31"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    // Exactly at the cap is still ranked
    let req = test::TestRequest::post()
        .uri("/api/optimal-dates")
        .set_json(json!({"vendors": [], "start": "2026-01-01", "end": "2036-01-08", "limit": 1}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["days_evaluated"], MAX_CANDIDATE_DAYS);
}

#[actix_web::test]
async fn report_endpoints_render_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(App::new().app_data(state_in(&dir)).configure(configure)).await;
    let event = json!({"title": "Autumn Market", "event_date": "2026-10-04", "organizer": "Harbour Bakers"});

    let req = test::TestRequest::post()
        .uri("/api/reports/accounting")
        .set_json(json!({
            "event": event,
            "budgets": [{"category": "Venue", "planned_yen": 20000, "actual_yen": 18000}],
            "equipment": [{"item_name": "Tent", "quantity": 2, "cost_yen": 3000}],
            "sales": [{"vendor_name": "Miche", "amount_yen": 25000, "payment_method": "card"}],
            "report_date": "2026-10-10"
        }))
        .to_request();
    let accounting: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accounting["totals"]["total_spend"], 21000);
    assert_eq!(accounting["totals"]["balance"], 4000);
    let md = accounting["markdown"].as_str().unwrap();
    assert!(md.contains("| Miche | ¥25,000 | card |"));
    assert!(md.contains("- **Report date**: 2026-10-10"));

    let req = test::TestRequest::post()
        .uri("/api/reports/activity")
        .set_json(json!({
            "event": event,
            "vendors": [{"shop_name": "Miche"}],
            "confirmed_volunteers": 2,
            "feedback": [{"content": "Great rye", "rating": 4}, {"content": "Busy", "rating": 3}]
        }))
        .to_request();
    let activity: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(activity["vendor_count"], 1);
    assert_eq!(activity["average_rating"], 3.5);
    assert!(activity["markdown"].as_str().unwrap().contains("- **Average rating**: 3.5 / 5.0"));
}

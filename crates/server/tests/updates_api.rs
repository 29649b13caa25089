//! Equipment and rental listing plus the explicit update operations.

mod common;

use axum::http::StatusCode;

use common::{app, get, patch, repo};

#[tokio::test]
async fn patch_equipment_applies_allowed_fields() {
    let store = repo();
    let app = app(store.clone(), None);

    let (status, body) = patch(&app, "/equipment/EQ-2", r#"{"status":"Available","site_id":"S-9"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Available");
    assert_eq!(body["site_id"], "S-9");
    assert_eq!(body["equipment_type"], "Excavator");

    let (_, fetched) = get(&app, "/equipment/EQ-2").await;
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn patch_with_unknown_key_is_rejected_untouched() {
    let store = repo();
    let before = store.snapshot().await.equipment;
    let app = app(store.clone(), None);

    let (status, body) = patch(&app, "/equipment/EQ-1", r#"{"status":"Retired","daily_rate":1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("daily_rate"));
    assert_eq!(store.snapshot().await.equipment, before);
}

#[tokio::test]
async fn patch_rental_with_unknown_key_is_rejected_untouched() {
    let store = repo();
    let before = store.snapshot().await.rentals;
    let app = app(store.clone(), None);

    let (status, body) =
        patch(&app, "/rentals/R-1", r#"{"status":"Completed","rental_rate_per_day":1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rental_rate_per_day"));
    assert_eq!(store.snapshot().await.rentals, before);
}

#[tokio::test]
async fn patch_rejects_bad_bodies() {
    let app = app(repo(), None);

    for body in ["{}", r#"{"status":"Lost"}"#, "{not json", r#"{"status":7}"#] {
        let (status, response) = patch(&app, "/equipment/EQ-1", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert!(response["error"].is_string(), "{}", body);
    }
}

#[tokio::test]
async fn unknown_equipment_is_not_found() {
    let app = app(repo(), None);

    let (status, body) = get(&app, "/equipment/EQ-404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "equipment not found: EQ-404");

    let (status, _) = patch(&app, "/equipment/EQ-404", r#"{"model":"D6"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn equipment_list_filters_and_ignores_malformed_paging() {
    let app = app(repo(), None);

    let (status, body) = get(&app, "/equipment?status=Rented").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["equipment_id"], "EQ-1");

    let (status, body) = get(&app, "/equipment?limit=lots").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_paging_keeps_the_status_filter() {
    let app = app(repo(), None);

    let (status, body) = get(&app, "/equipment?status=Rented&limit=lots").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["equipment_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["EQ-1"]);

    let (status, body) = get(&app, "/rentals?status=Completed&offset=soon").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["status"], "Completed");
}

#[tokio::test]
async fn rental_list_is_newest_first_and_filterable() {
    let app = app(repo(), None);

    let (_, all) = get(&app, "/rentals").await;
    let ids: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rental_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["R-1", "R-0"]);

    let (_, completed) = get(&app, "/rentals?status=Completed").await;
    assert_eq!(completed.as_array().unwrap().len(), 1);
    assert_eq!(completed[0]["overdue_days"], 2);
}

#[tokio::test]
async fn patch_rental_closes_it() {
    let store = repo();
    let app = app(store.clone(), None);

    let (status, body) = patch(
        &app,
        "/rentals/R-1",
        r#"{"status":"Completed","rental_end_date_actual":"2024-06-13","overdue_days":2}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");
    assert_eq!(body["rental_end_date_actual"], "2024-06-13");
    assert_eq!(body["overdue_days"], 2);

    let stored = store.snapshot().await.rentals;
    assert!(stored.iter().any(|r| r.rental_id == "R-1" && r.status == "Completed"));
}

#[tokio::test]
async fn patch_rental_validates_fields() {
    let app = app(repo(), None);

    let (status, _) = patch(&app, "/rentals/R-1", r#"{"overdue_days":-1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = patch(&app, "/rentals/R-1", r#"{"rental_end_date_planned":"next week"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = patch(&app, "/rentals/R-9", r#"{"status":"Cancelled"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updates_surface_storage_failure() {
    let store = repo();
    store.set_failing(true);
    let app = app(store, None);

    let (status, body) = patch(&app, "/rentals/R-1", r#"{"status":"Cancelled"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database error");

    let (status, _) = get(&app, "/equipment").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

//! HTTP-level integration tests for the `/tours` API endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.
//! Rows are seeded via the repository layer where the HTTP round-trip is
//! not itself under test.

mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use caravel_core::localization::TourLocalization;
use caravel_db::models::tour::CreateTour;
use caravel_db::repositories::TourRepo;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Minimal bytes carrying the PNG magic number; enough for format sniffing.
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png_data_uri() -> String {
    format!("data:image/png;base64,{}", BASE64.encode(PNG_MAGIC))
}

fn loc(locale: &str, name: &str) -> TourLocalization {
    TourLocalization {
        locale: locale.to_string(),
        name: name.to_string(),
        destination: format!("{name} destination"),
        description: format!("{name} description"),
    }
}

/// Seed input with already-persisted blob URLs (no HTTP, no image writes).
fn seed_tour(prefix: &str, total_price: f64) -> CreateTour {
    CreateTour {
        localizations: vec![loc("en", &format!("{prefix} en")), loc("ka", &format!("{prefix} ka"))],
        duration: 2.0,
        total_price,
        reservation_price: total_price / 10.0,
        image: Some("/uploads/tours/seed-main.png".to_string()),
        gallery: vec![],
        is_public: false,
    }
}

/// Full create request body with inline image payloads.
fn create_body(prefix: &str) -> serde_json::Value {
    serde_json::json!({
        "localizations": [
            {
                "locale": "en",
                "name": format!("{prefix} en"),
                "destination": "Kazbegi",
                "description": "Day trip to the mountains"
            },
            {
                "locale": "ka",
                "name": format!("{prefix} ka"),
                "destination": "ყაზბეგი",
                "description": "ერთდღიანი ტური"
            },
        ],
        "duration": 2.5,
        "total_price": 250.0,
        "reservation_price": 50.0,
        "image": png_data_uri(),
        "gallery": [png_data_uri(), png_data_uri()],
    })
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Creating a tour persists the images and returns the row with the
/// localization list intact, in input order.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_tour_success(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(&app, "/api/v1/tours", create_body("Alpine Lakes")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let tour = &json["data"];

    let localizations = tour["localizations"].as_array().unwrap();
    assert_eq!(localizations.len(), 2);
    assert_eq!(localizations[0]["locale"], "en");
    assert_eq!(localizations[1]["locale"], "ka");

    let image = tour["image"].as_str().unwrap();
    assert!(image.starts_with("/uploads/tours/"), "image url: {image}");
    assert!(image.ends_with(".png"));

    let gallery = tour["gallery"].as_array().unwrap();
    assert_eq!(gallery.len(), 2);

    assert_eq!(tour["public"], false);
    assert!(tour["id"].as_str().is_some());
}

/// A second tour reusing any locale's name is rejected with 409; distinct
/// names always succeed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_tour_duplicate_name_conflict(pool: PgPool) {
    let app = build_test_app(pool);

    let first = post_json(&app, "/api/v1/tours", create_body("Svaneti Trek")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same "Svaneti Trek en" name resurfaces in the second payload.
    let second = post_json(&app, "/api/v1/tours", create_body("Svaneti Trek")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["code"], "CONFLICT");

    let distinct = post_json(&app, "/api/v1/tours", create_body("Vardzia Caves")).await;
    assert_eq!(distinct.status(), StatusCode::CREATED);
}

/// An empty localization list fails validation with field-level detail.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_tour_requires_localizations(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = create_body("No Locales");
    body["localizations"] = serde_json::json!([]);

    let response = post_json(&app, "/api/v1/tours", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"]["localizations"].is_array());
}

/// A payload without the data-URI image marker is a 400, and nothing is
/// inserted.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_tour_rejects_bad_image_payload(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let mut body = create_body("Bad Image");
    body["image"] = serde_json::json!("definitely not an image");

    let response = post_json(&app, "/api/v1/tours", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let page = TourRepo::list(&pool, None, "created_at", "desc", 10, 0)
        .await
        .unwrap();
    assert_eq!(page.total, 0, "no row should exist after a failed create");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// 25 rows at limit 10: three pages, the last one holding 5; the page after
/// that is empty but still a 200.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_pagination(pool: PgPool) {
    for i in 0..25 {
        TourRepo::create(&pool, &seed_tour(&format!("Tour {i}"), 100.0 + i as f64))
            .await
            .unwrap()
            .expect("seed names are unique");
    }
    let app = build_test_app(pool);

    let response = get(&app, "/api/v1/tours?page=1&limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["tours"].as_array().unwrap().len(), 10);
    assert_eq!(json["data"]["pagination"]["total"], 25);
    assert_eq!(json["data"]["pagination"]["totalPages"], 3);
    assert_eq!(json["data"]["pagination"]["page"], 1);
    assert_eq!(json["data"]["pagination"]["limit"], 10);

    let response = get(&app, "/api/v1/tours?page=3&limit=10").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["tours"].as_array().unwrap().len(), 5);

    let response = get(&app, "/api/v1/tours?page=4&limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["tours"].as_array().unwrap().is_empty());
}

/// Out-of-range pagination parameters are a 400, not a clamped query.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_rejects_bad_pagination(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/api/v1/tours?page=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/v1/tours?limit=500").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A locale filter never returns a tour lacking that locale, and trims each
/// match to exactly one localization entry.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_locale_filter(pool: PgPool) {
    TourRepo::create(&pool, &seed_tour("Bilingual", 100.0))
        .await
        .unwrap()
        .unwrap();
    TourRepo::create(
        &pool,
        &CreateTour {
            localizations: vec![loc("ru", "Только русский")],
            ..seed_tour("Russian Only", 150.0)
        },
    )
    .await
    .unwrap()
    .unwrap();

    let app = build_test_app(pool);
    let response = get(&app, "/api/v1/tours?locale=en").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let tours = json["data"]["tours"].as_array().unwrap();
    assert_eq!(tours.len(), 1, "only the tour carrying 'en' is returned");

    let localizations = tours[0]["localizations"].as_array().unwrap();
    assert_eq!(localizations.len(), 1);
    assert_eq!(localizations[0]["locale"], "en");
}

/// Sort keys map onto their columns; ascending price really ascends.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_sort_by_price(pool: PgPool) {
    for (prefix, price) in [("Mid", 200.0), ("Cheap", 100.0), ("Dear", 300.0)] {
        TourRepo::create(&pool, &seed_tour(prefix, price))
            .await
            .unwrap()
            .unwrap();
    }
    let app = build_test_app(pool);

    let response = get(&app, "/api/v1/tours?sortBy=total_price&sortOrder=asc").await;
    let json = body_json(response).await;
    let prices: Vec<f64> = json["data"]["tours"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["total_price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![100.0, 200.0, 300.0]);
}

/// An unknown sort key never reaches the SQL layer.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_rejects_unknown_sort_key(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/api/v1/tours?sortBy=id;%20DROP%20TABLE%20tours").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Get by id
// ---------------------------------------------------------------------------

/// The detail response includes the gallery and a locale-keyed translations
/// lookup.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_tour_by_id(pool: PgPool) {
    let tour = TourRepo::create(&pool, &seed_tour("Detail", 120.0))
        .await
        .unwrap()
        .unwrap();
    let app = build_test_app(pool);

    let response = get(&app, &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["id"], tour.id.to_string());
    assert_eq!(data["localizations"].as_array().unwrap().len(), 2);
    assert!(data["gallery"].is_array());
    assert_eq!(data["translations"]["en"]["name"], "Detail en");
    assert_eq!(data["translations"]["ka"]["name"], "Detail ka");
}

/// A locale with no match resolves to an empty list, not an error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_tour_by_id_missing_locale_is_empty(pool: PgPool) {
    let tour = TourRepo::create(&pool, &seed_tour("Lonely", 80.0))
        .await
        .unwrap()
        .unwrap();
    let app = build_test_app(pool);

    let response = get(&app, &format!("/api/v1/tours/{}?locale=fr", tour.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["localizations"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["translations"], serde_json::json!({}));
}

/// Unknown ids are 404; malformed ids are 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_tour_by_id_errors(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(
        &app,
        &format!("/api/v1/tours/{}", uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/v1/tours/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Fields absent from the payload stay untouched; image/gallery are only
/// rewritten when their fields are present.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_partial_leaves_other_fields(pool: PgPool) {
    let tour = TourRepo::create(
        &pool,
        &CreateTour {
            gallery: vec!["/uploads/tours/keep.png".to_string()],
            ..seed_tour("Partial", 100.0)
        },
    )
    .await
    .unwrap()
    .unwrap();
    let app = build_test_app(pool);

    let response = put_json(
        &app,
        &format!("/api/v1/tours/{}", tour.id),
        serde_json::json!({ "total_price": 999.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["total_price"], 999.0);
    assert_eq!(data["duration"], 2.0);
    assert_eq!(data["localizations"].as_array().unwrap().len(), 2);
    assert_eq!(data["image"], "/uploads/tours/seed-main.png");
    assert_eq!(
        data["gallery"],
        serde_json::json!(["/uploads/tours/keep.png"])
    );
}

/// Explicit nulls for image/gallery/deleteImages also leave storage alone.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_null_image_fields_untouched(pool: PgPool) {
    let tour = TourRepo::create(
        &pool,
        &CreateTour {
            gallery: vec!["/uploads/tours/keep.png".to_string()],
            ..seed_tour("Nulls", 100.0)
        },
    )
    .await
    .unwrap()
    .unwrap();
    let app = build_test_app(pool);

    let response = put_json(
        &app,
        &format!("/api/v1/tours/{}", tour.id),
        serde_json::json!({ "image": null, "gallery": null, "deleteImages": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["image"], "/uploads/tours/seed-main.png");
    assert_eq!(
        json["data"]["gallery"],
        serde_json::json!(["/uploads/tours/keep.png"])
    );
}

/// `deleteImages` removes exactly the listed URLs and nothing else.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_delete_images(pool: PgPool) {
    let tour = TourRepo::create(
        &pool,
        &CreateTour {
            gallery: vec![
                "/uploads/tours/a.png".to_string(),
                "/uploads/tours/b.png".to_string(),
            ],
            ..seed_tour("Gallery", 100.0)
        },
    )
    .await
    .unwrap()
    .unwrap();
    let app = build_test_app(pool);

    let response = put_json(
        &app,
        &format!("/api/v1/tours/{}", tour.id),
        serde_json::json!({ "deleteImages": ["/uploads/tours/a.png"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"]["gallery"],
        serde_json::json!(["/uploads/tours/b.png"])
    );
}

/// New gallery payloads append after deletions; a new main image replaces
/// the old URL.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_replaces_image_and_appends_gallery(pool: PgPool) {
    let tour = TourRepo::create(
        &pool,
        &CreateTour {
            gallery: vec![
                "/uploads/tours/old-1.png".to_string(),
                "/uploads/tours/old-2.png".to_string(),
            ],
            ..seed_tour("Swap", 100.0)
        },
    )
    .await
    .unwrap()
    .unwrap();
    let app = build_test_app(pool);

    let response = put_json(
        &app,
        &format!("/api/v1/tours/{}", tour.id),
        serde_json::json!({
            "image": png_data_uri(),
            "gallery": [png_data_uri()],
            "deleteImages": ["/uploads/tours/old-1.png"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];

    let image = data["image"].as_str().unwrap();
    assert_ne!(image, "/uploads/tours/seed-main.png");
    assert!(image.starts_with("/uploads/tours/"));

    let gallery = data["gallery"].as_array().unwrap();
    assert_eq!(gallery.len(), 2, "one deleted, one appended");
    assert_eq!(gallery[0], "/uploads/tours/old-2.png");
    assert!(gallery[1].as_str().unwrap().ends_with(".png"));
}

/// Updating an unknown id is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_tour_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let response = put_json(
        &app,
        &format!("/api/v1/tours/{}", uuid::Uuid::new_v4()),
        serde_json::json!({ "total_price": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Delete returns the removed id; the row is gone afterwards.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_tour(pool: PgPool) {
    let tour = TourRepo::create(&pool, &seed_tour("Doomed", 100.0))
        .await
        .unwrap()
        .unwrap();
    let app = build_test_app(pool);

    let response = delete(&app, &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], tour.id.to_string());

    let response = delete(&app, &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, &format!("/api/v1/tours/{}", tour.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! Integration tests for diet registration and editing

mod common;

use axum::http::StatusCode;
use common::TestApp;
use diet_tracker_shared::models::UserType;
use serde_json::{json, Value};
use uuid::Uuid;

const DIETS_OF: &str = "SELECT COUNT(*) FROM diets WHERE customer_id = $1";
const DETAILS_OF: &str = "SELECT COUNT(*) FROM diet_food_details d \
                          JOIN diets ON diets.id = d.diet_id WHERE diets.customer_id = $1";

fn detail(food_id: i64, grams: f64) -> Value {
    json!({
        "foodId": food_id,
        "desiredGrams": grams,
        "proteins": 10.0,
        "carbohydrates": 50.0,
        "fats": 5.0,
        "calories": 300.0
    })
}

fn diet_body(description: &str, details: Vec<Value>) -> Value {
    json!({
        "diet": { "description": description },
        "dietDetails": details
    })
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_unauthenticated_registration_is_rejected_without_writes() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let (status, body) = app
        .post(
            "/api/Diets/fullDietRegistration",
            None,
            &diet_body("Cutting", vec![detail(food, 100.0)]),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(app.count(DIETS_OF, customer.id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_registration_creates_diet_and_details() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let (status, body) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Cutting", vec![detail(food, 120.0)]),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    let diet_id = body["dietId"].as_i64().unwrap();
    assert!(diet_id > 0);
    assert_eq!(app.count(DIETS_OF, customer.id).await, 1);
    assert_eq!(app.count(DETAILS_OF, customer.id).await, 1);

    let (status, diet) = app
        .get(&format!("/api/Diets/{}", diet_id), Some(&customer.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(diet["customerId"], customer.id.to_string());
    assert_eq!(diet["dietDetails"][0]["desiredGrams"], 120.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_owner_in_body_is_ignored() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Premium).await;
    let someone_else = Uuid::new_v4();

    let body = json!({
        "diet": { "description": "Bulk", "customerId": someone_else },
        "dietDetails": [detail(food, 200.0)]
    });
    let (status, _) = app
        .post("/api/Diets/fullDietRegistration", Some(&customer.token), &body)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.count(DIETS_OF, customer.id).await, 1);
    assert_eq!(app.count(DIETS_OF, someone_else).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_failing_child_rolls_back_the_parent() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    // second line references a food that does not exist
    let (status, body) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Cutting", vec![detail(food, 100.0), detail(i64::MAX, 50.0)]),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    assert_eq!(app.count(DIETS_OF, customer.id).await, 0);
    assert_eq!(app.count(DETAILS_OF, customer.id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_child_is_rejected_before_any_write() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let (status, body) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Cutting", vec![detail(food, -5.0)]),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(app.count(DIETS_OF, customer.id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_administrators_cannot_register_diets() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;

    let (status, _) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&admin.token),
            &diet_body("Admin diet", vec![detail(food, 100.0)]),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_edit_replaces_details() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let (_, created) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Cutting", vec![detail(food, 100.0), detail(food, 50.0)]),
        )
        .await;
    let diet_id = created["dietId"].as_i64().unwrap();

    let edit = json!({
        "diet": { "id": diet_id, "description": "Maintenance" },
        "dietDetails": [detail(food, 300.0)]
    });
    let (status, body) = app
        .put("/api/Diets/editDiet", Some(&customer.token), &edit)
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["dietId"], diet_id);
    assert_eq!(app.count(DIETS_OF, customer.id).await, 1);
    assert_eq!(app.count(DETAILS_OF, customer.id).await, 1);

    let (_, diet) = app
        .get(&format!("/api/Diets/{}", diet_id), Some(&customer.token))
        .await;
    assert_eq!(diet["description"], "Maintenance");
    assert_eq!(diet["dietDetails"][0]["desiredGrams"], 300.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_edit_of_foreign_diet_is_forbidden() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let owner = app.customer(UserType::Regular).await;
    let intruder = app.customer(UserType::Regular).await;

    let (_, created) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&owner.token),
            &diet_body("Cutting", vec![detail(food, 100.0)]),
        )
        .await;
    let diet_id = created["dietId"].as_i64().unwrap();

    let edit = json!({
        "diet": { "id": diet_id, "description": "Mine now" },
        "dietDetails": []
    });
    let (status, _) = app
        .put("/api/Diets/editDiet", Some(&intruder.token), &edit)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.count(DETAILS_OF, owner.id).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_edit_without_id_is_a_validation_error() {
    let app = TestApp::new().await;
    let customer = app.customer(UserType::Regular).await;

    let (status, _) = app
        .put(
            "/api/Diets/editDiet",
            Some(&customer.token),
            &diet_body("No id", vec![]),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_edit_of_missing_diet_is_not_found() {
    let app = TestApp::new().await;
    let customer = app.customer(UserType::Regular).await;

    let edit = json!({
        "diet": { "id": i64::MAX, "description": "Ghost" },
        "dietDetails": []
    });
    let (status, _) = app
        .put("/api/Diets/editDiet", Some(&customer.token), &edit)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_malformed_child_record_is_rejected_without_writes() {
    let app = TestApp::new().await;
    let customer = app.customer(UserType::Regular).await;

    let body = json!({
        "diet": { "description": "Cutting" },
        "dietDetails": [{ "invalid": "record" }]
    });
    let (status, _) = app
        .post("/api/Diets/fullDietRegistration", Some(&customer.token), &body)
        .await;

    assert!(status.is_client_error(), "unexpected status {}", status);
    assert_eq!(app.count(DIETS_OF, customer.id).await, 0);
    assert_eq!(app.count(DETAILS_OF, customer.id).await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_repeated_edit_leaves_the_same_children() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let (_, created) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Cutting", vec![detail(food, 100.0)]),
        )
        .await;
    let diet_id = created["dietId"].as_i64().unwrap();

    let edit = json!({
        "diet": { "id": diet_id, "description": "Cutting v2" },
        "dietDetails": [detail(food, 80.0), detail(food, 40.0)]
    });
    for _ in 0..2 {
        let (status, _) = app
            .put("/api/Diets/editDiet", Some(&customer.token), &edit)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.count(DETAILS_OF, customer.id).await, 2);
    }
    assert_eq!(app.count(DIETS_OF, customer.id).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_registration_with_more_lines_than_one_statement_binds() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let details = (0..10_000).map(|_| detail(food, 25.0)).collect();
    let (status, body) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Batch", details),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(app.count(DIETS_OF, customer.id).await, 1);
    assert_eq!(app.count(DETAILS_OF, customer.id).await, 10_000);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_amount_too_large_for_the_column_is_a_validation_error() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let food = app.food(&admin).await;
    let customer = app.customer(UserType::Regular).await;

    let (status, body) = app
        .post(
            "/api/Diets/fullDietRegistration",
            Some(&customer.token),
            &diet_body("Huge", vec![detail(food, 1e9)]),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(app.count(DIETS_OF, customer.id).await, 0);
}

//! HTTP-level tests over the in-memory ports

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};

use core_kernel::Actor;
use domain_claims::MockClaimsPort;
use domain_warranty::MockWarrantyPort;
use interface_api::{auth, config::ApiConfig, create_router, AppState};
use test_utils::ActorFixtures;

const SECRET: &str = "api-test-secret";

struct TestApp {
    server: TestServer,
    business: Actor,
    customer: Actor,
}

impl TestApp {
    fn new() -> Self {
        let config = ApiConfig {
            jwt_secret: SECRET.to_string(),
            ..ApiConfig::default()
        };
        let state = AppState::new(
            Arc::new(MockWarrantyPort::new()),
            Arc::new(MockClaimsPort::new()),
            config,
        );
        Self {
            server: TestServer::new(create_router(state)).unwrap(),
            business: ActorFixtures::business(),
            customer: ActorFixtures::customer(),
        }
    }

    fn bearer(actor: &Actor) -> HeaderValue {
        let token = auth::create_token(actor, SECRET, 3600).unwrap();
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    /// Adds a laptop with the given term to the business catalog
    async fn create_product(&self, prefix: &str, warranty_months: u32) -> Value {
        let response = self
            .server
            .post("/api/v1/products")
            .add_header(header::AUTHORIZATION, Self::bearer(&self.business))
            .json(&json!({
                "name": "UltraBook Pro",
                "description": "14 inch laptop with aluminium chassis",
                "category": "electronics",
                "warranty_months": warranty_months,
                "serial_format": format!("{}-####-####", prefix),
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()
    }

    async fn register(&self, serial: &str, purchase_date: NaiveDate) -> axum_test::TestResponse {
        self.server
            .post("/api/v1/registrations")
            .add_header(header::AUTHORIZATION, Self::bearer(&self.customer))
            .json(&json!({
                "serial_number": serial,
                "purchase_date": purchase_date,
                "retailer": "Best Electronics",
            }))
            .await
    }

    async fn file_claim(&self, product_id: &Value) -> axum_test::TestResponse {
        self.server
            .post("/api/v1/claims")
            .add_header(header::AUTHORIZATION, Self::bearer(&self.customer))
            .json(&json!({
                "product_id": product_id,
                "issue_type": "display",
                "description": "Screen flickers after waking from sleep",
                "contact_preference": "email",
            }))
            .await
    }

    async fn set_status(&self, actor: &Actor, claim_id: &Value, status: &str) -> axum_test::TestResponse {
        self.server
            .put(&format!("/api/v1/claims/{}/status", claim_id.as_str().unwrap()))
            .add_header(header::AUTHORIZATION, Self::bearer(actor))
            .json(&json!({ "status": status }))
            .await
    }
}

fn recent_purchase() -> NaiveDate {
    Utc::now().date_naive() - Duration::days(30)
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let ready = app.server.get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    assert_eq!(ready.json::<Value>()["adapters"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/claims").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "unauthorized");

    let response = app
        .server
        .get("/api/v1/claims")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_cannot_create_products() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/products")
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.customer))
        .json(&json!({
            "name": "Kettle",
            "description": "Stainless steel electric kettle",
            "category": "appliances",
            "warranty_months": 12,
            "serial_format": "KTL-####",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["message"], "Unauthorized");
}

#[tokio::test]
async fn test_product_validation_reports_fields() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/products")
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.business))
        .json(&json!({
            "name": "K",
            "description": "short",
            "category": "appliances",
            "warranty_months": 0,
            "serial_format": "KTL-####",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["description"].is_array());
    assert!(body["details"]["warranty_months"].is_array());
}

#[tokio::test]
async fn test_registration_by_serial_prefix() {
    let app = TestApp::new();
    let product = app.create_product("LPX1", 24).await;

    let response = app.register("LPX1-7845-9371", recent_purchase()).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let warranty = response.json::<Value>();
    assert_eq!(warranty["product"]["id"], product["id"]);
    assert_eq!(warranty["status"], "active");

    let duplicate = app.register("LPX1-7845-9371", recent_purchase()).await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
    assert_eq!(duplicate.json::<Value>()["message"], "This product is already registered");

    let unknown = app.register("ZZZ9-0000-0000", recent_purchase()).await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        unknown.json::<Value>()["message"],
        "Product not found with this serial number"
    );
}

#[tokio::test]
async fn test_warranty_listing_has_summary() {
    let app = TestApp::new();
    app.create_product("LPX1", 24).await;
    app.register("LPX1-0000-0001", recent_purchase()).await;
    app.register("LPX1-0000-0002", NaiveDate::from_ymd_opt(2019, 3, 1).unwrap()).await;

    for actor in [&app.customer, &app.business] {
        let response = app
            .server
            .get("/api/v1/warranties")
            .add_header(header::AUTHORIZATION, TestApp::bearer(actor))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body = response.json::<Value>();
        assert_eq!(body["summary"]["total"], 2);
        assert_eq!(body["summary"]["active"], 1);
        assert_eq!(body["summary"]["expired"], 1);
    }
}

#[tokio::test]
async fn test_claim_lifecycle() {
    let app = TestApp::new();
    let product = app.create_product("LPX1", 24).await;
    app.register("LPX1-7845-9371", recent_purchase()).await;

    let response = app.file_claim(&product["id"]).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let claim = response.json::<Value>();
    assert_eq!(claim["status"], "pending");
    assert_eq!(claim["timeline"][0]["type"], "created");
    assert_eq!(claim["timeline"][0]["description"], "Claim submitted");

    // Customers cannot move a claim
    let response = app.set_status(&app.customer, &claim["id"], "resolved").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.set_status(&app.business, &claim["id"], "resolved").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let resolved = response.json::<Value>();
    assert_eq!(resolved["status"], "resolved");
    assert_eq!(resolved["next_statuses"], json!([]));
    let timeline = resolved["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[1]["type"], "status-change");
    assert_eq!(timeline[1]["description"], "Claim status changed to resolved");

    // Terminal
    let response = app.set_status(&app.business, &claim["id"], "in-progress").await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_claim_on_expired_warranty_is_rejected() {
    let app = TestApp::new();
    let product = app.create_product("OLD1", 12).await;
    app.register("OLD1-0000-0001", NaiveDate::from_ymd_opt(2019, 3, 1).unwrap()).await;

    let response = app.file_claim(&product["id"]).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["message"],
        "Warranty for this product has expired"
    );
}

#[tokio::test]
async fn test_claim_without_registration_is_not_found() {
    let app = TestApp::new();
    let product = app.create_product("LPX1", 24).await;

    let response = app.file_claim(&product["id"]).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_messages_from_both_parties() {
    let app = TestApp::new();
    let product = app.create_product("LPX1", 24).await;
    app.register("LPX1-7845-9371", recent_purchase()).await;
    let claim = app.file_claim(&product["id"]).await.json::<Value>();
    let path = format!("/api/v1/claims/{}/messages", claim["id"].as_str().unwrap());

    let response = app
        .server
        .post(&path)
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.customer))
        .json(&json!({ "content": "Any update on this?" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["sender"], "customer");

    let response = app
        .server
        .post(&path)
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.business))
        .json(&json!({ "content": "A replacement panel is on its way" }))
        .await;
    assert_eq!(response.json::<Value>()["sender"], "business");

    let stranger = ActorFixtures::customer();
    let response = app
        .server
        .post(&path)
        .add_header(header::AUTHORIZATION, TestApp::bearer(&stranger))
        .json(&json!({ "content": "Hello" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let detail = app
        .server
        .get(&format!("/api/v1/claims/{}", claim["id"].as_str().unwrap()))
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.business))
        .await
        .json::<Value>();
    assert_eq!(detail["timeline"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_extension_plans_and_purchase() {
    let app = TestApp::new();
    app.create_product("LPX1", 24).await;
    let warranty = app.register("LPX1-7845-9371", recent_purchase()).await.json::<Value>();

    let plans = app
        .server
        .get("/api/v1/extension-plans")
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.customer))
        .await
        .json::<Value>();
    assert_eq!(plans.as_array().unwrap().len(), 3);
    assert_eq!(plans[0]["plan"], "basic");
    assert_eq!(plans[0]["months"], 12);

    let response = app
        .server
        .post(&format!(
            "/api/v1/registrations/{}/extensions",
            warranty["id"].as_str().unwrap()
        ))
        .add_header(header::AUTHORIZATION, TestApp::bearer(&app.customer))
        .json(&json!({ "plan": "premium" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let receipt = response.json::<Value>();
    assert_eq!(receipt["previous_expiry"], warranty["expiry_date"]);
    assert_eq!(receipt["warranty"]["expiry_date"], receipt["new_expiry"]);
    assert_eq!(receipt["currency"], "USD");
}

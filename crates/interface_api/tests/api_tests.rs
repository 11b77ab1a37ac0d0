//! HTTP behaviour of the fee ledger API
//!
//! Requests go through the full router with in-memory stores behind the
//! ledger, so status codes, error bodies and JSON shapes are exercised
//! without a database.

use std::str::FromStr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use domain_fees::memory::InMemoryFeeRecordStore;
use domain_fees::Student;
use interface_api::{config::ApiConfig, create_router};
use test_utils::{FeeRecordBuilder, MemoryStores, PeriodFixtures, SchoolFixture};

struct TestApp {
    school: SchoolFixture,
    stores: MemoryStores,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let school = SchoolFixture::new();
        let stores = school.stores().await;
        let router = create_router(Arc::new(stores.ledger()), ApiConfig::default());
        Self { school, stores, router }
    }

    fn school_uri(&self, path: &str) -> String {
        format!("/api/v1/schools/{}{}", Uuid::from(self.school.school_id), path)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        read_json(response).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        read_json(response).await
    }

    async fn pay(&self, student: &Student, fee_type_id: Uuid, amount: &str) -> (StatusCode, Value) {
        let body = payment_body(student, fee_type_id, Uuid::from(self.school.teacher.id), amount);
        self.post(&self.school_uri("/payments"), body).await
    }

    fn student_query(student: &Student, path: &str) -> String {
        format!(
            "/students/{}/{}?class_id={}&period=2025%20Spring&name={}&code={}",
            Uuid::from(student.id),
            path,
            Uuid::from(student.class_id),
            student.name.replace(' ', "%20"),
            student.code
        )
    }
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024).await.expect("body");
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json")
    };
    (status, payload)
}

fn payment_body(student: &Student, fee_type_id: Uuid, collector_id: Uuid, amount: &str) -> Value {
    json!({
        "student": {
            "id": Uuid::from(student.id),
            "class_id": Uuid::from(student.class_id),
            "name": student.name,
            "code": student.code,
        },
        "fee_type_id": fee_type_id,
        "collector_role": "teacher",
        "collector_id": collector_id,
        "period": "2025 Spring",
        "amount": amount,
    })
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("expected a decimal, got {}", other),
    }
}

fn roster(students: &[&Student]) -> Value {
    Value::Array(
        students
            .iter()
            .map(|s| {
                json!({
                    "id": Uuid::from(s.id),
                    "class_id": Uuid::from(s.class_id),
                    "name": s.name,
                    "code": s.code,
                })
            })
            .collect(),
    )
}

mod health_routes {
    use super::*;

    #[tokio::test]
    async fn test_health_and_readiness() {
        let app = TestApp::new().await;

        let (status, payload) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "healthy");

        let (status, payload) = app.get("/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_readiness_reports_unavailable_store() {
        let app = TestApp::new().await;
        app.stores.records.set_offline(true);

        let (status, payload) = app.get("/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "unavailable");
    }
}

mod payment_routes {
    use super::*;

    #[tokio::test]
    async fn test_lists_catalog() {
        let app = TestApp::new().await;

        let (status, payload) = app.get(&app.school_uri("/fee-types")).await;
        assert_eq!(status, StatusCode::OK);

        let names: Vec<&str> = payload
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|f| f["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Tuition", "Books"]);
    }

    #[tokio::test]
    async fn test_partial_payment_is_created() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");

        let (status, payload) = app.pay(&ada, app.school.tuition.id.into(), "50.00").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payload["status"], "partial");
        assert_eq!(decimal(&payload["amount"]), dec!(100));
        assert_eq!(decimal(&payload["paid"]), dec!(50));
        assert_eq!(payload["period"], "2025 Spring");
        assert_eq!(payload["collector_role"], "teacher");
        assert_eq!(app.stores.records.len().await, 1);
    }

    #[tokio::test]
    async fn test_overpayment_is_rejected() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");

        let (status, payload) = app.pay(&ada, app.school.tuition.id.into(), "101.00").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(payload["error"], "invalid_amount");
        assert_eq!(app.stores.records.len().await, 0);
    }

    #[tokio::test]
    async fn test_zero_payment_is_rejected() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");

        let (status, payload) = app.pay(&ada, app.school.tuition.id.into(), "0").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(payload["error"], "invalid_amount");
    }

    #[tokio::test]
    async fn test_fee_outside_class_is_not_applicable() {
        let app = TestApp::new().await;
        let grace = app.school.student_in_b("Grace Hopper", "B-01");

        let (status, payload) = app.pay(&grace, app.school.books.id.into(), "10.00").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(payload["error"], "not_applicable");
    }

    #[tokio::test]
    async fn test_unknown_fee_type_is_not_found() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");

        let (status, payload) = app.pay(&ada, Uuid::new_v4(), "10.00").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"], "not_found");
    }

    #[tokio::test]
    async fn test_invalid_body_fails_validation() {
        let app = TestApp::new().await;
        let nameless = app.school.student_in_a("", "A-02");

        let (status, payload) = app.pay(&nameless, app.school.tuition.id.into(), "10.00").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(payload["error"], "validation_error");
        assert!(payload["details"].as_array().is_some_and(|d| !d.is_empty()));
    }

    #[tokio::test]
    async fn test_store_outage_maps_to_service_unavailable() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        app.stores.catalog.set_offline(true);

        let (status, payload) = app.pay(&ada, app.school.tuition.id.into(), "10.00").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["error"], "service_unavailable");
    }
}

mod student_routes {
    use super::*;

    #[tokio::test]
    async fn test_status_moves_from_none_to_full() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        let status_uri = app.school_uri(&TestApp::student_query(&ada, "status"));

        let (_, payload) = app.get(&status_uri).await;
        assert_eq!(payload["status"], "none");

        app.pay(&ada, app.school.tuition.id.into(), "100.00").await;
        let (_, payload) = app.get(&status_uri).await;
        assert_eq!(payload["status"], "partial");

        app.pay(&ada, app.school.books.id.into(), "20.00").await;
        app.pay(&ada, app.school.books.id.into(), "30.00").await;
        let (status, payload) = app.get(&status_uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "full");
    }

    #[tokio::test]
    async fn test_balances_sum_instalments() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");

        app.pay(&ada, app.school.books.id.into(), "20.00").await;
        app.pay(&ada, app.school.books.id.into(), "15.00").await;

        let uri = format!("{}&as_of=2025-06-01", app.school_uri(&TestApp::student_query(&ada, "balances")));
        let (status, payload) = app.get(&uri).await;
        assert_eq!(status, StatusCode::OK);

        let balances = payload["balances"].as_array().expect("balances");
        let books = balances
            .iter()
            .find(|b| b["fee_type_name"] == "Books")
            .expect("books balance");
        assert_eq!(decimal(&books["paid"]), dec!(35));
        assert_eq!(decimal(&books["outstanding"]), dec!(15));
        assert_eq!(books["status"], "partial");

        let tuition = balances
            .iter()
            .find(|b| b["fee_type_name"] == "Tuition")
            .expect("tuition balance");
        assert_eq!(tuition["overdue"], true);
        assert_eq!(decimal(&payload["total_outstanding"]), dec!(115));
    }

    #[tokio::test]
    async fn test_missing_period_is_bad_request() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        let uri = app.school_uri(&format!(
            "/students/{}/status?class_id={}",
            Uuid::from(ada.id),
            Uuid::from(ada.class_id)
        ));

        let (status, payload) = app.get(&uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_balances_without_class_is_bad_request() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        let uri = app.school_uri(&format!("/students/{}/balances?period=2025%20Spring", Uuid::from(ada.id)));

        let (status, payload) = app.get(&uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_history_sorted_chronologically() {
        let school = SchoolFixture::new();
        let ada = school.student_in_a("Ada Lovelace", "A-01");
        let records = [PeriodFixtures::fall_2025(), PeriodFixtures::spring_2025()]
            .into_iter()
            .map(|period| {
                FeeRecordBuilder::for_fee_type(school.school_id, &ada, &school.tuition)
                    .in_period(period)
                    .build()
            })
            .collect();
        let mut stores = school.stores().await;
        stores.records = InMemoryFeeRecordStore::with_records(records).await;
        let app = TestApp {
            router: create_router(Arc::new(stores.ledger()), ApiConfig::default()),
            school,
            stores,
        };

        let base = app.school_uri(&format!("/students/{}/history", Uuid::from(ada.id)));

        let (_, discovery) = app.get(&base).await;
        assert_eq!(discovery["periods"][0]["period"], "2025 Fall");

        let (status, sorted) = app.get(&format!("{}?sort=chronological", base)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sorted["periods"][0]["period"], "2025 Spring");
        assert_eq!(sorted["periods"][1]["period"], "2025 Fall");
        assert_eq!(decimal(&sorted["total_paid"]), dec!(200));
    }

    #[tokio::test]
    async fn test_statement_names_collectors() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        app.pay(&ada, app.school.tuition.id.into(), "60.00").await;

        let uri = app.school_uri(&format!(
            "/students/{}/statement?name=Ada%20Lovelace&code=A-01",
            Uuid::from(ada.id)
        ));
        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");

        assert_eq!(
            response.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        assert!(response.headers().contains_key("x-request-id"));

        let (status, payload) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["student_name"], "Ada Lovelace");
        let line = &payload["sections"][0]["lines"][0];
        assert_eq!(line["fee_type_name"], "Tuition");
        assert_eq!(line["collector_name"], "Ms. Hopper");
    }
}

mod class_routes {
    use super::*;

    #[tokio::test]
    async fn test_class_statistics() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        let alan = app.school.student_in_a("Alan Turing", "A-02");

        app.pay(&ada, app.school.tuition.id.into(), "100.00").await;
        app.pay(&alan, app.school.books.id.into(), "50.00").await;

        let uri = app.school_uri(&format!("/classes/{}/statistics", Uuid::from(app.school.class_a.id)));
        let (status, payload) = app
            .post(&uri, json!({ "period": "2025 Spring", "students": roster(&[&ada, &alan]) }))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["student_count"], 2);
        assert_eq!(decimal(&payload["total_fees"]), dec!(300));
        assert_eq!(decimal(&payload["total_collected"]), dec!(150));
        assert_eq!(decimal(&payload["pending_amount"]), dec!(150));
        assert_eq!(payload["payment_rate"], 50);
    }

    #[tokio::test]
    async fn test_empty_class_has_zero_rate() {
        let app = TestApp::new().await;

        let uri = app.school_uri(&format!("/classes/{}/statistics", Uuid::from(app.school.class_b.id)));
        let (status, payload) = app.post(&uri, json!({ "period": "2025 Spring", "students": [] })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["student_count"], 0);
        assert_eq!(payload["payment_rate"], 0);
    }

    #[tokio::test]
    async fn test_class_report_breakdown() {
        let app = TestApp::new().await;
        let ada = app.school.student_in_a("Ada Lovelace", "A-01");
        let alan = app.school.student_in_a("Alan Turing", "A-02");
        app.pay(&ada, app.school.tuition.id.into(), "40.00").await;

        let uri = app.school_uri(&format!("/classes/{}/report", Uuid::from(app.school.class_a.id)));
        let (status, payload) = app
            .post(
                &uri,
                json!({
                    "class_name": "Class A",
                    "grade": "5",
                    "period": "2025 Spring",
                    "students": roster(&[&ada, &alan]),
                }),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["class"]["name"], "Class A");
        assert_eq!(payload["breakdown"]["partial_count"], 1);
        assert_eq!(payload["breakdown"]["none_count"], 1);
        assert_eq!(payload["breakdown"]["full_count"], 0);
    }
}

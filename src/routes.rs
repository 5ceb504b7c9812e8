use std::sync::Arc;

use axum::{middleware, response::IntoResponse, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        applications::applications_handler, auth::auth_handler, contracts::contracts_handler,
        projects::projects_handler, students::students_handler,
    },
    middleware::auth,
    AppState,
};

pub async fn health_checker_handler() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "message": "campuslance is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest(
            "/projects",
            projects_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/applications",
            applications_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/contracts",
            contracts_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/students",
            students_handler().layer(middleware::from_fn(auth)),
        )
        .route("/healthchecker", get(health_checker_handler))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, db::MemoryStore, service::today};

    fn app() -> Router {
        let config = Config::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            "JWT_SECRET_KEY" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap();

        create_router(Arc::new(AppState::new(Arc::new(MemoryStore::new()), config)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Registers a student and returns (token, student id).
    async fn sign_up(app: &Router, name: &str) -> (String, String) {
        let email = format!("{}@campus.edu", name.to_lowercase());
        let (status, _) = send(
            app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": name,
                "email": email,
                "password": "password123",
                "passwordConfirm": "password123",
                "department": "CSE",
                "year_of_study": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        (
            body["token"].as_str().unwrap().to_string(),
            body["student_id"].as_str().unwrap().to_string(),
        )
    }

    fn data_id(body: &Value) -> String {
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn healthchecker_is_public() {
        let (status, body) = send(&app(), "GET", "/api/healthchecker", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/projects", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "fail");

        let (status, _) = send(&app, "GET", "/api/projects", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = app();
        sign_up(&app, "Asha").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "asha@campus.edu", "password": "password124" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["kind"], "auth_failure");
    }

    #[tokio::test]
    async fn marketplace_flow_over_http() {
        let app = app();
        let (owner, _) = sign_up(&app, "Owner").await;
        let (freelancer, freelancer_id) = sign_up(&app, "Freelancer").await;

        let deadline = (today() + Duration::days(7)).to_string();
        let (status, body) = send(
            &app,
            "POST",
            "/api/projects",
            Some(&owner),
            Some(json!({
                "title": "Department newsletter",
                "description": "Monthly layout in Figma",
                "deadline": deadline
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let project_id = data_id(&body);

        let (status, body) = send(&app, "GET", "/api/projects?keyword=NEWS&status=open", Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/api/projects?status=Open", Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", "/api/projects?status=In%20Progress", Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, "GET", "/api/projects?status=archived", Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let apply_uri = format!("/api/projects/{}/applications", project_id);
        let (status, body) = send(&app, "POST", &apply_uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let (status, body) = send(&app, "POST", &apply_uri, Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::CREATED);
        let application_id = data_id(&body);

        let (status, _) = send(&app, "GET", &apply_uri, Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let accept_uri = format!("/api/applications/{}/accept", application_id);
        let (status, body) = send(&app, "PUT", &accept_uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        let contract_id = data_id(&body);

        let (status, body) = send(&app, "PUT", &accept_uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["kind"], "conflict");

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/contracts/{}/complete", contract_id),
            Some(&owner),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let review_uri = format!("/api/contracts/{}/review", contract_id);
        let payments_uri = format!("/api/contracts/{}/payments", contract_id);

        let (status, body) = send(&app, "POST", &payments_uri, Some(&owner), Some(json!({ "amount": "750.00" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "precondition_failed");

        let (status, body) = send(&app, "POST", &review_uri, Some(&owner), Some(json!({ "rating": 6 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let (status, body) = send(&app, "POST", &review_uri, Some(&owner), Some(json!({ "rating": 4.5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["kind"], "validation_error");

        let (status, _) = send(&app, "GET", &review_uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            &review_uri,
            Some(&owner),
            Some(json!({ "rating": 4, "review_text": "On time" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", &review_uri, Some(&owner), Some(json!({ "rating": 5 }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "conflict");

        let (status, body) = send(&app, "POST", &payments_uri, Some(&owner), Some(json!({ "amount": "750.005" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let (status, body) = send(&app, "POST", &payments_uri, Some(&owner), Some(json!({ "amount": "750.00" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["payment_method"], "UPI");
        assert_eq!(body["data"]["status"], "Paid");

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/students/{}/rating", freelancer_id),
            Some(&owner),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["average"], 4.0);
        assert_eq!(body["data"]["count"], 1);

        let (status, body) = send(&app, "GET", "/api/students/me/dashboard", Some(&freelancer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["applications_submitted"], 1);
        assert_eq!(body["data"]["active_contracts"], 0);
    }

    #[tokio::test]
    async fn skills_round_trip_over_http() {
        let app = app();
        let (token, _) = sign_up(&app, "Asha").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/students/me/skills",
            Some(&token),
            Some(json!({ "name": "Rust", "proficiency": "beginner" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let skill_id = body["data"]["skill_id"].as_str().unwrap().to_string();

        let skill_uri = format!("/api/students/me/skills/{}", skill_id);
        let (status, body) = send(&app, "PUT", &skill_uri, Some(&token), Some(json!({ "proficiency": "advanced" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["proficiency"], "advanced");

        let (status, body) = send(&app, "GET", "/api/students/me/skills", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["skill_name"], "Rust");

        let (status, _) = send(&app, "DELETE", &skill_uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, "GET", "/api/students/me/skills", Some(&token), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }
}

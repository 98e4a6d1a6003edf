use axum::{Router, routing::get};

use crate::{routes, state::AppState};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::auth::router())
        .merge(routes::orders::router(&state));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use db::models::order::CreateOrder;
    use db::store::{InMemoryOrderStore, OrderStore};
    use db::types::Template;
    use serde_json::{Value, json};
    use services::services::generation::{CompletionClient, GenerationError};
    use tower::ServiceExt;

    use crate::state::AppState;

    struct StubClient {
        response: Result<String, String>,
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(message) => Err(GenerationError::Upstream(message.clone())),
            }
        }
    }

    fn generated_content_json() -> String {
        json!({
            "welcomeMessage": "Forever Begins",
            "ourStory": "Paragraph one.\n\nParagraph two.",
            "venueDetails": "A castle above the river.",
            "rsvpMessage": "Please reply by spring.",
            "seoTitle": "Emma & Lucas — June 22, 2027",
            "seoDescription": "Join Emma & Lucas at Opera Castle.",
            "schemaMarkup": "{\"@type\":\"WeddingEvent\"}",
            "agendaIntro": "Here is how the day unfolds.",
            "detailsIntro": "Everything you need to know.",
            "closingMessage": "Thank you for celebrating with us.",
        })
        .to_string()
    }

    fn setup_app(client: StubClient) -> (Arc<InMemoryOrderStore>, Router) {
        let store = Arc::new(InMemoryOrderStore::new());
        let state = AppState::with_parts(store.clone(), Arc::new(client));
        (store, super::router(state))
    }

    async fn seed_order(store: &InMemoryOrderStore) -> i64 {
        store
            .create(CreateOrder {
                etsy_order_id: "E1".to_string(),
                access_code: "DEMO123".to_string(),
                status: None,
                template: Some(Template::SageGreen),
                wedding_details: None,
            })
            .await
            .unwrap()
            .id
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public_and_ok() {
        let (_store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_wizard_flow_from_login_to_download() {
        let (store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });
        seed_order(&store).await;

        // Login with the access code.
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/login",
                json!({"accessCode": "DEMO123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["data"]["status"], "pending");
        let id = body["data"]["id"].as_i64().unwrap();

        // Save the details step.
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/orders/{id}"),
                json!({"weddingDetails": {
                    "coupleNames": "Emma & Lucas",
                    "weddingDate": "2027-06-22",
                    "venue": "Opera Castle",
                }}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Generate the site copy.
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/orders/{id}/generate"),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["data"]["status"], "completed");
        assert_eq!(
            body["data"]["generatedContent"]["welcomeMessage"],
            "Forever Begins"
        );

        // Reads are idempotent.
        let first = read_json(
            app.clone()
                .oneshot(get_request(&format!("/api/orders/{id}")))
                .await
                .unwrap(),
        )
        .await;
        let second = read_json(
            app.clone()
                .oneshot(get_request(&format!("/api/orders/{id}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(first, second);
        assert_eq!(first["data"]["status"], "completed");

        // Download the finished bundle.
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/orders/{id}/download")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/zip"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[tokio::test]
    async fn login_with_unknown_code_is_unauthorized() {
        let (store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });
        seed_order(&store).await;

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/login",
                json!({"accessCode": "WRONG999"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        // Generic message; does not reveal whether the code exists.
        assert_eq!(body["message"], "Invalid access code");
    }

    #[tokio::test]
    async fn login_with_malformed_body_is_a_client_error() {
        let (_store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });

        let response = app
            .oneshot(json_request(Method::POST, "/api/login", json!({})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn updates_merge_into_existing_details() {
        let (store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });
        let id = seed_order(&store).await;

        app.clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/orders/{id}"),
                json!({"weddingDetails": {"coupleNames": "A & B", "venue": "X"}}),
            ))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/orders/{id}"),
                json!({"weddingDetails": {"venue": "Y"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["data"]["weddingDetails"]["coupleNames"], "A & B");
        assert_eq!(body["data"]["weddingDetails"]["venue"], "Y");
    }

    #[tokio::test]
    async fn update_with_unknown_field_names_the_field() {
        let (store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });
        let id = seed_order(&store).await;

        let response = app
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/orders/{id}"),
                json!({"weddingDetails": {"venu": "typo"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("venu"));
    }

    #[tokio::test]
    async fn update_with_unknown_template_is_rejected() {
        let (store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });
        let id = seed_order(&store).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/orders/{id}"),
                json!({"template": "neon_pink"}),
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());

        // The stored template is untouched.
        let body = read_json(
            app.oneshot(get_request(&format!("/api/orders/{id}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["template"], "sage_green");
    }

    #[tokio::test]
    async fn generate_before_details_is_precondition_failed() {
        let (store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });
        let id = seed_order(&store).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/orders/{id}/generate"),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

        let body = read_json(
            app.oneshot(get_request(&format!("/api/orders/{id}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["status"], "pending");
    }

    #[tokio::test]
    async fn failed_generation_leaves_the_order_unchanged() {
        let (store, app) = setup_app(StubClient {
            response: Err("upstream timed out".to_string()),
        });
        let id = seed_order(&store).await;

        app.clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/api/orders/{id}"),
                json!({"weddingDetails": {
                    "coupleNames": "Emma & Lucas",
                    "weddingDate": "2027-06-22",
                    "venue": "Opera Castle",
                }}),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("/api/orders/{id}/generate"),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = read_json(
            app.oneshot(get_request(&format!("/api/orders/{id}")))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["data"]["status"], "pending");
        assert!(body["data"]["generatedContent"].is_null());
    }

    #[tokio::test]
    async fn database_backed_store_roundtrip() {
        let temp_root =
            std::env::temp_dir().join(format!("everafter-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&temp_root).unwrap();
        let db_path = temp_root.join("db.sqlite");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.to_string_lossy());
        let _env_guard = crate::test_support::TestEnvGuard::new(&temp_root, db_url);

        let db = db::DBService::new().await.unwrap();
        let store = db::store::DbOrderStore::new(db);

        let order = store
            .create(CreateOrder {
                etsy_order_id: "E1".to_string(),
                access_code: "DEMO123".to_string(),
                status: None,
                template: Some(Template::SageGreen),
                wedding_details: None,
            })
            .await
            .unwrap();
        assert_eq!(order.status, db::types::OrderStatus::Pending);

        let duplicate = store
            .create(CreateOrder {
                etsy_order_id: "E2".to_string(),
                access_code: "DEMO123".to_string(),
                status: None,
                template: None,
                wedding_details: None,
            })
            .await;
        assert!(matches!(
            duplicate,
            Err(db::models::order::OrderError::DuplicateAccessCode)
        ));

        let updated = store
            .update(
                order.id,
                db::models::order::UpdateOrder {
                    template: None,
                    wedding_details: json!({"coupleNames": "Emma & Lucas", "venue": "Opera Castle"})
                        .as_object()
                        .cloned(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            updated
                .wedding_details
                .as_ref()
                .unwrap()
                .couple_names
                .as_deref(),
            Some("Emma & Lucas")
        );

        let by_code = store.get_by_access_code("DEMO123").await.unwrap().unwrap();
        assert_eq!(by_code.id, order.id);
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let (_store, app) = setup_app(StubClient {
            response: Ok(generated_content_json()),
        });

        let response = app
            .oneshot(get_request("/api/orders/999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! Mounts a [`GraphQLService`] on an [`axum::Router`].
//!
//! The service reports malformed requests and server faults as [`ServiceError`]s; the
//! router built here turns them into responses:
//! * client errors: `400 Bad Request` (`413 Payload Too Large` for oversized bodies) with the
//!   error message as a plain text body,
//! * everything else: `500 Internal Server Error`, after logging the error.

use axum::Router;
use axum::error_handling::HandleError;
use axum::response::IntoResponse;
use axum::response::Response;
use http::StatusCode;

use crate::error::RequestError;
use crate::error::ServiceError;
use crate::services::router::GraphQLService;

/// Returns a router serving `service` on its configured path.
pub fn graphql_router(service: GraphQLService) -> Router {
    let path = service.configuration().path.clone();
    Router::new().route_service(&path, HandleError::new(service, handle_error))
}

async fn handle_error(err: ServiceError) -> Response {
    match err.as_request_error() {
        Some(request_error) => {
            tracing::debug!(error = %request_error, "rejecting invalid GraphQL request");
            let status = match request_error {
                RequestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, request_error.to_string()).into_response()
        }
        None => {
            tracing::error!(error = %err, "GraphQL request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::Request;
    use http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;
    use serde_json_bytes::json;
    use tower::ServiceExt;

    use super::*;
    use crate::Configuration;
    use crate::graphql;
    use crate::services::execution::MockEngine;

    fn router(engine: MockEngine, configuration: Configuration) -> Router {
        graphql_router(
            GraphQLService::builder()
                .engine(engine)
                .configuration(configuration)
                .build()
                .unwrap(),
        )
    }

    fn never_called() -> MockEngine {
        let mut engine = MockEngine::new();
        engine.expect_execute().never();
        engine
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_the_configured_path() {
        let mut engine = MockEngine::new();
        engine.expect_execute().times(1).returning(|_| {
            Ok(graphql::Response::builder()
                .data(json!({"me": {"id": "1"}}))
                .build()
                .into())
        });
        let app = router(
            engine,
            Configuration::builder().path("/api/graphql").build(),
        );

        let response = app
            .clone()
            .oneshot(post_json("/api/graphql", r#"{"query": "{ me { id } }"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        insta::assert_snapshot!(body_text(response).await, @r#"{"data":{"me":{"id":"1"}}}"#);

        let response = app
            .oneshot(post_json("/graphql", r#"{"query": "{ me { id } }"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_requests_are_bad_requests() {
        let app = router(never_called(), Configuration::default());

        let response = app
            .clone()
            .oneshot(post_json("/graphql", "{ me { id } }"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            body_text(response)
                .await
                .starts_with("body must be a JSON-encoded GraphQL request:")
        );

        let response = app
            .oneshot(
                Request::get("/graphql?operationName=Q")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        insta::assert_snapshot!(body_text(response).await, @"a non-empty 'query' is required");
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let app = router(
            never_called(),
            Configuration::builder().max_request_length(8).build(),
        );
        let response = app
            .oneshot(post_json("/graphql", r#"{"query": "{ me { id } }"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        insta::assert_snapshot!(body_text(response).await, @"request body exceeds the limit of 8 bytes");
    }

    #[test_log::test(tokio::test)]
    async fn engine_failures_are_internal_errors() {
        let mut engine = MockEngine::new();
        engine
            .expect_execute()
            .times(1)
            .returning(|_| Err("connection refused".into()));
        let app = router(engine, Configuration::default());

        let response = app
            .oneshot(post_json("/graphql", r#"{"query": "{ me { id } }"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn unsupported_encodings_pass_through() {
        let app = router(never_called(), Configuration::default());
        let response = app
            .oneshot(
                Request::post("/graphql")
                    .header(CONTENT_TYPE, "text/plain")
                    .body(Body::from("{ me { id } }"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_text(response).await, "");
    }
}

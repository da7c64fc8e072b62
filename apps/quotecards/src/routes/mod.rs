pub mod cards;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(cards::form_handler).post(cards::upload_handler))
        .route("/template.pdf", get(cards::template_handler))
        .route("/health", get(health::health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_state;

    const BOUNDARY: &str = "quotecards-test-boundary";

    fn upload_request(field: &str, file_name: Option<&str>, contents: &str) -> Request<Body> {
        let disposition = match file_name {
            Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
            None => format!("form-data; name=\"{field}\""),
        };
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: text/csv\r\n\r\n{contents}\r\n--{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> Response {
        build_router(state).oneshot(request).await.unwrap()
    }

    async fn error_code(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        json["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = send(test_state(), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["overflow"], "allow");
        assert_eq!(json["shuffle"], "seeded");
    }

    #[tokio::test]
    async fn test_form_is_html() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let response = send(test_state(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("name=file"));
        assert!(html.contains("multipart/form-data"));
    }

    #[tokio::test]
    async fn test_upload_returns_pdf_attachment() {
        let csv = "quote,who,skip\ntext,attrib,\nhello world,\nskip me,x\n";
        let response = send(test_state(), upload_request("file", Some("quotes.csv"), csv)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"quotes.pdf\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_upload_without_name_uses_fallback() {
        let csv = "quote\nhello world,\n";
        let response = send(test_state(), upload_request("file", None, csv)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"cards.pdf\""
        );
    }

    #[tokio::test]
    async fn test_missing_file_field_is_400() {
        let response = send(test_state(), upload_request("other", Some("a.csv"), "x\n")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_file_is_400() {
        let response = send(test_state(), upload_request("file", Some("a.csv"), "")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparseable_deck_is_422() {
        // Second row is accepted (blank marker) but has no contents.
        let csv = "quote,who,skip\n  ,someone,\n";
        let response = send(test_state(), upload_request("file", Some("bad.csv"), csv)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(response).await, "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let mut state = test_state();
        state.config.max_upload_bytes = 64;
        let csv = format!("quote\n{},\n", "word ".repeat(100));
        let response = send(state, upload_request("file", Some("big.csv"), &csv)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_template_is_inline_pdf() {
        let request = Request::get("/template.pdf").body(Body::empty()).unwrap();
        let response = send(test_state(), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}

//! The chat page, compiled into the binary from `frontend/`.
//!
//! The page greets the user via `/startchat`, posts every line to `/chat`
//! and shows `{"error": ...}` bodies inline. Identity rides on the cookie
//! the gateway sets, so the page itself keeps no state.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

const INDEX_HTML: &str = include_str!("../../../frontend/index.html");
const STYLE_CSS: &str = include_str!("../../../frontend/style.css");
const APP_JS: &str = include_str!("../../../frontend/app.js");

/// Routes for the page and its two assets. Stateless, so it merges into
/// any router.
pub fn frontend_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/static/style.css", get(css_handler))
        .route("/static/app.js", get(js_handler))
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn css_handler() -> Response {
    asset("text/css; charset=utf-8", STYLE_CSS)
}

async fn js_handler() -> Response {
    asset("application/javascript; charset=utf-8", APP_JS)
}

/// Assets change only with the binary; revalidate rather than cache blindly.
fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Fetch `uri`, returning content type and body text.
    async fn fetch(uri: &str) -> (String, String) {
        let app: Router = frontend_router();
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let content_type = response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (content_type, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn page_has_composer_and_loads_assets() {
        let (content_type, html) = fetch("/").await;
        assert!(content_type.starts_with("text/html"));
        assert!(html.contains(r#"id="composer""#));
        assert!(html.contains(r#"id="messages""#));
        assert!(html.contains(r#"href="/static/style.css""#));
        assert!(html.contains(r#"src="/static/app.js""#));
    }

    #[tokio::test]
    async fn stylesheet_styles_both_speakers() {
        let (content_type, css) = fetch("/static/style.css").await;
        assert!(content_type.contains("text/css"));
        assert!(css.contains(".message.user"));
        assert!(css.contains(".message.bot"));
        assert!(css.contains(".message.error"));
    }

    #[tokio::test]
    async fn script_speaks_the_chat_protocol() {
        let (content_type, js) = fetch("/static/app.js").await;
        assert!(content_type.contains("javascript"));

        // Greeting first, then `{text}` bodies posted to /chat.
        assert!(js.contains(r#"fetch("/startchat""#));
        assert!(js.contains(r#"fetch("/chat""#));
        assert!(js.contains("JSON.stringify({ text: text })"));
        // `{"error": ...}` replies are shown inline instead of as bot text.
        assert!(js.contains(r#""error" in body"#));
        assert!(js.contains(r#""ERROR: " + body.error"#));
        // The identity cookie must ride along.
        assert!(js.contains(r#"credentials: "same-origin""#));
    }

    #[tokio::test]
    async fn assets_are_revalidated() {
        let app: Router = frontend_router();
        let req = Request::builder()
            .uri("/static/app.js")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    }
}

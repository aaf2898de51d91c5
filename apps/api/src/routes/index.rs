use axum::response::Html;

/// GET /
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

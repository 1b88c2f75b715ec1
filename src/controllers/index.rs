use axum::response::Html;

/// GET / - Chat UI entry page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

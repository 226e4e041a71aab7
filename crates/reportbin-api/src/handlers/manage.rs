use axum::response::Html;

static MANAGE_PAGE: &str = include_str!("../../static/manage.html");

/// Operator page. The page itself is public; every API call it makes carries
/// the password the operator types in.
#[utoipa::path(
    get,
    path = "/manage",
    tag = "public",
    responses(
        (status = 200, description = "Operator page", body = String, content_type = "text/html")
    )
)]
pub async fn manage_page() -> Html<&'static str> {
    Html(MANAGE_PAGE)
}

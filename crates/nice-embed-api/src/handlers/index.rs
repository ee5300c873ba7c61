use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>discord-nice-embed</title>
</head>
<body>
<form action="/uploadfiles/" enctype="multipart/form-data" method="post">
<input name="file" type="file">
<input type="submit">
</form>
</body>
</html>
"#;

/// Minimal upload form.
#[utoipa::path(
    get,
    path = "/",
    tag = "uploads",
    responses((status = 200, description = "HTML upload form", body = String, content_type = "text/html"))
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

use actix_web::{
    post,
    web::{Data, Form, Path},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::SessionUser,
    services::content,
};

#[derive(Deserialize)]
pub struct CommentForm {
    pub content: String,
}

/// Pipe for commenting on a blog, the blog owner gets a notification
/// - url: `{domain}/addComment/{title}`
///
/// # HTTP request requirements
/// - `{title}` of the blog as parameter
/// ## header
/// - cookie with name `token`, containing the login token
/// ## body
/// - urlencoded form with a non empty `content`
///
/// # Example
/// ```
/// let cookie = CookieBuilder::new("token", "test_token").finish();
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/addComment/Hello")
///     .cookie(cookie)
///     .set_form(&[("content", "nice post")])
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// ```
/// { "message": "Comment added", "id": 12 }
/// ```
/// ## Error
/// - Bad request, empty comment
/// - Unauthorized
/// - Not found, no blog with that title
#[post("/addComment/{title}")]
pub async fn add_comment(
    SessionUser(user_id): SessionUser,
    path: Path<String>,
    form: Form<CommentForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let title = path.into_inner();
    let CommentForm { content: text } = form.into_inner();

    let saved = app_state
        .with_psql(move |conn| content::comment(conn, &title, &user_id, &text))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment added", "id": saved.id })))
}

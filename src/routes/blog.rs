use actix_web::{
    get, post,
    web::{Data, Form, Json, Path},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::SessionUser,
    database::models::blog::PostRef,
    services::content,
};

#[derive(Deserialize)]
pub struct NewBlog {
    #[serde(rename = "blogTitle")]
    pub title: String,
    #[serde(rename = "blogContent")]
    pub content: String,
}

#[derive(Deserialize)]
pub struct DeleteBlog {
    pub blog_id: i32,
}

#[derive(Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "blogID", default)]
    pub blog_id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    pub published: bool,
}

impl PublishRequest {
    /// The id wins when both are given.
    fn post_ref(&self) -> Result<PostRef, AppError> {
        match (self.blog_id, self.title.as_deref().map(str::trim)) {
            (Some(id), _) => Ok(PostRef::Id(id)),
            (None, Some(title)) if !title.is_empty() => Ok(PostRef::Title(title.to_string())),
            _ => Err(AppError::validation("Missing blog id or title")),
        }
    }
}

#[derive(Deserialize)]
pub struct LikeForm {
    pub post_title: String,
    pub action: String,
}

/// Pipe for the landing page of a logged in user
/// - url: `{domain}/home`
///
/// # Response
/// ## Ok
/// - display name, up to 5 random published [blogs](crate::database::models::blog::Blog)
///   and the notification feed
/// ```
/// {
///     "name": "alice",
///     "posts": [ ... ],
///     "notifications": { "total": 1, "chat_invites": 1, "items": [ ... ] }
/// }
/// ```
/// ## Error
/// - Unauthorized
#[get("/home")]
pub async fn home(
    SessionUser(user_id): SessionUser,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = app_state
        .with_psql(move |conn| content::home(conn, &user_id))
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Pipe for the profile page: own blogs, published blogs, liked blogs and a blog count
/// - url: `{domain}/profile`
#[get("/profile")]
pub async fn profile(
    SessionUser(user_id): SessionUser,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = app_state
        .with_psql(move |conn| content::profile(conn, &user_id))
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Pipe for creating a new blog, new blogs start unpublished
/// - url: `{domain}/save_blog`
///
/// # HTTP request requirements
/// ## header
/// - cookie with name `token`, containing the login token
/// ## body
/// - blogTitle: [String] - title we wish to name our blog, must be unique
/// - blogContent: [String] - body of the blog
///
/// # Example
/// ```
/// let cookie = CookieBuilder::new("token", "test_token").finish();
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/save_blog")
///     .cookie(cookie)
///     .set_json(json!({ "blogTitle": "Hello", "blogContent": "world" }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// ```
/// { "success": true, "id": 73 }
/// ```
/// ## Error
/// - Bad request, title or content empty
/// - Unauthorized
/// - Conflict, title already used
/// - Internal server error
#[post("/save_blog")]
pub async fn save_blog(
    SessionUser(user_id): SessionUser,
    form: Json<NewBlog>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let NewBlog { title, content: body } = form.into_inner();

    let blog = app_state
        .with_psql(move |conn| content::create_post(conn, &user_id, &title, &body))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "id": blog.id })))
}

/// Pipe for deleting a blog together with its comments and likes
/// - url: `{domain}/delete_blog`
///
/// # HTTP request requirements
/// ## header
/// - cookie with name `token`, containing the login token
/// ## body
/// - urlencoded form with `blog_id`
///
/// # Response
/// ## Ok
/// ## Error
/// - Unauthorized
/// - Forbidden, blog belongs to someone else
/// - Not found
#[post("/delete_blog")]
pub async fn delete_blog(
    SessionUser(user_id): SessionUser,
    form: Form<DeleteBlog>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog_id = form.blog_id;

    app_state
        .with_psql(move |conn| content::delete_post(conn, &user_id, blog_id))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Pipe for publishing or unpublishing a blog, addressed by `blogID` or `title`
/// - url: `{domain}/update_published`
///
/// # Example
/// ```
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/update_published")
///     .cookie(cookie)
///     .set_json(json!({ "blogID": 73, "published": true }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// ## Error
/// - Bad request, neither id nor title
/// - Unauthorized
/// - Forbidden
/// - Not found
#[post("/update_published")]
pub async fn update_published(
    SessionUser(user_id): SessionUser,
    form: Json<PublishRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let post = form.post_ref()?;
    let published = form.published;

    app_state
        .with_psql(move |conn| content::toggle_publish(conn, &user_id, &post, published))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Pipe for reading a published blog with its comments
/// - url: `{domain}/blog/{title}`
#[get("/blog/{title}")]
pub async fn view_blog(
    SessionUser(user_id): SessionUser,
    path: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let title = path.into_inner();

    let view = app_state
        .with_psql(move |conn| content::view_post(conn, &title, &user_id))
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Pipe for liking or unliking a blog
/// - url: `{domain}/updateLike`
///
/// # HTTP request requirements
/// ## body
/// - urlencoded form with `post_title` and `action`, either `like` or `unlike`
///
/// # Response
/// ## Ok
/// ```
/// { "message": "Blog liked", "likes": 3 }
/// ```
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Not found
#[post("/updateLike")]
pub async fn update_like(
    SessionUser(user_id): SessionUser,
    form: Form<LikeForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LikeForm { post_title, action } = form.into_inner();
    let liked = content::parse_like_action(&action)?;

    let likes = app_state
        .with_psql(move |conn| content::like(conn, &post_title, &user_id, liked))
        .await?;

    let message = if liked { "Blog liked" } else { "Blog unliked" };
    Ok(HttpResponse::Ok().json(json!({ "message": message, "likes": likes })))
}

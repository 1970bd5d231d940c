use actix_web::{put, web::Data, HttpRequest, HttpResponse};
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{session_cookie, session_token, token::Token},
};

/// Pipe for extending the lifetime of the login token
/// - url: `{domain}/api/refresh`
///
/// # HTTP request requirements
/// ## header
/// - cookie with name `token`, containing the login token
///
/// # Example
/// ```
/// let cookie = CookieBuilder::new("token", "test_token").finish();
/// let request = actix_web::test::TestRequest::put()
///     .uri("localhost/api/refresh")
///     .cookie(cookie)
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - set cookie header containing the same token with a fresh expiry
/// ## Error
/// - Unauthorized, token missing or already expired
/// - Internal server error
#[put("/api/refresh")]
pub async fn refresh_token(req: HttpRequest, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let token = session_token(&req)?;
    let ttl = app_state.config.session_ttl_secs;

    let key = token.clone();
    let refreshed = app_state
        .with_redis(move |conn| Token::refresh(conn, &key, ttl))
        .await?;
    if !refreshed {
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, &app_state.config))
        .json(json!({ "success": true })))
}

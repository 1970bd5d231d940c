pub mod password;
pub mod token;

use std::{future::Future, pin::Pin};

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    dev::Payload,
    web::Data,
    FromRequest, HttpRequest,
};

use crate::app::{AppError, AppState, Config};
use token::Token;

/// Name of the cookie carrying the login token.
pub const SESSION_COOKIE: &str = "token";

pub fn session_token(req: &HttpRequest) -> Result<String, AppError> {
    Ok(req
        .cookie(SESSION_COOKIE)
        .ok_or(AppError::Unauthorized)?
        .value()
        .to_string())
}

/// Gate for protected routes: resolves the logged-in user id from the token cookie.
pub async fn session_user(req: &HttpRequest, app_state: &AppState) -> Result<String, AppError> {
    let token = session_token(req)?;

    app_state
        .with_redis(move |conn| Token::find(conn, &token)?.ok_or(AppError::Unauthorized))
        .await
}

/// Id of the logged in user, extracted from the token cookie.
///
/// Put it first in a handler's arguments: extractors resolve in order, so a
/// request without a session is rejected before its body is read.
pub struct SessionUser(pub String);

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let app_state = req
                .app_data::<Data<AppState>>()
                .ok_or_else(|| AppError::internal("session", "application state not registered"))?;

            session_user(&req, app_state).await.map(SessionUser)
        })
    }
}

pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(config.session_ttl_secs as i64))
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

use actix_web::{
    cookie::Cookie,
    get, post,
    web::{Data, Form, Json, Path},
    HttpRequest, HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{removal_cookie, session_cookie, session_token, token::Token, SessionUser},
    services::{
        content,
        identity::{self, Registration, SettingsUpdate},
        session_account,
    },
};

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Issues a login token for `user_id` and wraps it in the session cookie.
async fn start_session(app_state: &AppState, user_id: String) -> Result<Cookie<'static>, AppError> {
    let ttl = app_state.config.session_ttl_secs;
    let token = app_state
        .with_redis(move |conn| Token::new(conn, &user_id, ttl))
        .await?;

    Ok(session_cookie(token, &app_state.config))
}

/// Pipe for creating an user, logs the new user in
/// - url: `{domain}/register`
///
/// # HTTP request requirements
/// ## body
/// - json containing `email`, `username`, `password` and optionally `name`
/// - `password` must be at least 6 characters long
/// - `username` can't contain `@`
///
/// # Example
/// ```
/// let data = "{ \"email\": \"a@x.com\", \"username\": \"alice\", \"password\": \"Secret123!\" }";
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/register")
///     .insert_header(ContentType::json())
///     .set_payload(data)
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - set cookie header containing login token
/// ```
/// { "success": true, "id": "e60a0f7b-381c-46b7-8736-1f204b329727" }
/// ```
/// ## Error
/// - Bad request
/// - Conflict, email or username already in use
/// - Internal server error
#[post("/register")]
pub async fn register(
    form: Json<Registration>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let cost = app_state.config.bcrypt_cost;
    let user = app_state
        .with_psql(move |conn| identity::register(conn, &form, cost))
        .await?;

    let cookie = start_session(&app_state, user.id.clone()).await?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true, "id": user.id })))
}

/// Pipe for logging in as user
/// - url: `{domain}/login`
///
/// # HTTP request requirements
/// ## body
/// - json containing `email` and `password` keys
///
/// # Response
/// ## Ok
/// - set cookie header containing login token
/// ## Error
/// - Unauthorized, wrong email or password
/// - Internal server error
#[post("/login")]
pub async fn login(
    credentials: Json<Credentials>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let Credentials { email, password } = credentials.into_inner();
    let user = app_state
        .with_psql(move |conn| identity::authenticate(conn, &email, &password))
        .await?;

    log::info!("user {} logged in", user.id);
    let cookie = start_session(&app_state, user.id).await?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true })))
}

/// Pipe for logging out, deletes the login token and the cookie holding it
/// - url: `{domain}/logout`
#[get("/logout")]
pub async fn logout(req: HttpRequest, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let token = session_token(&req)?;
    app_state
        .with_redis(move |conn| Token::delete(conn, &token))
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(json!({ "success": true })))
}

/// Pipe for reading the settings of the logged in user
/// - url: `{domain}/settings`
///
/// # Response
/// ## Ok
/// ```
/// {
///     "id": "e60a0f7b-381c-46b7-8736-1f204b329727",
///     "name": "Alice",
///     "username": "alice",
///     "email": "a@x.com",
///     "created_at": "2024-05-01T09:22:30.664361"
/// }
/// ```
/// ## Error
/// - Unauthorized
#[get("/settings")]
pub async fn settings(
    SessionUser(user_id): SessionUser,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = app_state
        .with_psql(move |conn| session_account(conn, &user_id))
        .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Pipe for changing the settings of the logged in user
/// - url: `{domain}/settings`
///
/// # HTTP request requirements
/// ## header
/// - cookie with name `token`, containing the login token
/// ## body
/// - urlencoded form, any of `name`, `username`, `email`, `password`; blank fields are ignored
///
/// # Response
/// ## Ok
/// - the updated user, same shape as `GET /settings`
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Conflict, username or email taken by someone else
#[post("/settings")]
pub async fn update_settings(
    SessionUser(user_id): SessionUser,
    form: Form<SettingsUpdate>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let cost = app_state.config.bcrypt_cost;

    let user = app_state
        .with_psql(move |conn| identity::update_settings(conn, &user_id, &form, cost))
        .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Pipe for viewing another user's profile and published blogs
/// - url: `{domain}/user/{user_id}`
#[get("/user/{user_id}")]
pub async fn public_profile(
    _session: SessionUser,
    path: Path<String>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let view = app_state
        .with_psql(move |conn| content::public_profile(conn, &user_id))
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::routes::test_support::{error_of, offline_state};

    #[actix_rt::test]
    async fn logout_without_cookie_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(offline_state()))
                .service(super::logout),
        )
        .await;

        let req = test::TestRequest::get().uri("/logout").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(resp).await, "Unauthorized");
    }

    #[actix_rt::test]
    async fn settings_update_needs_a_session() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(offline_state()))
                .service(super::update_settings),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/settings")
            .set_form(&[("name", "Alice")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    #[ignore = "needs postgres at DATABASE_URL and redis at REDIS_URL"]
    async fn register_then_login_sets_cookie() {
        let config = crate::app::Config {
            bcrypt_cost: 4,
            ..crate::app::Config::from_env().unwrap()
        };
        let app_state = AppState::new(config).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state.clone()))
                .service(super::register)
                .service(super::login),
        )
        .await;

        let username = format!("route_user_{}", uuid::Uuid::new_v4().simple());
        let email = format!("{}@x.com", username);
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "email": email, "username": username, "password": "Secret123!" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.response().cookies().any(|c| c.name() == "token"));

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": "wrong password" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(resp).await, "Wrong email or password");

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": "Secret123!" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.response().cookies().any(|c| c.name() == "token"));

        let conn = app_state.psql_pool.get().unwrap();
        let user = crate::database::models::user::User::find_by_username(&conn, &username)
            .unwrap()
            .unwrap();
        use diesel::prelude::*;
        diesel::delete(crate::schema::users::table.find(user.id))
            .execute(&conn)
            .unwrap();
    }
}

use actix_web::{
    get, post,
    web::{Data, Json},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::SessionUser,
    services::conversation,
};

#[derive(Deserialize)]
pub struct DismissRequest {
    /// Id of the user who sent the notifications
    pub fromid: String,
    /// Recipient; when sent it has to be the logged in user
    #[serde(default)]
    pub toid: Option<String>,
}

impl DismissRequest {
    fn recipient_matches(&self, user_id: &str) -> bool {
        self.toid.as_deref().map_or(true, |to| to == user_id)
    }
}

/// Pipe for dismissing every notification a user sent you, dismissing a chat invite rejects it
/// - url: `{domain}/deletenoti`
///
/// # HTTP request requirements
/// ## header
/// - cookie with name `token`, containing the login token
/// ## body
/// - json with `fromid` and optionally `toid`
///
/// # Example
/// ```
/// let cookie = CookieBuilder::new("token", "test_token").finish();
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/deletenoti")
///     .cookie(cookie)
///     .set_json(json!({ "fromid": "e60a0f7b-381c-46b7-8736-1f204b329727" }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// ```
/// { "success": true }
/// ```
/// ## Error
/// - Unauthorized
/// - Forbidden, `toid` is someone else
/// - Not found, unknown sender
#[post("/deletenoti")]
pub async fn delete_notification(
    SessionUser(user_id): SessionUser,
    body: Json<DismissRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if !body.recipient_matches(&user_id) {
        return Err(AppError::Forbidden);
    }
    let sender = body.into_inner().fromid;

    app_state
        .with_psql(move |conn| conversation::dismiss_notification(conn, &user_id, &sender))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Pipe for listing the notifications of the logged in user, newest first
/// - url: `{domain}/notifications`
#[get("/notifications")]
pub async fn notifications(
    SessionUser(user_id): SessionUser,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let feed = app_state
        .with_psql(move |conn| conversation::list_notifications(conn, &user_id))
        .await?;

    Ok(HttpResponse::Ok().json(feed))
}

use actix_web::{
    get, post,
    web::{Data, Form, Json, Query},
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
pub struct NewChatForm {
    /// Email or username of the user to invite
    pub search_input: String,
    #[serde(default)]
    pub invite_input: String,
}

#[derive(Deserialize)]
pub struct AcceptRequest {
    /// Email or username of the user whose invite is accepted
    pub data: String,
}

#[derive(Deserialize)]
pub struct RoomQuery {
    pub rid: Option<String>,
}

#[derive(Deserialize)]
pub struct NewMessage {
    pub rid: String,
    pub content: String,
}

/// Pipe for inviting another user to a chat
/// - url: `{domain}/new_chat`
///
/// # HTTP request requirements
/// ## header
/// - cookie with name `token`, containing the login token
/// ## body
/// - urlencoded form
/// - search_input: [String] - email (anything with an `@`) or username of the user to invite
/// - invite_input: [String] (optional) - message shown with the invite
///
/// # Example
/// ```
/// let cookie = CookieBuilder::new("token", "test_token").finish();
/// let request = actix_web::test::TestRequest::post()
///     .uri("localhost/new_chat")
///     .cookie(cookie)
///     .set_form(&[("search_input", "bob"), ("invite_input", "hi bob")])
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// ```
/// {
///     "success": true,
///     "chat_id": "b600b24f-9414-4009-b538-8b9ac77292be",
///     "content": "hi bob"
/// }
/// ```
/// ## Error
/// - Bad request, empty input or inviting yourself
/// - Unauthorized
/// - Not found, no such user
/// - Conflict, chat already exists or invite already sent
#[post("/new_chat")]
pub async fn new_chat(
    SessionUser(user_id): SessionUser,
    form: Form<NewChatForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let NewChatForm {
        search_input,
        invite_input,
    } = form.into_inner();

    let invite = app_state
        .with_psql(move |conn| {
            conversation::create_invite(conn, &user_id, &search_input, &invite_input)
        })
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "chat_id": invite.chat_id,
        "content": invite.content,
    })))
}

/// Pipe for accepting a chat invite
/// - url: `{domain}/accept`
///
/// # HTTP request requirements
/// ## body
/// - json with `data`, the email or username of the user who sent the invite
///
/// # Response
/// ## Ok
/// ```
/// { "success": true, "chatroom": "b600b24f-9414-4009-b538-8b9ac77292be" }
/// ```
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Not found
/// - Conflict, chat already active or the invite is your own
#[post("/accept")]
pub async fn accept(
    SessionUser(user_id): SessionUser,
    body: Json<AcceptRequest>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AcceptRequest { data: sender } = body.into_inner();

    let chat_id = app_state
        .with_psql(move |conn| conversation::accept_invite(conn, &user_id, &sender))
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "chatroom": chat_id })))
}

/// Pipe for the chat page: every conversation of the user, newest activity first,
/// plus the history of room `rid` when given
/// - url: `{domain}/chat/?rid={room_id}`
///
/// # Response
/// ## Ok
/// ```
/// {
///     "conversations": [
///         {
///             "room_id": "b600b24f-9414-4009-b538-8b9ac77292be",
///             "counterpart_id": "e60a0f7b-381c-46b7-8736-1f204b329727",
///             "counterpart_name": "bob",
///             "accepted": true,
///             "last_message": { "kind": "empty" },
///             "last_activity": "2024-05-01T09:22:30.664361"
///         }
///     ],
///     "room": null
/// }
/// ```
/// ## Error
/// - Unauthorized
/// - Not found, the room is not one of the user's
#[get("/chat/")]
pub async fn chat_page(
    SessionUser(user_id): SessionUser,
    query: Query<RoomQuery>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room = query.into_inner().rid.filter(|rid| !rid.trim().is_empty());

    let page = app_state
        .with_psql(move |conn| conversation::list_conversations(conn, &user_id, room.as_deref()))
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Pipe for posting a message into a chat room
/// - url: `{domain}/send_message`
#[post("/send_message")]
pub async fn send_message(
    SessionUser(user_id): SessionUser,
    body: Json<NewMessage>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let NewMessage { rid, content } = body.into_inner();

    let message = app_state
        .with_psql(move |conn| conversation::send_message(conn, &rid, &user_id, &content))
        .await?;

    Ok(HttpResponse::Ok().json(message))
}

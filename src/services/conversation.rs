use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::{Connection, PgConnection};
use serde::Serialize;
use uuid::Uuid;

use super::session_account;
use crate::{
    app::AppError,
    database::models::{
        chat::{Chat, ChatPair},
        message::{ChatMessage, Room},
        notification::{Notification, NotificationKind},
        user::User,
    },
};

/// Notification text used when an invite comes without a message.
pub const DEFAULT_INVITE_TEXT: &str = "wants to start a chat with you";
const UNKNOWN_USER: &str = "Unknown user";

/// How a user was named in a request: by email or by username.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    Email(&'a str),
    Username(&'a str),
}

impl<'a> Identifier<'a> {
    pub fn parse(input: &'a str) -> Result<Self, AppError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::validation("Missing email or username"));
        }

        if input.contains('@') {
            Ok(Identifier::Email(input))
        } else {
            Ok(Identifier::Username(input))
        }
    }
}

pub fn resolve_user(conn: &PgConnection, input: &str) -> Result<User, AppError> {
    let found = match Identifier::parse(input)? {
        Identifier::Email(email) => User::find_by_email(conn, email)?,
        Identifier::Username(username) => User::find_by_username(conn, username)?,
    };

    found.ok_or_else(|| AppError::not_found("User not found"))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Invite {
    pub chat_id: String,
    /// The invite message, echoed back for display before the invite is accepted.
    pub content: String,
}

fn invite_text(payload: &str) -> &str {
    let payload = payload.trim();
    if payload.is_empty() {
        DEFAULT_INVITE_TEXT
    } else {
        payload
    }
}

/// Opens a pending chat between `requester` and the user named by `target`,
/// and leaves an invite notification for the target.
pub fn create_invite(
    conn: &PgConnection,
    requester: &str,
    target: &str,
    payload: &str,
) -> Result<Invite, AppError> {
    let recipient = resolve_user(conn, target)?;
    let pair = ChatPair::new(requester, &recipient.id)?;
    let chat_id = Uuid::new_v4().to_string();

    conn.transaction::<_, AppError, _>(|| {
        if !Chat::insert_if_absent(conn, &chat_id, &pair, requester, false)? {
            return Err(AppError::conflict("Chat already exists"));
        }
        Room::create(conn, &chat_id)?;

        let text = invite_text(payload);
        if !Notification::insert(conn, &recipient.id, requester, text, NotificationKind::ChatInvite)? {
            return Err(AppError::AlreadyInvited);
        }
        Ok(())
    })?;

    log::info!("user {} invited {} to chat {}", requester, recipient.id, chat_id);
    Ok(Invite {
        chat_id,
        content: payload.to_string(),
    })
}

/// What accepting an invite has to do, given the chat currently stored for the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptPlan {
    /// The counterpart's pending chat becomes active.
    Activate(String),
    /// An invite is waiting but its chat is gone; create one that is active from the start.
    Create,
}

/// `has_invite` tells whether the counterpart's chat invite notification is still stored.
pub fn plan_accept(
    existing: Option<&Chat>,
    accepter: &str,
    has_invite: bool,
) -> Result<AcceptPlan, AppError> {
    match existing {
        None if has_invite => Ok(AcceptPlan::Create),
        None => Err(AppError::not_found("Invite not found")),
        Some(chat) if chat.accepted => Err(AppError::conflict("Chat already exists")),
        Some(chat) if chat.initiator_id == accepter => Err(AppError::conflict(
            "You can't accept your own invite",
        )),
        Some(chat) => Ok(AcceptPlan::Activate(chat.id.clone())),
    }
}

/// Accepts the invite sent by the user named by `sender` and returns the chat id.
pub fn accept_invite(conn: &PgConnection, accepter: &str, sender: &str) -> Result<String, AppError> {
    let sender = resolve_user(conn, sender)?;
    let pair = ChatPair::new(accepter, &sender.id)?;

    let chat_id = conn.transaction::<_, AppError, _>(|| {
        let existing = Chat::find_by_pair(conn, &pair)?;
        let has_invite = Notification::invite_exists(conn, accepter, &sender.id)?;

        match plan_accept(existing.as_ref(), accepter, has_invite)? {
            AcceptPlan::Activate(chat_id) => {
                if !Chat::mark_accepted(conn, &chat_id)? {
                    return Err(AppError::conflict("Chat already exists"));
                }
                Room::create(conn, &chat_id)?;
                Ok(chat_id)
            }
            AcceptPlan::Create => {
                let chat_id = Uuid::new_v4().to_string();
                if !Chat::insert_if_absent(conn, &chat_id, &pair, &sender.id, true)? {
                    return Err(AppError::conflict("Chat already exists"));
                }
                Room::create(conn, &chat_id)?;
                Ok(chat_id)
            }
        }
    })?;

    // The chat is committed at this point; a failure here only leaves a stale invite behind.
    if let Err(err) = Notification::delete_invite(conn, accepter, &sender.id) {
        log::warn!(
            "chat {} accepted but invite from {} was not removed: {}",
            chat_id,
            sender.id,
            err
        );
    }

    log::info!("user {} accepted chat {} with {}", accepter, chat_id, sender.id);
    Ok(chat_id)
}

/// Deletes what `sender` left for `recipient`. Dismissing a chat invite rejects it,
/// which also drops the still pending chat.
pub fn dismiss_notification(conn: &PgConnection, recipient: &str, sender: &str) -> Result<(), AppError> {
    if !User::exists(conn, sender)? {
        return Err(AppError::not_found("User not found"));
    }

    conn.transaction::<_, AppError, _>(|| {
        let had_invite = Notification::delete_invite(conn, recipient, sender)? > 0;
        Notification::delete_between(conn, recipient, sender)?;

        if had_invite && recipient != sender {
            let pair = ChatPair::new(recipient, sender)?;
            if Chat::delete_pending(conn, &pair, sender)? > 0 {
                log::info!("user {} rejected the chat invite from {}", recipient, sender);
            }
        }
        Ok(())
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastMessage {
    /// The room has no messages yet.
    Empty,
    Message {
        sender_name: String,
        content: String,
        sent_at: NaiveDateTime,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversationSummary {
    pub room_id: String,
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub accepted: bool,
    pub last_message: LastMessage,
    pub last_activity: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomView {
    pub room_id: String,
    pub counterpart_id: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversationPage {
    pub conversations: Vec<ConversationSummary>,
    pub room: Option<RoomView>,
}

pub fn summarize(
    user: &str,
    chat: &Chat,
    counterpart_name: &str,
    latest: Option<ChatMessage>,
) -> ConversationSummary {
    let (last_message, last_activity) = match latest {
        Some(msg) => (
            LastMessage::Message {
                sender_name: msg.sender_name,
                content: msg.content,
                sent_at: msg.sent_at,
            },
            msg.sent_at,
        ),
        None => (LastMessage::Empty, chat.created_at),
    };

    ConversationSummary {
        room_id: chat.id.clone(),
        counterpart_id: chat.counterpart(user).to_string(),
        counterpart_name: counterpart_name.to_string(),
        accepted: chat.accepted,
        last_message,
        last_activity,
    }
}

/// Newest activity first; ties keep their original order.
pub fn sort_by_activity(summaries: &mut [ConversationSummary]) {
    summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
}

fn display_names(conn: &PgConnection, ids: &[String]) -> Result<HashMap<String, String>, AppError> {
    Ok(User::find_many(conn, ids)?
        .into_iter()
        .map(|u| {
            let name = u.display_name().to_string();
            (u.id, name)
        })
        .collect())
}

/// Lists the chats of `user`; with `room` set, also returns that room's history.
pub fn list_conversations(
    conn: &PgConnection,
    user: &str,
    room: Option<&str>,
) -> Result<ConversationPage, AppError> {
    let chats = Chat::for_user(conn, user)?;

    let counterpart_ids: Vec<String> = chats
        .iter()
        .map(|c| c.counterpart(user).to_string())
        .collect();
    let names = display_names(conn, &counterpart_ids)?;

    let mut conversations = Vec::with_capacity(chats.len());
    for chat in &chats {
        let latest = ChatMessage::latest(conn, &chat.id)?;
        let name = names
            .get(chat.counterpart(user))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_USER);
        conversations.push(summarize(user, chat, name, latest));
    }
    sort_by_activity(&mut conversations);

    let room = match room {
        None => None,
        Some(room_id) => {
            let chat = chats
                .iter()
                .find(|c| c.id == room_id)
                .ok_or_else(|| AppError::not_found("Chat room not found"))?;

            Some(RoomView {
                room_id: chat.id.clone(),
                counterpart_id: chat.counterpart(user).to_string(),
                messages: ChatMessage::history(conn, &chat.id)?,
            })
        }
    };

    Ok(ConversationPage {
        conversations,
        room,
    })
}

/// Appends a message to a room the sender takes part in.
pub fn send_message(
    conn: &PgConnection,
    room_id: &str,
    sender: &str,
    content: &str,
) -> Result<ChatMessage, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::validation("Message can't be empty"));
    }

    let chat = Chat::find_by_id(conn, room_id)?
        .filter(|c| c.has_participant(sender))
        .ok_or_else(|| AppError::not_found("Chat room not found"))?;
    if !chat.accepted {
        return Err(AppError::conflict("Chat invite has not been accepted yet"));
    }

    let account = session_account(conn, sender)?;
    ChatMessage::new(conn, &chat.id, sender, account.display_name(), content)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationItem {
    pub id: i32,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub kind: NotificationKind,
    /// Chat shared with the sender, if there is one.
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationFeed {
    pub total: usize,
    pub chat_invites: usize,
    pub items: Vec<NotificationItem>,
}

impl NotificationFeed {
    pub fn new(items: Vec<NotificationItem>) -> Self {
        let chat_invites = items
            .iter()
            .filter(|n| n.kind == NotificationKind::ChatInvite)
            .count();

        Self {
            total: items.len(),
            chat_invites,
            items,
        }
    }
}

pub fn list_notifications(conn: &PgConnection, user: &str) -> Result<NotificationFeed, AppError> {
    let notifications = Notification::for_recipient(conn, user)?;

    let sender_ids: Vec<String> = notifications.iter().map(|n| n.sender_id.clone()).collect();
    let names = display_names(conn, &sender_ids)?;

    let mut items = Vec::with_capacity(notifications.len());
    for noti in notifications {
        let room_id = match ChatPair::new(user, &noti.sender_id) {
            Ok(pair) => Chat::find_by_pair(conn, &pair)?.map(|c| c.id),
            Err(_) => None,
        };
        let sender_name = names
            .get(&noti.sender_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        items.push(NotificationItem {
            id: noti.id,
            kind: noti.kind(),
            sender_id: noti.sender_id,
            sender_name,
            content: noti.content,
            created_at: noti.created_at,
            room_id,
        });
    }

    Ok(NotificationFeed::new(items))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::services::test_support::{test_conn, test_user};

    fn chat(initiator: &str, accepted: bool) -> Chat {
        Chat {
            id: String::from("room-1"),
            user_low: String::from("a-id"),
            user_high: String::from("b-id"),
            initiator_id: initiator.to_string(),
            accepted,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn message(content: &str, sent_at: NaiveDateTime) -> ChatMessage {
        ChatMessage {
            id: 1,
            room_id: String::from("room-1"),
            sender_id: String::from("b-id"),
            sender_name: String::from("bob"),
            content: content.to_string(),
            sent_at,
        }
    }

    #[test]
    fn identifier_with_at_is_an_email() {
        assert_eq!(Identifier::parse("a@x.com").unwrap(), Identifier::Email("a@x.com"));
        assert_eq!(Identifier::parse(" bob ").unwrap(), Identifier::Username("bob"));
        assert!(matches!(Identifier::parse("   "), Err(AppError::Validation(_))));
    }

    #[test]
    fn empty_invite_text_falls_back() {
        assert_eq!(invite_text("  "), DEFAULT_INVITE_TEXT);
        assert_eq!(invite_text(" hi bob "), "hi bob");
    }

    #[test]
    fn accept_of_stored_invite_without_chat_creates_one() {
        assert_eq!(plan_accept(None, "b-id", true).unwrap(), AcceptPlan::Create);
    }

    #[test]
    fn accept_without_invite_is_not_found() {
        match plan_accept(None, "b-id", false) {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Invite not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn accept_activates_counterpart_invite() {
        let pending = chat("a-id", false);
        assert_eq!(
            plan_accept(Some(&pending), "b-id", true).unwrap(),
            AcceptPlan::Activate(String::from("room-1"))
        );
    }

    #[test]
    fn accept_of_own_invite_conflicts() {
        let pending = chat("a-id", false);
        assert!(matches!(
            plan_accept(Some(&pending), "a-id", true),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn accept_of_active_chat_conflicts() {
        let active = chat("a-id", true);
        assert!(matches!(
            plan_accept(Some(&active), "b-id", false),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn summary_of_empty_room_uses_sentinel() {
        let pending = chat("a-id", false);
        let summary = summarize("a-id", &pending, "bob", None);

        assert_eq!(summary.counterpart_id, "b-id");
        assert_eq!(summary.last_message, LastMessage::Empty);
        assert_eq!(summary.last_activity, pending.created_at);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["last_message"]["kind"], "empty");
    }

    #[test]
    fn summaries_sort_newest_first() {
        let now = Utc::now().naive_utc();
        let active = chat("a-id", true);

        let mut summaries = vec![
            summarize("a-id", &active, "bob", Some(message("old", now - Duration::hours(2)))),
            summarize("a-id", &active, "bob", Some(message("new", now))),
            summarize("a-id", &active, "bob", Some(message("mid", now - Duration::hours(1)))),
        ];
        sort_by_activity(&mut summaries);

        let order: Vec<_> = summaries
            .iter()
            .map(|s| match &s.last_message {
                LastMessage::Message { content, .. } => content.as_str(),
                LastMessage::Empty => "",
            })
            .collect();
        assert_eq!(order, vec!["new", "mid", "old"]);
    }

    #[test]
    fn feed_counts_invites() {
        let item = |kind| NotificationItem {
            id: 1,
            sender_id: String::from("b-id"),
            sender_name: String::from("bob"),
            content: String::from("hi"),
            created_at: Utc::now().naive_utc(),
            kind,
            room_id: None,
        };
        let feed = NotificationFeed::new(vec![
            item(NotificationKind::ChatInvite),
            item(NotificationKind::Activity),
            item(NotificationKind::Activity),
        ]);

        assert_eq!(feed.total, 3);
        assert_eq!(feed.chat_invites, 1);
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn invite_then_accept_leaves_one_chat_and_no_notification() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        let bob = test_user(&conn, "bob", "b@x.com");

        let invite = create_invite(&conn, &alice.id, "bob", "hi bob").unwrap();
        assert_eq!(invite.content, "hi bob");
        assert_eq!(Notification::count_between(&conn, &bob.id, &alice.id).unwrap(), 1);

        let chat_id = accept_invite(&conn, &bob.id, "alice").unwrap();
        assert_eq!(chat_id, invite.chat_id);

        let pair = ChatPair::new(&alice.id, &bob.id).unwrap();
        let chat = Chat::find_by_pair(&conn, &pair).unwrap().unwrap();
        assert!(chat.accepted);
        assert_eq!(Chat::for_user(&conn, &alice.id).unwrap().len(), 1);
        assert_eq!(Notification::count_between(&conn, &bob.id, &alice.id).unwrap(), 0);

        // Accepting twice is a conflict, dismissing afterwards is a no-op.
        assert!(matches!(
            accept_invite(&conn, &bob.id, "alice"),
            Err(AppError::Conflict(_))
        ));
        dismiss_notification(&conn, &bob.id, &alice.id).unwrap();
        assert!(Chat::find_by_pair(&conn, &pair).unwrap().unwrap().accepted);
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn repeated_invites_conflict() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        test_user(&conn, "bob", "b@x.com");

        create_invite(&conn, &alice.id, "b@x.com", "").unwrap();

        assert!(matches!(
            create_invite(&conn, &alice.id, "bob", "again"),
            Err(AppError::Conflict(_))
        ));
        let bob = User::find_by_username(&conn, "bob").unwrap().unwrap();
        assert!(matches!(
            create_invite(&conn, &bob.id, "alice", "the other way"),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            accept_invite(&conn, &alice.id, "bob"),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn stale_invite_without_chat_is_already_invited() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        let bob = test_user(&conn, "bob", "b@x.com");
        Notification::insert(&conn, &bob.id, &alice.id, "hi", NotificationKind::ChatInvite).unwrap();

        assert!(matches!(
            create_invite(&conn, &alice.id, "bob", "hi again"),
            Err(AppError::AlreadyInvited)
        ));
        // The chat insert was rolled back with the failed invite.
        let pair = ChatPair::new(&alice.id, &bob.id).unwrap();
        assert!(Chat::find_by_pair(&conn, &pair).unwrap().is_none());
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn accepting_without_an_invite_creates_nothing() {
        let conn = test_conn();
        let mallory = test_user(&conn, "mallory", "m@x.com");
        let victim = test_user(&conn, "victim", "v@x.com");

        match accept_invite(&conn, &mallory.id, "victim") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Invite not found"),
            other => panic!("expected not found, got {:?}", other),
        }

        let pair = ChatPair::new(&mallory.id, &victim.id).unwrap();
        assert!(Chat::find_by_pair(&conn, &pair).unwrap().is_none());
        assert!(list_conversations(&conn, &victim.id, None)
            .unwrap()
            .conversations
            .is_empty());
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn stored_invite_without_chat_can_be_accepted() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        let bob = test_user(&conn, "bob", "b@x.com");
        Notification::insert(&conn, &bob.id, &alice.id, "hi", NotificationKind::ChatInvite).unwrap();

        let chat_id = accept_invite(&conn, &bob.id, "alice").unwrap();

        let pair = ChatPair::new(&alice.id, &bob.id).unwrap();
        let chat = Chat::find_by_pair(&conn, &pair).unwrap().unwrap();
        assert_eq!(chat.id, chat_id);
        assert!(chat.accepted);
        assert_eq!(chat.initiator_id, alice.id);
        assert_eq!(Notification::count_between(&conn, &bob.id, &alice.id).unwrap(), 0);
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn unknown_target_is_not_found() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");

        assert!(matches!(
            create_invite(&conn, &alice.id, "nobody", "hi"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            accept_invite(&conn, &alice.id, "nobody@x.com"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            dismiss_notification(&conn, &alice.id, "missing-id"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn dismissing_an_invite_rejects_it() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        let bob = test_user(&conn, "bob", "b@x.com");

        create_invite(&conn, &alice.id, "bob", "hi").unwrap();
        dismiss_notification(&conn, &bob.id, &alice.id).unwrap();

        let pair = ChatPair::new(&alice.id, &bob.id).unwrap();
        assert!(Chat::find_by_pair(&conn, &pair).unwrap().is_none());
        assert_eq!(Notification::count_between(&conn, &bob.id, &alice.id).unwrap(), 0);

        // Nothing left to dismiss; still fine.
        dismiss_notification(&conn, &bob.id, &alice.id).unwrap();
        create_invite(&conn, &alice.id, "bob", "second try").unwrap();
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn messages_flow_into_the_room() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        let bob = test_user(&conn, "bob", "b@x.com");
        let carol = test_user(&conn, "carol", "c@x.com");

        let invite = create_invite(&conn, &alice.id, "bob", "hi").unwrap();
        assert!(matches!(
            send_message(&conn, &invite.chat_id, &alice.id, "too early"),
            Err(AppError::Conflict(_))
        ));
        accept_invite(&conn, &bob.id, "alice").unwrap();

        let page = list_conversations(&conn, &alice.id, None).unwrap();
        assert_eq!(page.conversations.len(), 1);
        assert_eq!(page.conversations[0].last_message, LastMessage::Empty);
        assert_eq!(page.conversations[0].counterpart_name, "bob");

        send_message(&conn, &invite.chat_id, &alice.id, "first").unwrap();
        send_message(&conn, &invite.chat_id, &bob.id, "second").unwrap();
        assert!(matches!(
            send_message(&conn, &invite.chat_id, &carol.id, "intruder"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            send_message(&conn, &invite.chat_id, &bob.id, "   "),
            Err(AppError::Validation(_))
        ));

        let page = list_conversations(&conn, &bob.id, Some(&invite.chat_id)).unwrap();
        let room = page.room.unwrap();
        assert_eq!(room.counterpart_id, alice.id);
        let contents: Vec<_> = room.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(matches!(
            &page.conversations[0].last_message,
            LastMessage::Message { content, .. } if content == "second"
        ));

        assert!(matches!(
            list_conversations(&conn, &carol.id, Some(&invite.chat_id)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    #[ignore = "needs a migrated postgres at DATABASE_URL"]
    fn notification_feed_names_the_sender() {
        let conn = test_conn();
        let alice = test_user(&conn, "alice", "a@x.com");
        let bob = test_user(&conn, "bob", "b@x.com");

        let invite = create_invite(&conn, &alice.id, "bob", "hi bob").unwrap();
        let feed = list_notifications(&conn, &bob.id).unwrap();

        assert_eq!(feed.total, 1);
        assert_eq!(feed.chat_invites, 1);
        assert_eq!(feed.items[0].sender_name, "alice");
        assert_eq!(feed.items[0].content, "hi bob");
        assert_eq!(feed.items[0].room_id.as_deref(), Some(invite.chat_id.as_str()));
    }
}

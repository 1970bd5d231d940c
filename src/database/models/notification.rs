use chrono::{NaiveDateTime, Utc};
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use crate::{app::AppError, schema::notifications};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A pending request to open a chat.
    ChatInvite,
    /// Anything else worth telling the user about, e.g. a comment on their post.
    Activity,
}

impl NotificationKind {
    fn is_chat(self) -> bool {
        matches!(self, NotificationKind::ChatInvite)
    }
}

#[derive(Debug, Queryable, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub recipient_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub is_chat: bool,
}

#[derive(Insertable)]
#[table_name = "notifications"]
struct NotificationInsert<'a> {
    pub recipient_id: &'a str,
    pub sender_id: &'a str,
    pub content: &'a str,
    pub created_at: NaiveDateTime,
    pub is_chat: bool,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        if self.is_chat {
            NotificationKind::ChatInvite
        } else {
            NotificationKind::Activity
        }
    }

    /// Stores a notification for `recipient`.
    ///
    /// Only one chat invite may exist per (recipient, sender); a second one is
    /// skipped and `false` is returned.
    pub fn insert(
        conn: &PgConnection,
        recipient: &str,
        sender: &str,
        body: &str,
        kind: NotificationKind,
    ) -> Result<bool, AppError> {
        let to_insert = NotificationInsert {
            recipient_id: recipient,
            sender_id: sender,
            content: body,
            created_at: Utc::now().naive_utc(),
            is_chat: kind.is_chat(),
        };

        let inserted = diesel::insert_into(notifications::table)
            .values(&to_insert)
            .on_conflict_do_nothing()
            .execute(conn)?;

        Ok(inserted == 1)
    }

    /// Whether `sender` has a chat invite waiting for `recipient`.
    pub fn invite_exists(conn: &PgConnection, recipient: &str, sender: &str) -> Result<bool, AppError> {
        use crate::schema::notifications::dsl::*;

        let found: i64 = notifications
            .filter(recipient_id.eq(recipient))
            .filter(sender_id.eq(sender))
            .filter(is_chat.eq(true))
            .count()
            .get_result(conn)?;

        Ok(found > 0)
    }

    /// Removes the chat invite from `sender` to `recipient`, if there is one.
    pub fn delete_invite(conn: &PgConnection, recipient: &str, sender: &str) -> Result<usize, AppError> {
        use crate::schema::notifications::dsl::*;

        Ok(diesel::delete(
            notifications
                .filter(recipient_id.eq(recipient))
                .filter(sender_id.eq(sender))
                .filter(is_chat.eq(true)),
        )
        .execute(conn)?)
    }

    /// Removes every notification `sender` left for `recipient`.
    pub fn delete_between(conn: &PgConnection, recipient: &str, sender: &str) -> Result<usize, AppError> {
        use crate::schema::notifications::dsl::*;

        Ok(diesel::delete(
            notifications
                .filter(recipient_id.eq(recipient))
                .filter(sender_id.eq(sender)),
        )
        .execute(conn)?)
    }

    /// Notifications of `recipient`, newest first.
    pub fn for_recipient(conn: &PgConnection, recipient: &str) -> Result<Vec<Notification>, AppError> {
        use crate::schema::notifications::dsl::*;

        Ok(notifications
            .filter(recipient_id.eq(recipient))
            .order((created_at.desc(), id.desc()))
            .load::<Notification>(conn)?)
    }

    #[cfg(test)]
    pub fn count_between(conn: &PgConnection, recipient: &str, sender: &str) -> Result<i64, AppError> {
        use crate::schema::notifications::dsl::*;

        Ok(notifications
            .filter(recipient_id.eq(recipient))
            .filter(sender_id.eq(sender))
            .count()
            .get_result(conn)?)
    }
}

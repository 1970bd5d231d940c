use chrono::{NaiveDateTime, Utc};
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use crate::{app::AppError, schema::chats};

/// The two participants of a chat, stored in sorted order so that
/// `{a, b}` and `{b, a}` land on the same unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPair {
    low: String,
    high: String,
}

impl ChatPair {
    pub fn new(a: &str, b: &str) -> Result<Self, AppError> {
        if a == b {
            return Err(AppError::validation("You can't start a chat with yourself"));
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            low: low.to_string(),
            high: high.to_string(),
        })
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }
}

#[derive(Debug, Queryable, Clone, Serialize, PartialEq)]
pub struct Chat {
    pub id: String,
    pub user_low: String,
    pub user_high: String,
    pub initiator_id: String,
    pub accepted: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "chats"]
struct ChatInsert<'a> {
    pub id: &'a str,
    pub user_low: &'a str,
    pub user_high: &'a str,
    pub initiator_id: &'a str,
    pub accepted: bool,
    pub created_at: NaiveDateTime,
}

impl Chat {
    pub fn has_participant(&self, user: &str) -> bool {
        self.user_low == user || self.user_high == user
    }

    /// The other participant, seen from `user`.
    pub fn counterpart(&self, user: &str) -> &str {
        if self.user_low == user {
            &self.user_high
        } else {
            &self.user_low
        }
    }

    /// Inserts the chat unless the pair already has one. Returns whether a row was written.
    pub fn insert_if_absent(
        conn: &PgConnection,
        chat_id: &str,
        pair: &ChatPair,
        initiator: &str,
        is_accepted: bool,
    ) -> Result<bool, AppError> {
        let to_insert = ChatInsert {
            id: chat_id,
            user_low: pair.low(),
            user_high: pair.high(),
            initiator_id: initiator,
            accepted: is_accepted,
            created_at: Utc::now().naive_utc(),
        };

        let inserted = diesel::insert_into(chats::table)
            .values(&to_insert)
            .on_conflict_do_nothing()
            .execute(conn)?;

        Ok(inserted == 1)
    }

    pub fn find_by_id(conn: &PgConnection, chat_id: &str) -> Result<Option<Chat>, AppError> {
        use crate::schema::chats::dsl::*;

        Ok(chats.find(chat_id).first::<Chat>(conn).optional()?)
    }

    pub fn find_by_pair(conn: &PgConnection, pair: &ChatPair) -> Result<Option<Chat>, AppError> {
        use crate::schema::chats::dsl::*;

        Ok(chats
            .filter(user_low.eq(pair.low()))
            .filter(user_high.eq(pair.high()))
            .first::<Chat>(conn)
            .optional()?)
    }

    /// Every chat `user` takes part in, pending or not.
    pub fn for_user(conn: &PgConnection, user: &str) -> Result<Vec<Chat>, AppError> {
        use crate::schema::chats::dsl::*;

        Ok(chats
            .filter(user_low.eq(user).or(user_high.eq(user)))
            .order(created_at.asc())
            .load::<Chat>(conn)?)
    }

    /// Flips a pending chat to accepted. Returns false if it was not pending anymore.
    pub fn mark_accepted(conn: &PgConnection, chat_id: &str) -> Result<bool, AppError> {
        use crate::schema::chats::dsl::*;

        let updated = diesel::update(chats.filter(id.eq(chat_id)).filter(accepted.eq(false)))
            .set(accepted.eq(true))
            .execute(conn)?;

        Ok(updated == 1)
    }

    /// Drops the pair's chat if it is still pending and was started by `initiator`.
    pub fn delete_pending(
        conn: &PgConnection,
        pair: &ChatPair,
        initiator: &str,
    ) -> Result<usize, AppError> {
        use crate::schema::chats::dsl::*;

        Ok(diesel::delete(
            chats
                .filter(user_low.eq(pair.low()))
                .filter(user_high.eq(pair.high()))
                .filter(initiator_id.eq(initiator))
                .filter(accepted.eq(false)),
        )
        .execute(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pair_is_order_independent() {
        let ab = ChatPair::new("a-id", "b-id").unwrap();
        let ba = ChatPair::new("b-id", "a-id").unwrap();

        assert_eq!(ab, ba);
        assert_eq!(ab.low(), "a-id");
        assert_eq!(ab.high(), "b-id");
    }

    #[test]
    fn pair_rejects_self_chat() {
        let err = ChatPair::new("same", "same").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn counterpart_is_the_other_side() {
        let chat = Chat {
            id: String::from("room"),
            user_low: String::from("a-id"),
            user_high: String::from("b-id"),
            initiator_id: String::from("a-id"),
            accepted: false,
            created_at: Utc::now().naive_utc(),
        };

        assert_eq!(chat.counterpart("a-id"), "b-id");
        assert_eq!(chat.counterpart("b-id"), "a-id");
        assert!(chat.has_participant("b-id"));
        assert!(!chat.has_participant("c-id"));
    }
}

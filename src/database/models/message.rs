use chrono::{NaiveDateTime, Utc};
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use crate::{
    app::AppError,
    schema::{chat_messages, rooms},
};

/// The message container tied to a chat; its id is the chat id.
pub struct Room;

#[derive(Insertable)]
#[table_name = "rooms"]
struct RoomInsert<'a> {
    pub room_id: &'a str,
    pub created_at: NaiveDateTime,
}

impl Room {
    /// Creates the empty room placeholder for a chat.
    pub fn create(conn: &PgConnection, chat_id: &str) -> Result<(), AppError> {
        let room = RoomInsert {
            room_id: chat_id,
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(rooms::table)
            .values(&room)
            .on_conflict_do_nothing()
            .execute(conn)?;
        Ok(())
    }
}

#[derive(Debug, Queryable, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub id: i32,
    pub room_id: String,
    pub sender_id: String,
    /// Sender display name when the message was sent.
    pub sender_name: String,
    pub content: String,
    pub sent_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "chat_messages"]
struct ChatMessageInsert<'a> {
    pub room_id: &'a str,
    pub sender_id: &'a str,
    pub sender_name: &'a str,
    pub content: &'a str,
    pub sent_at: NaiveDateTime,
}

impl ChatMessage {
    pub fn new(
        conn: &PgConnection,
        room: &str,
        sender: &str,
        sender_display: &str,
        body: &str,
    ) -> Result<ChatMessage, AppError> {
        let to_insert = ChatMessageInsert {
            room_id: room,
            sender_id: sender,
            sender_name: sender_display,
            content: body,
            sent_at: Utc::now().naive_utc(),
        };

        Ok(diesel::insert_into(chat_messages::table)
            .values(&to_insert)
            .get_result(conn)?)
    }

    /// Newest message of the room, if any.
    pub fn latest(conn: &PgConnection, room: &str) -> Result<Option<ChatMessage>, AppError> {
        use crate::schema::chat_messages::dsl::*;

        Ok(chat_messages
            .filter(room_id.eq(room))
            .order((sent_at.desc(), id.desc()))
            .first::<ChatMessage>(conn)
            .optional()?)
    }

    /// Full room history, oldest first.
    pub fn history(conn: &PgConnection, room: &str) -> Result<Vec<ChatMessage>, AppError> {
        use crate::schema::chat_messages::dsl::*;

        Ok(chat_messages
            .filter(room_id.eq(room))
            .order((sent_at.asc(), id.asc()))
            .load::<ChatMessage>(conn)?)
    }
}

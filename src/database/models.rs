pub mod blog;
pub mod chat;
pub mod comment;
pub mod like;
pub mod message;
pub mod notification;
pub mod user;

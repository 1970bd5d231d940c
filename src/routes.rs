pub mod blog;
pub mod chat;
pub mod comment;
pub mod notification;
pub mod token;
pub mod user;

use actix_web::{error::Error as ActixError, web};

use crate::app::AppError;

fn bad_payload(err: impl std::fmt::Display) -> ActixError {
    AppError::validation(format!("Invalid request: {}", err)).into()
}

/// Extractor settings so malformed bodies get the same JSON error shape as everything else.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| bad_payload(err))
}

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| bad_payload(err))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| bad_payload(err))
}

/// Registers every route of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(form_config())
        .app_data(query_config())
        //User routes
        .service(user::register)
        .service(user::login)
        .service(user::logout)
        .service(user::settings)
        .service(user::update_settings)
        .service(user::public_profile)
        //Token routes
        .service(token::refresh_token)
        //Blog routes
        .service(blog::home)
        .service(blog::profile)
        .service(blog::save_blog)
        .service(blog::delete_blog)
        .service(blog::update_published)
        .service(blog::view_blog)
        .service(blog::update_like)
        //Comment routes
        .service(comment::add_comment)
        //Chat routes
        .service(chat::new_chat)
        .service(chat::accept)
        .service(chat::chat_page)
        .service(chat::send_message)
        //Notification routes
        .service(notification::delete_notification)
        .service(notification::notifications);
}

use diesel::PgConnection;
use serde::Deserialize;

use crate::{
    app::AppError,
    auth::password::{hash_password, verify_password},
    database::models::user::{User, UserChanges},
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Settings form; fields left out or blank are not touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn validate_email(email: &str) -> Result<(), AppError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::validation("Invalid email address")),
    }
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Creates an account and returns it. Email and username must both be unused.
pub fn register(conn: &PgConnection, form: &Registration, cost: u32) -> Result<User, AppError> {
    let email = form.email.trim();
    let username = form.username.trim();
    let password = form.password.as_str();

    validate_email(email)?;
    if username.is_empty() {
        return Err(AppError::validation("Username not specified"));
    }
    if username.contains('@') {
        return Err(AppError::validation("Username can't contain '@'"));
    }
    validate_password(password)?;

    if User::find_by_email(conn, email)?.is_some() {
        return Err(AppError::conflict("User already exists"));
    }
    if User::find_by_username(conn, username)?.is_some() {
        return Err(AppError::conflict("Username already taken"));
    }

    let hash = hash_password(password, cost)?;
    let name = non_blank(form.name.as_ref());
    let user = User::new(conn, username, email, &hash, name.as_deref())?;

    log::info!("registered user {}", user.id);
    Ok(user)
}

/// Checks the credentials; unknown email and wrong password look the same to the caller.
pub fn authenticate(conn: &PgConnection, email: &str, password: &str) -> Result<User, AppError> {
    let user = User::find_by_email(conn, email.trim())?.ok_or(AppError::Auth)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Auth);
    }
    Ok(user)
}

pub fn update_settings(
    conn: &PgConnection,
    user_id: &str,
    update: &SettingsUpdate,
    cost: u32,
) -> Result<User, AppError> {
    let user = super::session_account(conn, user_id)?;

    let mut changes = UserChanges {
        name: non_blank(update.name.as_ref()),
        username: non_blank(update.username.as_ref()),
        email: non_blank(update.email.as_ref()),
        password_hash: None,
    };

    if let Some(email) = &changes.email {
        validate_email(email)?;
    }
    if let Some(username) = &changes.username {
        if username.contains('@') {
            return Err(AppError::validation("Username can't contain '@'"));
        }
    }
    // Passwords are taken as typed; only an all-blank field counts as absent.
    if let Some(password) = update.password.as_deref().filter(|p| !p.trim().is_empty()) {
        if !verify_password(password, &user.password_hash)? {
            validate_password(password)?;
            changes.password_hash = Some(hash_password(password, cost)?);
        }
    }

    User::update(conn, &user.id, &changes)
}

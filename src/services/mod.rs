pub mod content;
pub mod conversation;
pub mod identity;

use diesel::PgConnection;

use crate::{app::AppError, database::models::user::User};

/// Loads the account behind a session. A token that outlived its user counts as logged out.
pub fn session_account(conn: &PgConnection, user_id: &str) -> Result<User, AppError> {
    User::find_by_id(conn, user_id)?.ok_or(AppError::Unauthorized)
}

#[cfg(test)]
pub mod test_support {
    use std::env;

    use diesel::{Connection, PgConnection};

    use crate::{auth::password::hash_password, database::models::user::User};

    /// A connection whose work is rolled back when it is dropped.
    pub fn test_conn() -> PgConnection {
        dotenv::dotenv().ok();
        let url = env::var("DATABASE_URL").expect("DATABASE_URL must point at a migrated database");
        let conn = PgConnection::establish(&url).expect("could not connect to DATABASE_URL");
        conn.begin_test_transaction().unwrap();
        conn
    }

    pub fn test_user(conn: &PgConnection, username: &str, email: &str) -> User {
        let hash = hash_password("Secret123!", 4).unwrap();
        User::new(conn, username, email, &hash, None).unwrap()
    }
}

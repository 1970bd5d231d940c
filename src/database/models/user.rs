use chrono::{NaiveDateTime, Utc};
use diesel::{dsl::exists, prelude::*, PgConnection};
use serde::Serialize;

use crate::{app::AppError, schema::users};

#[derive(Debug, Queryable, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
struct UserInsert<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: NaiveDateTime,
}

/// Fields a user can change from the settings page. `None` leaves the column untouched.
#[derive(AsChangeset, Default, Debug, Clone, PartialEq)]
#[table_name = "users"]
pub struct UserChanges {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
    }
}

impl User {
    /// Name shown next to posts and messages: the optional display name, else the username.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// Pushes a new user in the database. The password must already be hashed.
    ///
    /// # Example
    /// ```
    /// let user = User::new(&conn, "alice", "a@x.com", &hash, None)?;
    /// ```
    pub fn new(
        conn: &PgConnection,
        uname: &str,
        email_in: &str,
        hash: &str,
        name_in: Option<&str>,
    ) -> Result<User, AppError> {
        let new_id = uuid::Uuid::new_v4().to_string();
        let to_insert = UserInsert {
            id: &new_id,
            name: name_in,
            username: uname,
            email: email_in,
            password_hash: hash,
            created_at: Utc::now().naive_utc(),
        };

        let user = diesel::insert_into(users::table)
            .values(&to_insert)
            .get_result(conn)?;

        Ok(user)
    }

    /** Returns an user with the id specified */
    pub fn find_by_id(conn: &PgConnection, user_id: &str) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;

        Ok(users.find(user_id).first::<User>(conn).optional()?)
    }

    pub fn find_by_email(conn: &PgConnection, email_in: &str) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;

        Ok(users
            .filter(email.eq(email_in))
            .first::<User>(conn)
            .optional()?)
    }

    /// Returns the user with the specified username, `None` if there is none.
    pub fn find_by_username(conn: &PgConnection, uname: &str) -> Result<Option<User>, AppError> {
        use crate::schema::users::dsl::*;

        Ok(users
            .filter(username.eq(uname))
            .first::<User>(conn)
            .optional()?)
    }

    pub fn find_many(conn: &PgConnection, ids: &[String]) -> Result<Vec<User>, AppError> {
        use crate::schema::users::dsl::*;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(users.filter(id.eq_any(ids.to_vec())).load::<User>(conn)?)
    }

    pub fn exists(conn: &PgConnection, user_id: &str) -> Result<bool, AppError> {
        use crate::schema::users::dsl::*;

        Ok(diesel::select(exists(users.filter(id.eq(user_id)))).get_result(conn)?)
    }

    pub fn update(conn: &PgConnection, user_id: &str, changes: &UserChanges) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;

        if changes.is_empty() {
            return users.find(user_id).first::<User>(conn).map_err(AppError::from);
        }

        Ok(diesel::update(users.find(user_id))
            .set(changes)
            .get_result(conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> User {
        User {
            id: String::from("u1"),
            name: name.map(String::from),
            username: String::from("alice"),
            email: String::from("a@x.com"),
            password_hash: String::new(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn display_name_prefers_name() {
        assert_eq!(user(Some("Alice A.")).display_name(), "Alice A.");
        assert_eq!(user(None).display_name(), "alice");
        assert_eq!(user(Some("  ")).display_name(), "alice");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let json = serde_json::to_value(user(None)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn empty_changes() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            name: Some(String::from("Al")),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}

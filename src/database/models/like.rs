use diesel::{prelude::*, PgConnection};

use crate::{app::AppError, schema::liked_blogs};

#[derive(Insertable, Queryable, Debug, Clone, PartialEq)]
#[table_name = "liked_blogs"]
pub struct Like {
    pub post_id: i32,
    pub user_id: String,
    pub liked: bool,
}

impl Like {
    /// Writes the like state of `user` for the post, inserting the row or updating it in place.
    pub fn upsert(conn: &PgConnection, post: i32, user: &str, value: bool) -> Result<Like, AppError> {
        use crate::schema::liked_blogs::dsl::*;

        let like = Like {
            post_id: post,
            user_id: user.to_string(),
            liked: value,
        };

        Ok(diesel::insert_into(liked_blogs)
            .values(&like)
            .on_conflict((post_id, user_id))
            .do_update()
            .set(liked.eq(value))
            .get_result(conn)?)
    }

    pub fn find(conn: &PgConnection, post: i32, user: &str) -> Result<Option<Like>, AppError> {
        use crate::schema::liked_blogs::dsl::*;

        Ok(liked_blogs
            .find((post, user))
            .first::<Like>(conn)
            .optional()?)
    }

    #[cfg(test)]
    pub fn count_rows(conn: &PgConnection, post: i32, user: &str) -> Result<i64, AppError> {
        use crate::schema::liked_blogs::dsl::*;

        Ok(liked_blogs
            .filter(post_id.eq(post))
            .filter(user_id.eq(user))
            .count()
            .get_result(conn)?)
    }

    /// Number of users currently liking the post.
    pub fn count_liked(conn: &PgConnection, post: i32) -> Result<i64, AppError> {
        use crate::schema::liked_blogs::dsl::*;

        Ok(liked_blogs
            .filter(post_id.eq(post))
            .filter(liked.eq(true))
            .count()
            .get_result(conn)?)
    }
}

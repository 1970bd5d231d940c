use chrono::{NaiveDateTime, Utc};
use diesel::{prelude::*, PgConnection};
use serde::Serialize;

use super::user::User;
use crate::{app::AppError, schema::comments};

#[derive(Queryable, Clone, Serialize, Debug, PartialEq)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub user_id: String,
    pub username: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
struct CommentInsert<'a> {
    pub post_id: i32,
    pub user_id: &'a str,
    pub username: &'a str,
    pub body: &'a str,
    pub created_at: NaiveDateTime,
}

impl Comment {
    /** Creates a comment on the blog specified */
    pub fn new(
        conn: &PgConnection,
        blog_id: i32,
        author: &User,
        comment_body: &str,
    ) -> Result<Comment, AppError> {
        let record = CommentInsert {
            post_id: blog_id,
            user_id: &author.id,
            username: author.display_name(),
            body: comment_body,
            created_at: Utc::now().naive_utc(),
        };

        Ok(diesel::insert_into(comments::table)
            .values(&record)
            .get_result(conn)?)
    }

    /** Returns all comments posted in a blog, oldest first */
    pub fn find_by_blog(conn: &PgConnection, blog_id: i32) -> Result<Vec<Comment>, AppError> {
        use crate::schema::comments::dsl::*;

        Ok(comments
            .filter(post_id.eq(blog_id))
            .order((created_at.asc(), id.asc()))
            .load::<Comment>(conn)?)
    }
}

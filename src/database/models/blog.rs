use chrono::{NaiveDateTime, Utc};
use diesel::{dsl::sql, prelude::*, sql_types::Double, PgConnection};
use serde::Serialize;

use super::user::User;
use crate::{
    app::AppError,
    schema::{blog_posts, liked_blogs},
};

#[derive(Debug, PartialEq, Queryable, Clone, Serialize)]
pub struct Blog {
    pub id: i32,
    pub user_id: Option<String>,
    /// Author display name at the time of posting; renames do not rewrite it.
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub image_path: Option<String>,
    pub published: bool,
    pub likes: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "blog_posts"]
struct BlogInsert<'a> {
    pub user_id: Option<&'a str>,
    pub author_name: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub published: bool,
    pub likes: i32,
    pub created_at: NaiveDateTime,
}

/// The two ways a request may point at a post.
#[derive(Debug, Clone, PartialEq)]
pub enum PostRef {
    Id(i32),
    Title(String),
}

impl Blog {
    pub fn new(
        conn: &PgConnection,
        creator: &User,
        title_in: &str,
        content_in: &str,
    ) -> Result<Blog, AppError> {
        let (title_in, content_in) = (title_in.trim(), content_in.trim());
        if title_in.is_empty() || content_in.is_empty() {
            return Err(AppError::validation("Missing blog title or content"));
        }

        let to_insert = BlogInsert {
            user_id: Some(&creator.id),
            author_name: creator.display_name(),
            title: title_in,
            content: content_in,
            published: false,
            likes: 0,
            created_at: Utc::now().naive_utc(),
        };

        Ok(diesel::insert_into(blog_posts::table)
            .values(&to_insert)
            .get_result(conn)?)
    }

    pub fn get_by_id(conn: &PgConnection, blog_id: i32) -> Result<Option<Blog>, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts.find(blog_id).first::<Blog>(conn).optional()?)
    }

    pub fn get_by_title(conn: &PgConnection, title_in: &str) -> Result<Option<Blog>, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts
            .filter(title.eq(title_in))
            .first::<Blog>(conn)
            .optional()?)
    }

    pub fn get_published_by_title(
        conn: &PgConnection,
        title_in: &str,
    ) -> Result<Option<Blog>, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts
            .filter(title.eq(title_in))
            .filter(published.eq(true))
            .first::<Blog>(conn)
            .optional()?)
    }

    pub fn get_by_ref(conn: &PgConnection, post: &PostRef) -> Result<Option<Blog>, AppError> {
        match post {
            PostRef::Id(blog_id) => Blog::get_by_id(conn, *blog_id),
            PostRef::Title(title_in) => Blog::get_by_title(conn, title_in),
        }
    }

    /// Every post of the user, oldest first.
    pub fn get_by_creator_id(conn: &PgConnection, creator: &str) -> Result<Vec<Blog>, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts
            .filter(user_id.eq(creator))
            .order((created_at.asc(), id.asc()))
            .load::<Blog>(conn)?)
    }

    pub fn get_published_by_creator_id(
        conn: &PgConnection,
        creator: &str,
    ) -> Result<Vec<Blog>, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts
            .filter(user_id.eq(creator))
            .filter(published.eq(true))
            .order((created_at.asc(), id.asc()))
            .load::<Blog>(conn)?)
    }

    pub fn count_by_creator_id(conn: &PgConnection, creator: &str) -> Result<i64, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts
            .filter(user_id.eq(creator))
            .count()
            .get_result(conn)?)
    }

    /// Up to `limit` published posts in random order.
    pub fn random_published(conn: &PgConnection, limit: i64) -> Result<Vec<Blog>, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(blog_posts
            .filter(published.eq(true))
            .order(sql::<Double>("RANDOM()"))
            .limit(limit)
            .load::<Blog>(conn)?)
    }

    /// Posts the user currently likes.
    pub fn get_liked_by(conn: &PgConnection, liker: &str) -> Result<Vec<Blog>, AppError> {
        let liked_ids = liked_blogs::table
            .select(liked_blogs::post_id)
            .filter(liked_blogs::user_id.eq(liker))
            .filter(liked_blogs::liked.eq(true));

        Ok(blog_posts::table
            .filter(blog_posts::id.eq_any(liked_ids))
            .order(blog_posts::id.asc())
            .load::<Blog>(conn)?)
    }

    /// Sets the publish flag on a post owned by `owner`. Returns the number of rows touched.
    pub fn set_published(
        conn: &PgConnection,
        post: &PostRef,
        owner: &str,
        value: bool,
    ) -> Result<usize, AppError> {
        use crate::schema::blog_posts::dsl::*;

        let updated = match post {
            PostRef::Id(blog_id) => diesel::update(
                blog_posts.filter(id.eq(*blog_id)).filter(user_id.eq(owner)),
            )
            .set(published.eq(value))
            .execute(conn)?,
            PostRef::Title(title_in) => diesel::update(
                blog_posts
                    .filter(title.eq(title_in.as_str()))
                    .filter(user_id.eq(owner)),
            )
            .set(published.eq(value))
            .execute(conn)?,
        };

        Ok(updated)
    }

    pub fn set_likes(conn: &PgConnection, blog_id: i32, count: i32) -> Result<(), AppError> {
        use crate::schema::blog_posts::dsl::*;

        diesel::update(blog_posts.find(blog_id))
            .set(likes.eq(count))
            .execute(conn)?;
        Ok(())
    }

    /// Deletes a post owned by `owner`; comments and likes go with it.
    pub fn delete_owned(conn: &PgConnection, blog_id: i32, owner: &str) -> Result<usize, AppError> {
        use crate::schema::blog_posts::dsl::*;

        Ok(
            diesel::delete(blog_posts.filter(id.eq(blog_id)).filter(user_id.eq(owner)))
                .execute(conn)?,
        )
    }
}

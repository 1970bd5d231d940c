use diesel::{Connection, PgConnection};
use serde::Serialize;

use super::{
    conversation::{list_notifications, NotificationFeed},
    session_account,
};
use crate::{
    app::AppError,
    database::models::{
        blog::{Blog, PostRef},
        comment::Comment,
        like::Like,
        notification::{Notification, NotificationKind},
        user::User,
    },
};

/// How many published posts the home page samples.
pub const HOME_SAMPLE_SIZE: i64 = 5;

pub fn create_post(
    conn: &PgConnection,
    author: &str,
    title: &str,
    content: &str,
) -> Result<Blog, AppError> {
    let account = session_account(conn, author)?;
    let blog = Blog::new(conn, &account, title, content)?;

    log::info!("user {} created post {} ({})", author, blog.id, blog.title);
    Ok(blog)
}

/// Turns a write that touched no rows into the right error.
fn missing_or_forbidden(conn: &PgConnection, post: &PostRef) -> AppError {
    match Blog::get_by_ref(conn, post) {
        Ok(Some(_)) => AppError::Forbidden,
        Ok(None) => AppError::not_found("Blog not found"),
        Err(err) => err,
    }
}

pub fn toggle_publish(
    conn: &PgConnection,
    owner: &str,
    post: &PostRef,
    published: bool,
) -> Result<(), AppError> {
    if Blog::set_published(conn, post, owner, published)? == 0 {
        return Err(missing_or_forbidden(conn, post));
    }
    Ok(())
}

pub fn delete_post(conn: &PgConnection, owner: &str, post_id: i32) -> Result<(), AppError> {
    if Blog::delete_owned(conn, post_id, owner)? == 0 {
        return Err(missing_or_forbidden(conn, &PostRef::Id(post_id)));
    }

    log::info!("user {} deleted post {}", owner, post_id);
    Ok(())
}

/// Reads the `action` field of a like request.
pub fn parse_like_action(action: &str) -> Result<bool, AppError> {
    match action.trim() {
        "like" => Ok(true),
        "unlike" => Ok(false),
        _ => Err(AppError::validation("Invalid action")),
    }
}

/// Narrows a counted like total to the column type of `blogs.likes`.
fn like_total(count: i64) -> Result<i32, AppError> {
    i32::try_from(count).map_err(|err| AppError::internal("like count", err))
}

/// Records whether `user` likes the post and returns the post's new like count.
pub fn like(conn: &PgConnection, title: &str, user: &str, liked: bool) -> Result<i32, AppError> {
    conn.transaction::<_, AppError, _>(|| {
        let blog = Blog::get_by_title(conn, title)?
            .ok_or_else(|| AppError::not_found("Blog not found"))?;

        Like::upsert(conn, blog.id, user, liked)?;
        let count = like_total(Like::count_liked(conn, blog.id)?)?;
        Blog::set_likes(conn, blog.id, count)?;
        Ok(count)
    })
}

pub fn comment(conn: &PgConnection, title: &str, user: &str, text: &str) -> Result<Comment, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Comment can't be empty"));
    }

    let blog = Blog::get_by_title(conn, title)?.ok_or_else(|| AppError::not_found("Blog not found"))?;
    let account = session_account(conn, user)?;

    conn.transaction::<_, AppError, _>(|| {
        let comment = Comment::new(conn, blog.id, &account, text)?;

        if let Some(owner) = blog.user_id.as_deref().filter(|owner| *owner != user) {
            let note = format!("{} commented on \"{}\"", account.display_name(), blog.title);
            Notification::insert(conn, owner, user, &note, NotificationKind::Activity)?;
        }
        Ok(comment)
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HomeView {
    pub name: String,
    pub posts: Vec<Blog>,
    pub notifications: NotificationFeed,
}

pub fn home(conn: &PgConnection, user: &str) -> Result<HomeView, AppError> {
    let account = session_account(conn, user)?;

    Ok(HomeView {
        name: account.display_name().to_string(),
        posts: Blog::random_published(conn, HOME_SAMPLE_SIZE)?,
        notifications: list_notifications(conn, user)?,
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileView {
    pub user: User,
    pub posts: Vec<Blog>,
    pub published: Vec<Blog>,
    pub liked: Vec<Blog>,
    pub post_count: i64,
}

pub fn profile(conn: &PgConnection, user: &str) -> Result<ProfileView, AppError> {
    let account = session_account(conn, user)?;

    Ok(ProfileView {
        posts: Blog::get_by_creator_id(conn, user)?,
        published: Blog::get_published_by_creator_id(conn, user)?,
        liked: Blog::get_liked_by(conn, user)?,
        post_count: Blog::count_by_creator_id(conn, user)?,
        user: account,
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostView {
    pub post: Blog,
    pub comments: Vec<Comment>,
    /// Whether the viewer currently likes the post.
    pub liked: bool,
}

/// A published post with its comments, as seen by `viewer`.
pub fn view_post(conn: &PgConnection, title: &str, viewer: &str) -> Result<PostView, AppError> {
    let post = Blog::get_published_by_title(conn, title)?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    let liked = Like::find(conn, post.id, viewer)?
        .map(|l| l.liked)
        .unwrap_or(false);

    Ok(PostView {
        comments: Comment::find_by_blog(conn, post.id)?,
        post,
        liked,
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicProfile {
    pub name: String,
    pub username: String,
    pub email: String,
    pub posts: Vec<Blog>,
}

pub fn public_profile(conn: &PgConnection, user_id: &str) -> Result<PublicProfile, AppError> {
    let account = User::find_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(PublicProfile {
        name: account.display_name().to_string(),
        posts: Blog::get_published_by_creator_id(conn, &account.id)?,
        username: account.username,
        email: account.email,
    })
}

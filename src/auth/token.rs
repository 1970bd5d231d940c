use r2d2_redis::redis::{self, Commands};
use rand::distributions::{Alphanumeric, DistString};

use crate::app::AppError;

const TOKEN_LEN: usize = 32;
const KEY_PREFIX: &str = "session:";

/// Login tokens kept in redis, mapping a random string to the user id.
pub struct Token {}

impl Token {
    fn key(token: &str) -> String {
        format!("{}{}", KEY_PREFIX, token)
    }

    fn generate() -> String {
        Alphanumeric.sample_string(&mut rand::thread_rng(), TOKEN_LEN)
    }

    /// Issues a token for `user_id` that expires after `ttl_secs`.
    pub fn new(redis_conn: &mut redis::Connection, user_id: &str, ttl_secs: usize) -> Result<String, AppError> {
        let token = Token::generate();
        redis_conn.set_ex::<_, _, ()>(Token::key(&token), user_id, ttl_secs)?;

        Ok(token)
    }

    /// Returns the user id behind the token, `None` once it expired or was deleted.
    pub fn find(redis_conn: &mut redis::Connection, token: &str) -> Result<Option<String>, AppError> {
        Ok(redis_conn.get(Token::key(token))?)
    }

    pub fn delete(redis_conn: &mut redis::Connection, token: &str) -> Result<(), AppError> {
        redis_conn.del::<_, ()>(Token::key(token))?;
        Ok(())
    }

    /// Pushes the expiry of a live token forward. Returns false if the token is gone.
    pub fn refresh(redis_conn: &mut redis::Connection, token: &str, ttl_secs: usize) -> Result<bool, AppError> {
        Ok(redis_conn.expire(Token::key(token), ttl_secs)?)
    }
}

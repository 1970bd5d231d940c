use std::time::Duration;

use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use r2d2_redis::RedisConnectionManager;

use crate::app::{AppError, Config, PgPool, RedisPool};

/// Returns a pool of connections to the postgres database named by `DATABASE_URL`.
///
/// With `lazy` set the pool is built without opening a connection, which lets
/// handlers that never reach the database run without one.
///
/// # Example
/// ```
/// let config = Config::from_env()?;
/// let pool = psql_connect_to_db(&config, false)?;
/// let conn = pool.get()?;
/// ```
pub fn psql_connect_to_db(config: &Config, lazy: bool) -> Result<PgPool, AppError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.clone());
    let builder = Pool::builder()
        .max_size(config.db_pool_size)
        .connection_timeout(Duration::from_secs(5));

    if lazy {
        return Ok(builder.min_idle(Some(0)).build_unchecked(manager));
    }

    builder
        .build(manager)
        .map_err(|err| AppError::internal("connecting to postgres", err))
}

/// Returns a pool of connections to the redis instance holding login tokens.
pub fn redis_connect_to_db(config: &Config, lazy: bool) -> Result<RedisPool, AppError> {
    let manager = RedisConnectionManager::new(config.redis_url.as_str())
        .map_err(|err| AppError::internal("parsing REDIS_URL", err))?;
    let builder = r2d2_redis::r2d2::Pool::builder()
        .max_size(config.db_pool_size)
        .connection_timeout(Duration::from_secs(5));

    if lazy {
        return Ok(builder.min_idle(Some(0)).build_unchecked(manager));
    }

    builder
        .build(manager)
        .map_err(|err| AppError::internal("connecting to redis", err))
}

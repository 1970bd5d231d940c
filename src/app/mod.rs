pub mod config;

use std::sync::Arc;

use actix_web::{error::BlockingError, http::StatusCode, web, HttpResponse, ResponseError};
use diesel::{
    r2d2::{ConnectionManager, Pool, PoolError},
    result::{DatabaseErrorKind, Error as DieselError},
    PgConnection,
};
use r2d2_redis::{redis, RedisConnectionManager};
use serde::Serialize;
use thiserror::Error;

use crate::database::db_utils::{psql_connect_to_db, redis_connect_to_db};
pub use config::Config;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
pub type RedisPool = r2d2_redis::r2d2::Pool<RedisConnectionManager>;

/** Used for storing the database connections when handling requests */
#[derive(Clone)]
pub struct AppState {
    pub psql_pool: Arc<PgPool>,
    pub redis_pool: Arc<RedisPool>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds both pools and checks that the databases are reachable.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let psql_pool = psql_connect_to_db(&config, false)?;
        let redis_pool = redis_connect_to_db(&config, false)?;

        Ok(Self {
            psql_pool: Arc::new(psql_pool),
            redis_pool: Arc::new(redis_pool),
            config: Arc::new(config),
        })
    }

    /// Same as [`AppState::new`] but no connection is opened until a handler asks for one.
    pub fn lazy(config: Config) -> Result<Self, AppError> {
        let psql_pool = psql_connect_to_db(&config, true)?;
        let redis_pool = redis_connect_to_db(&config, true)?;

        Ok(Self {
            psql_pool: Arc::new(psql_pool),
            redis_pool: Arc::new(redis_pool),
            config: Arc::new(config),
        })
    }

    /// Runs `f` on the blocking thread pool with a pooled postgres connection.
    pub async fn with_psql<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&PgConnection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.psql_pool.clone();
        web::block(move || {
            let conn = pool.get()?;
            f(&*conn)
        })
        .await?
    }

    /// Runs `f` on the blocking thread pool with a pooled redis connection.
    pub async fn with_redis<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut redis::Connection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.redis_pool.clone();
        web::block(move || {
            let mut conn = pool
                .get()
                .map_err(|err| AppError::internal("redis pool", err))?;
            f(&mut *conn)
        })
        .await?
    }
}

/** Holds the errors we will use during request processing */
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Wrong email or password")]
    Auth,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invite already sent")]
    AlreadyInvited,
    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    /// Logs the underlying failure and hides it behind a generic 500.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        log::error!("{}: {}", context, err);
        AppError::Internal
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::Auth => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::AlreadyInvited => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::not_found("Record not found"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                log::debug!("unique violation: {}", info.message());
                AppError::conflict("Record already exists")
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                log::debug!("foreign key violation: {}", info.message());
                AppError::not_found("Referenced record not found")
            }
            err => AppError::internal("database", err),
        }
    }
}

impl From<PoolError> for AppError {
    fn from(err: PoolError) -> Self {
        AppError::internal("postgres pool", err)
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::internal("redis", err)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::internal("password hashing", err)
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::internal("blocking task", err)
    }
}

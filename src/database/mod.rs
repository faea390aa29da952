//! All things related to the storage of users and their travel plans

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

pub use Config as DatabaseConfig;
pub use form_types::*;

use crate::users::User;
use crate::utils::env_var;
use retry::is_transient;
use retry::with_retry;
use types::MIGRATOR;

mod budgets;
mod form_types;
mod itineraries;
mod memos;
mod pois;
mod retry;
mod types;

/// Upper bound of connections, requests beyond it wait for a free one
const MAX_CONNECTIONS: u32 = 10;

/// Connections kept open while idle
const MIN_CONNECTIONS: u32 = 2;

/// How long a request waits for a free connection before failing
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle connections above the minimum are closed after this
const IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connectivity probe attempts on startup
const PROBE_ATTEMPTS: u32 = 3;

/// Wait between connectivity probe attempts
const PROBE_INTERVAL: Duration = Duration::from_secs(2);

/// Wait between migration attempts while the database is unreachable
const MIGRATE_INTERVAL: Duration = Duration::from_secs(5);

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database could not be reached, even after a retry
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// A unique constraint was violated
    #[error("Duplicate value: {0}")]
    Conflict(String),

    /// A row is still referenced by another row
    #[error("Row is still referenced: {0}")]
    Reference(String),

    /// A POI ID used in an itinerary belongs to another user
    #[error("POI belongs to another user: {0}")]
    ForeignPoi(String),

    /// Any other failing query
    #[error("Query error: {0}")]
    Query(String),

    /// Invalid connection settings
    #[error("Invalid database configuration: {0}")]
    Configuration(String),

    /// Migrations could not be applied
    #[error("Migrations could not run: {0}")]
    Migration(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Database configuration
pub enum Config {
    /// Detect configuration from environment
    DetectConfig,

    /// Use existing connection
    #[cfg_attr(not(test), expect(dead_code))]
    ExistingConnection(PgPool),
}

/// Postgres storage
///
/// Cheap to clone, all clones share the same connection pool
#[derive(Clone)]
pub struct Database {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Database {
    /// Create a new Postgres storage
    pub async fn from_config(config: Config) -> Result<Self> {
        match config {
            Config::DetectConfig => Self::new(),
            Config::ExistingConnection(pool) => Self::new_with_pool(pool).await,
        }
    }

    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable, or the separate `DB_*` variables
    ///
    /// Connections are made lazily, startup does not wait for the database: the connectivity
    /// probe and the migrations run in the background
    fn new() -> Result<Self> {
        Ok(Self::connect_lazy(connect_options()?))
    }

    /// Create Postgres storage without waiting for the database
    ///
    /// The schema is brought up-to-date in the background, as soon as the database is reachable
    pub fn connect_lazy(connect_options: PgConnectOptions) -> Self {
        let connection_pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .min_connections(MIN_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(IDLE_TIMEOUT)
            .connect_lazy_with(connect_options);

        let database = Self { connection_pool };

        tokio::spawn(database.clone().prepare());

        database
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    async fn new_with_pool(connection_pool: PgPool) -> Result<Self> {
        let database = Self { connection_pool };

        database.migrate().await?;

        Ok(database)
    }

    /// Probe the connection, then bring the schema up-to-date
    ///
    /// Migrations are attempted until they succeed or the pool is closed, a database that comes up
    /// late still gets its schema
    async fn prepare(self) {
        if !self.probe().await {
            tracing::info!("Migrations will run once the database is reachable");
        }

        loop {
            match self.migrate().await {
                Ok(()) => {
                    tracing::info!("Database is ready");
                    return;
                }
                Err(_) if self.connection_pool.is_closed() => return,
                Err(err) => tracing::warn!(
                    "{err}, trying again in {} seconds",
                    MIGRATE_INTERVAL.as_secs()
                ),
            }

            tokio::time::sleep(MIGRATE_INTERVAL).await;
        }
    }

    /// Check the database is reachable, with a couple of attempts
    async fn probe(&self) -> bool {
        for attempt in 1..=PROBE_ATTEMPTS {
            tracing::info!("Connecting to database (attempt {attempt}/{PROBE_ATTEMPTS})");

            let result = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
                .fetch_one(&self.connection_pool)
                .await;

            match result {
                Ok(now) => {
                    tracing::info!("Connected to database, database time is {now}");
                    return true;
                }
                Err(err) => tracing::warn!("Could not connect to database: {err}"),
            }

            if attempt < PROBE_ATTEMPTS {
                tokio::time::sleep(PROBE_INTERVAL).await;
            }
        }

        tracing::error!("Database is unreachable, continuing without it until it comes up");

        false
    }

    /// Run pending migrations
    async fn migrate(&self) -> Result<()> {
        MIGRATOR
            .run(&self.connection_pool)
            .await
            .map_err(|err| Error::Migration(err.to_string()))
    }

    /// Close all connections, waits for the ones in use to be returned
    pub async fn close(&self) {
        self.connection_pool.close().await;
    }

    /// Current time according to the database, doubles as health check
    pub async fn now(&self) -> Result<DateTime<Utc>> {
        with_retry(|| {
            sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()").fetch_one(&self.connection_pool)
        })
        .await
        .map_err(database_error)
    }
}

impl Database {
    /// Finds a single user by its ID
    pub async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = with_retry(|| {
            sqlx::query_as::<_, User>(
                r"
                SELECT *
                FROM users
                WHERE id = $1
                LIMIT 1
                ",
            )
            .bind(*id)
            .fetch_optional(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(user)
    }

    /// Finds a single user by username or email, for logging in
    pub async fn find_single_user_by_login(&self, username_or_email: &str) -> Result<Option<User>> {
        let user = with_retry(|| {
            sqlx::query_as::<_, User>(
                r"
                SELECT *
                FROM users
                WHERE username = $1 OR email = $1
                ORDER BY username = $1 DESC
                LIMIT 1
                ",
            )
            .bind(username_or_email)
            .fetch_optional(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(user)
    }

    /// Finds a user already using the username or email
    ///
    /// The user with ID `except` is ignored, to allow users to keep their own username and email
    pub async fn find_conflicting_user(
        &self,
        username: &str,
        email: &str,
        except: Option<&Uuid>,
    ) -> Result<Option<User>> {
        let user = with_retry(|| {
            sqlx::query_as::<_, User>(
                r"
                SELECT *
                FROM users
                WHERE (username = $1 OR email = $2)
                    AND ($3::uuid IS NULL OR id <> $3)
                ORDER BY username = $1 DESC
                LIMIT 1
                ",
            )
            .bind(username)
            .bind(email)
            .bind(except.copied())
            .fetch_optional(&self.connection_pool)
        })
        .await
        .map_err(database_error)?;

        Ok(user)
    }

    /// Create a single user
    pub async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.username)
        .bind(values.email)
        .bind(values.password_hash)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(database_error)?;

        Ok(user)
    }

    /// Update the profile of a user, the password hash only when given
    pub async fn update_user(
        &self,
        user: &User,
        values: &UpdateUserValues<'_>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET
                username = $1,
                email = $2,
                password_hash = COALESCE($3, password_hash),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $4
            RETURNING *
            ",
        )
        .bind(values.username)
        .bind(values.email)
        .bind(values.password_hash)
        .bind(user.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(database_error)?;

        Ok(user)
    }

    /// Delete a user
    ///
    /// Everything owned by the user goes with it. Itineraries are removed first, their stops
    /// would otherwise still reference the POIs that are cascaded
    pub async fn delete_user(&self, user: &User) -> Result<bool> {
        let mut transaction = self.connection_pool.begin().await.map_err(database_error)?;

        sqlx::query("DELETE FROM itineraries WHERE user_id = $1")
            .bind(user.id)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&mut *transaction)
            .await
            .map_err(database_error)?;

        transaction.commit().await.map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Read connection options from the environment
///
/// `DATABASE_URL` wins, otherwise the `DB_*` variables are applied on top of the libpq defaults
fn connect_options() -> Result<PgConnectOptions> {
    if let Some(database_url) = env_var("DATABASE_URL") {
        return database_url
            .parse::<PgConnectOptions>()
            .map_err(|err| Error::Configuration(err.to_string()));
    }

    let mut options = PgConnectOptions::new();

    if let Some(host) = env_var("DB_HOST") {
        options = options.host(&host);
    }

    if let Some(port) = env_var("DB_PORT") {
        let port = port
            .parse::<u16>()
            .map_err(|err| Error::Configuration(format!("DB_PORT: {err}")))?;
        options = options.port(port);
    }

    if let Some(database) = env_var("DB_NAME") {
        options = options.database(&database);
    }

    if let Some(username) = env_var("DB_USER") {
        options = options.username(&username);
    }

    if let Some(password) = env_var("DB_PASSWORD") {
        options = options.password(&password);
    }

    Ok(options)
}

/// Convert `SQLx` to storage error
fn database_error(err: sqlx::Error) -> Error {
    if is_transient(&err) || matches!(err, sqlx::Error::PoolClosed | sqlx::Error::Io(_)) {
        return Error::Unavailable(err.to_string());
    }

    if let sqlx::Error::Database(database_error) = &err {
        let detail = database_error
            .constraint()
            .map_or_else(|| database_error.message().to_string(), ToString::to_string);

        match database_error.kind() {
            ErrorKind::UniqueViolation => return Error::Conflict(detail),
            ErrorKind::ForeignKeyViolation => return Error::Reference(detail),
            _ => {}
        }
    }

    Error::Query(err.to_string())
}

use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Error, Pool, Sqlite, SqliteConnection};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::{KernelError, PublicMessage};

use crate::env;
use crate::error::ConvertError;

pub use self::book::*;

mod book;

static DATABASE_URL: &str = "DATABASE_URL";
static DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";

const DEFAULT_DATABASE_URL: &str = "sqlite:Kitaplar.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// SQLITE_BUSY, the low byte of every extended busy code
const SQLITE_BUSY: i32 = 5;

pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(DATABASE_URL).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match env(DATABASE_MAX_CONNECTIONS) {
            Some(value) => value
                .parse::<u32>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| {
                    format!("{DATABASE_MAX_CONNECTIONS} must be a positive integer")
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Self::connect(&url, max_connections).await
    }

    /// Opens (creating if missing) the database at `url` and brings its schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> error_stack::Result<Self, KernelError> {
        let options = SqliteConnectOptions::from_str(url)
            .convert_error()
            .attach_printable_lazy(|| format!("Invalid database url: {url}"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .convert_error()
            .attach_printable_lazy(|| format!("Failed to open database: {url}"))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| "Failed to create schema")?;

        tracing::info!("opened database {url} (max_connections={max_connections})");
        Ok(Self { pool })
    }
}

/// Pooled connection in autocommit mode. Each write takes the database lock
/// when it starts, so it waits on the busy timeout instead of failing on a
/// stale read snapshot.
pub struct SqliteTransaction(PoolConnection<Sqlite>);

impl Deref for SqliteTransaction {
    type Target = SqliteConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SqliteTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Transaction for SqliteTransaction {}

#[async_trait::async_trait]
impl DatabaseConnection for SqliteDatabase {
    type Transaction = SqliteTransaction;
    async fn transact(&self) -> error_stack::Result<SqliteTransaction, KernelError> {
        let con = self.pool.acquire().await.convert_error()?;
        Ok(SqliteTransaction(con))
    }
}

impl DependOnBookQuery for SqliteDatabase {
    type BookQuery = SqliteBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &SqliteBookRepository
    }
}

impl DependOnBookModifier for SqliteDatabase {
    type BookModifier = SqliteBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &SqliteBookRepository
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = classify(&error);
            let report = Report::from(error);
            match context {
                KernelError::Conflict => report
                    .change_context(context)
                    .attach(PublicMessage::new("Bu ISBN ile kayıtlı bir kitap zaten var")),
                KernelError::Validation => report
                    .change_context(context)
                    .attach(PublicMessage::new("Başlık ve yazar boş olamaz")),
                _ => report.change_context(context),
            }
        })
    }
}

fn classify(error: &Error) -> KernelError {
    match error {
        Error::RowNotFound => KernelError::NotFound,
        Error::PoolTimedOut => KernelError::Timeout,
        Error::Database(db) if db.is_unique_violation() => KernelError::Conflict,
        Error::Database(db) if db.is_check_violation() => KernelError::Validation,
        Error::Database(db) if is_busy(db.code().as_deref()) => KernelError::Concurrency,
        _ => KernelError::Internal,
    }
}

fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| code & 0xff == SQLITE_BUSY)
}

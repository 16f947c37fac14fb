//! SQLite store adapter.

use crate::domain::error::PapertradeError;
use crate::domain::portfolio::{Holding, TransactionRecord, UserRecord, HOLDING_EPSILON};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::NaiveDateTime;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PapertradeError> {
        let db_path =
            config
                .get_string("database", "path")
                .ok_or_else(|| PapertradeError::ConfigMissing {
                    section: "database".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("database", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| PapertradeError::Database {
                    reason: e.to_string(),
                })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, PapertradeError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| PapertradeError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), PapertradeError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| PapertradeError::Database {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                hash TEXT NOT NULL,
                cash REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                symbol TEXT NOT NULL,
                qty REAL NOT NULL,
                price REAL NOT NULL,
                executed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_user_symbol
                ON transactions(user_id, symbol);",
        )
        .map_err(|e: rusqlite::Error| PapertradeError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    fn get_conn(
        &self,
    ) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, PapertradeError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| PapertradeError::Database {
                reason: e.to_string(),
            })
    }
}

fn query_err(e: rusqlite::Error) -> PapertradeError {
    PapertradeError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            raw.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        hash: row.get(2)?,
        cash: row.get(3)?,
    })
}

impl StorePort for SqliteStore {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: f64,
    ) -> Result<i64, PapertradeError> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO users (username, hash, cash) VALUES (?1, ?2, ?3)",
            params![username, password_hash, starting_cash],
        )
        .map_err(|e: rusqlite::Error| match &e {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                PapertradeError::UsernameTaken {
                    username: username.to_string(),
                }
            }
            _ => query_err(e),
        })?;

        Ok(conn.last_insert_rowid())
    }

    fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, PapertradeError> {
        let conn = self.get_conn()?;

        conn.query_row(
            "SELECT id, username, hash, cash FROM users WHERE username = ?1",
            params![username],
            row_to_user,
        )
        .optional()
        .map_err(query_err)
    }

    fn user_by_id(&self, id: i64) -> Result<Option<UserRecord>, PapertradeError> {
        let conn = self.get_conn()?;

        conn.query_row(
            "SELECT id, username, hash, cash FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        )
        .optional()
        .map_err(query_err)
    }

    fn record_buy(
        &self,
        user_id: i64,
        symbol: &str,
        quantity: f64,
        cost: f64,
    ) -> Result<(), PapertradeError> {
        let mut conn = self.get_conn()?;

        let tx = conn.transaction().map_err(query_err)?;

        let cash: f64 = tx
            .query_row(
                "SELECT cash FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .map_err(query_err)?;

        if cash < cost {
            return Err(PapertradeError::InsufficientCash {
                required: cost,
                available: cash,
            });
        }

        tx.execute(
            "UPDATE users SET cash = cash - ?1 WHERE id = ?2",
            params![cost, user_id],
        )
        .map_err(query_err)?;

        tx.execute(
            "INSERT INTO transactions (user_id, symbol, qty, price) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, symbol, quantity, cost],
        )
        .map_err(query_err)?;

        tx.commit().map_err(query_err)
    }

    fn record_sell(
        &self,
        user_id: i64,
        symbol: &str,
        quantity: f64,
        proceeds: f64,
    ) -> Result<(), PapertradeError> {
        let mut conn = self.get_conn()?;

        let tx = conn.transaction().map_err(query_err)?;

        let held: f64 = tx
            .query_row(
                "SELECT COALESCE(SUM(qty), 0) FROM transactions
                 WHERE user_id = ?1 AND symbol = ?2",
                params![user_id, symbol],
                |row| row.get(0),
            )
            .map_err(query_err)?;

        if held < quantity {
            return Err(PapertradeError::InsufficientShares {
                symbol: symbol.to_string(),
                requested: quantity,
                held,
            });
        }

        tx.execute(
            "UPDATE users SET cash = cash + ?1 WHERE id = ?2",
            params![proceeds, user_id],
        )
        .map_err(query_err)?;

        tx.execute(
            "INSERT INTO transactions (user_id, symbol, qty, price) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, symbol, -quantity, -proceeds],
        )
        .map_err(query_err)?;

        tx.commit().map_err(query_err)
    }

    fn holdings(&self, user_id: i64) -> Result<Vec<Holding>, PapertradeError> {
        let conn = self.get_conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT symbol, SUM(qty) FROM transactions
                 WHERE user_id = ?1
                 GROUP BY symbol
                 HAVING SUM(qty) > ?2
                 ORDER BY symbol",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id, HOLDING_EPSILON], |row| {
                Ok(Holding {
                    symbol: row.get(0)?,
                    quantity: row.get(1)?,
                })
            })
            .map_err(query_err)?;

        let mut holdings = Vec::new();
        for row in rows {
            holdings.push(row.map_err(query_err)?);
        }

        Ok(holdings)
    }

    fn transactions(&self, user_id: i64) -> Result<Vec<TransactionRecord>, PapertradeError> {
        let conn = self.get_conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT symbol, qty, price, executed_at FROM transactions
                 WHERE user_id = ?1
                 ORDER BY id ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                let raw: String = row.get(3)?;
                Ok(TransactionRecord {
                    symbol: row.get(0)?,
                    quantity: row.get(1)?,
                    price: row.get(2)?,
                    executed_at: parse_timestamp(&raw)?,
                })
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_err)?);
        }

        Ok(records)
    }
}

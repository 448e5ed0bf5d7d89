//! Snapshot CRUD across named stores.
//!
//! All entries live in one database; the `store` column scopes each to a
//! named generation. Which store is current is the worker's business, this
//! module only provides the operations.

use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::StoreDb;
use super::key::RequestKey;
use crate::Error;

/// A captured response: status, headers, body, and when it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// RFC 3339 timestamp of the write.
    pub stored_at: String,
}

impl ResponseSnapshot {
    /// Capture a snapshot stamped with the current time.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self { status, headers, body, stored_at: chrono::Utc::now().to_rfc3339() }
    }
}

impl StoreDb {
    /// Create a named store if it does not already exist.
    pub async fn create_store(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO stores (name, created_at) VALUES (?1, ?2)
                     ON CONFLICT(name) DO NOTHING",
                    params![name, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace the snapshot for a request key. Last writer wins.
    ///
    /// The store must already exist; runtime writes always target the
    /// current store, which install created.
    pub async fn put(&self, store: &str, key: &RequestKey, snapshot: &ResponseSnapshot) -> Result<(), Error> {
        let store = store.to_string();
        let digest = key.digest();
        let (method, url) = (key.method.clone(), key.url.clone());
        let headers_json = serde_json::to_string(&snapshot.headers).map_err(|e| Error::Encoding(e.to_string()))?;
        let (status, body, stored_at) = (snapshot.status, snapshot.body.clone(), snapshot.stored_at.clone());

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (store, key_hash, method, url, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(store, key_hash) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![store, digest, method, url, status, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Populate a store with a batch of snapshots in one transaction.
    ///
    /// The store row is created as part of the same transaction, so a
    /// failed batch leaves no trace at all.
    pub async fn put_all(&self, store: &str, rows: Vec<(RequestKey, ResponseSnapshot)>) -> Result<(), Error> {
        let store = store.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        let mut encoded = Vec::with_capacity(rows.len());
        for (key, snapshot) in rows {
            let headers_json =
                serde_json::to_string(&snapshot.headers).map_err(|e| Error::Encoding(e.to_string()))?;
            encoded.push((
                key.digest(),
                key.method,
                key.url,
                snapshot.status,
                headers_json,
                snapshot.body,
                snapshot.stored_at,
            ));
        }

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO stores (name, created_at) VALUES (?1, ?2)
                     ON CONFLICT(name) DO NOTHING",
                    params![store, created_at],
                )?;
                for (digest, method, url, status, headers_json, body, stored_at) in &encoded {
                    tx.execute(
                        "INSERT INTO entries (store, key_hash, method, url, status, headers_json, body, stored_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                         ON CONFLICT(store, key_hash) DO UPDATE SET
                            method = excluded.method,
                            url = excluded.url,
                            status = excluded.status,
                            headers_json = excluded.headers_json,
                            body = excluded.body,
                            stored_at = excluded.stored_at",
                        params![store, digest, method, url, status, headers_json, body, stored_at],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up the snapshot for a request key, if one is stored.
    pub async fn lookup(&self, store: &str, key: &RequestKey) -> Result<Option<ResponseSnapshot>, Error> {
        let store = store.to_string();
        let digest = key.digest();

        self.conn
            .call(move |conn| -> Result<Option<ResponseSnapshot>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT status, headers_json, body, stored_at FROM entries
                     WHERE store = ?1 AND key_hash = ?2",
                )?;

                let row = stmt.query_row(params![store, digest], |row| {
                    Ok((
                        row.get::<_, u16>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                });

                match row {
                    Ok((status, headers_json, body, stored_at)) => {
                        let headers =
                            serde_json::from_str(&headers_json).map_err(|e| Error::Encoding(e.to_string()))?;
                        Ok(Some(ResponseSnapshot { status, headers, body, stored_at }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Names of every store present, oldest first.
    pub async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY created_at, name")?;
                let names = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a store and all its entries. Returns whether it existed.
    pub async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in a store (0 if the store does not exist).
    pub async fn entry_count(&self, store: &str) -> Result<u64, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM entries WHERE store = ?1", params![store], |row| {
                        row.get(0)
                    })?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

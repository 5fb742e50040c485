// src/index/sqlite.rs
// =============================================================================
// SQLite implementation of the Store contract (rusqlite, bundled SQLite).
//
// Every upsert is a single INSERT ... ON CONFLICT statement, so ids are
// stable: a URL or a word keeps the id it got the first time it was seen.
// Search is one aggregate query, so the AND / sum / rank / limit rules are
// all enforced by the database in a single pass.
// =============================================================================

use super::store::{DocumentId, SearchHit, Store, WordId, MAX_RESULTS};
use crate::error::Result;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS documents (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    url     TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS words (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS word_frequency (
    document_id INTEGER NOT NULL REFERENCES documents(id),
    word_id     INTEGER NOT NULL REFERENCES words(id),
    count       INTEGER NOT NULL,
    PRIMARY KEY (document_id, word_id)
);

CREATE INDEX IF NOT EXISTS idx_word_frequency_word ON word_frequency(word_id);
"#;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and applies the schema
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // IF NOT EXISTS everywhere, so reopening an existing index is fine
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// (term, count) rows for one document, sorted by term
    #[cfg(test)]
    pub fn frequency_rows(&self, document_id: DocumentId) -> Result<Vec<(String, u32)>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.word, wf.count FROM word_frequency wf \
             JOIN words w ON w.id = wf.word_id \
             WHERE wf.document_id = ?1 ORDER BY w.word",
        )?;
        let rows = stmt.query_map(params![document_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    #[cfg(test)]
    pub fn word_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl Store for SqliteStore {
    fn upsert_document(&mut self, url: &str, content: &str) -> Result<DocumentId> {
        let id = self.conn.query_row(
            "INSERT INTO documents (url, content) VALUES (?1, ?2) \
             ON CONFLICT (url) DO UPDATE SET content = excluded.content \
             RETURNING id",
            params![url, content],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn all_documents(&self) -> Result<Vec<(DocumentId, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, content FROM documents ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn clear_frequencies(&mut self, document_id: DocumentId) -> Result<()> {
        self.conn.execute(
            "DELETE FROM word_frequency WHERE document_id = ?1",
            params![document_id],
        )?;
        Ok(())
    }

    fn upsert_word(&mut self, term: &str) -> Result<WordId> {
        // the no-op DO UPDATE makes RETURNING yield the existing id
        let id = self.conn.query_row(
            "INSERT INTO words (word) VALUES (?1) \
             ON CONFLICT (word) DO UPDATE SET word = excluded.word \
             RETURNING id",
            params![term],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn upsert_frequency(
        &mut self,
        document_id: DocumentId,
        word_id: WordId,
        count: u32,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO word_frequency (document_id, word_id, count) VALUES (?1, ?2, ?3) \
             ON CONFLICT (document_id, word_id) DO UPDATE SET count = excluded.count",
            params![document_id, word_id, count],
        )?;
        Ok(())
    }

    fn search_by_terms(&self, terms: &[String]) -> Result<Vec<SearchHit>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; terms.len()].join(", ");
        let sql = format!(
            "SELECT d.url, SUM(wf.count) AS relevance \
             FROM documents d \
             JOIN word_frequency wf ON wf.document_id = d.id \
             JOIN words w ON w.id = wf.word_id \
             WHERE w.word IN ({placeholders}) \
             GROUP BY d.id, d.url \
             HAVING COUNT(DISTINCT w.id) = {n} \
             ORDER BY relevance DESC, d.url ASC \
             LIMIT {limit}",
            n = terms.len(),
            limit = MAX_RESULTS,
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(terms.iter()), |row| {
            Ok(SearchHit {
                url: row.get(0)?,
                relevance: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn document_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn begin(&mut self) -> Result<()> {
        // IMMEDIATE: take the write lock before the first statement
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

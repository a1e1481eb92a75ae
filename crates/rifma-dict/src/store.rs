//! SQLite-backed record store: the `words` table, and the three access
//! patterns lookup needs (equality on `spell`; equality on `rhyme` with
//! inequality on `lemma_id`, ordered by `lemma_id`; random sampling).
//!
//! Holds a single `Mutex<Connection>` rather than a connection pool: no
//! example in the reference pack pulls in `r2d2`/`deadpool`, and a
//! single-writer local SQLite file doesn't need one. Each method still
//! acquires the lock for the scope of one query and releases it on return,
//! matching "acquire a store handle for the scope of one query and release
//! it on every exit."

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreError;
use crate::record::WordRecord;

pub struct Store {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS words (
    word_id  INTEGER PRIMARY KEY,
    lemma_id INTEGER NOT NULL,
    spell    TEXT NOT NULL,
    trans    TEXT NOT NULL,
    rhyme    TEXT NOT NULL,
    gram     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_words_spell ON words(spell);
CREATE INDEX IF NOT EXISTS idx_words_rhyme ON words(rhyme);
";

impl Store {
    /// Opens (creating if absent) the SQLite file at `path` and ensures the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn: Mutex::new(conn) })
    }

    /// Opens an in-memory store, for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn: Mutex::new(conn) })
    }

    /// Clears the table without dropping it — used when re-ingesting into
    /// an existing database file.
    pub fn clear(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM words", [])?;
        Ok(())
    }

    /// Inserts a chunk of records in one transaction.
    pub fn insert_chunk(&self, records: &[WordRecord]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO words (word_id, lemma_id, spell, trans, rhyme, gram) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for r in records {
                stmt.execute(params![r.word_id, r.lemma_id, r.spell, r.trans, r.rhyme, r.gram])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All records with `spell` equal to the given surface form.
    pub fn find_by_spell(&self, spell: &str) -> Result<Vec<WordRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT word_id, lemma_id, spell, trans, rhyme, gram FROM words WHERE spell = ?1",
        )?;
        let rows = stmt.query_map(params![spell], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// All records sharing `rhyme` but belonging to a different lemma,
    /// ordered by `lemma_id`.
    pub fn find_by_rhyme_excluding_lemma(
        &self,
        rhyme: &str,
        lemma_id: i64,
    ) -> Result<Vec<WordRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT word_id, lemma_id, spell, trans, rhyme, gram FROM words \
             WHERE rhyme = ?1 AND lemma_id != ?2 ORDER BY lemma_id",
        )?;
        let rows = stmt.query_map(params![rhyme, lemma_id], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// A uniformly random record, or `None` if the store is empty.
    pub fn random_record(&self) -> Result<Option<WordRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT word_id, lemma_id, spell, trans, rhyme, gram FROM words ORDER BY RANDOM() LIMIT 1",
        )?;
        stmt.query_row([], row_to_record).optional().map_err(StoreError::from)
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<WordRecord> {
    Ok(WordRecord {
        word_id: row.get(0)?,
        lemma_id: row.get(1)?,
        spell: row.get(2)?,
        trans: row.get(3)?,
        rhyme: row.get(4)?,
        gram: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(word_id: i64, lemma_id: i64, spell: &str, trans: &str, rhyme: &str) -> WordRecord {
        WordRecord { word_id, lemma_id, spell: spell.to_string(), trans: trans.to_string(), rhyme: rhyme.to_string(), gram: String::new() }
    }

    #[test]
    fn round_trips_a_chunk_through_spell_lookup() {
        let store = Store::open_in_memory().unwrap();
        store.insert_chunk(&[sample(1, 1, "кот", "kOt", "Ot")]).unwrap();
        let found = store.find_by_spell("кот").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trans, "kOt");
    }

    #[test]
    fn finds_by_rhyme_excluding_own_lemma() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_chunk(&[
                sample(1, 1, "кот", "kOt", "Ot"),
                sample(2, 1, "скот", "skOt", "Ot"),
                sample(3, 3, "рот", "rOt", "Ot"),
            ])
            .unwrap();
        let candidates = store.find_by_rhyme_excluding_lemma("Ot", 1).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].spell, "рот");
    }

    #[test]
    fn random_record_is_none_when_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.random_record().unwrap().is_none());
    }
}

//! Dictionary ingestion: turns a Windows-1251 dictionary file into
//! [`WordRecord`]s and hands them to a [`Store`] in chunks.
//!
//! An article is a run of non-blank lines, separated from its neighbors by a
//! blank line. Within an article: `*`-prefixed lines are discarded, lines
//! carrying two stress marks are split into two rows (one per stress
//! position), and rows that end up with identical accented spellings are
//! merged, unioning their grammar tags. The article's lemma id is the id of
//! the first row surviving that process — matching the original ingester,
//! which takes the lemma id from the deduplicated row list, not the raw
//! first line.

pub mod gram;

use std::collections::BTreeSet;
use std::path::Path;

use rifma_rs::{accent, phonetizer, rhyme};

use crate::error::IngestError;
use crate::record::WordRecord;
use crate::store::Store;

/// Records are buffered and flushed to the store in chunks this large,
/// matching the original bulk-insert batch size.
const CHUNK_SIZE: usize = 100_000;

struct Row {
    id: i64,
    spell: String,
    accented_spell: String,
    gram: BTreeSet<String>,
}

/// Reads `path` as Windows-1251, ingests it into `store`, and returns the
/// number of records written.
pub fn ingest_file(path: &Path, store: &Store) -> Result<usize, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io { path: path.to_path_buf(), source })?;
    let (text, _, had_errors) = encoding_rs::WINDOWS_1251.decode(&bytes);
    if had_errors {
        return Err(IngestError::Decode);
    }
    ingest_str(&text, store)
}

/// Ingests already-decoded dictionary text into `store`.
pub fn ingest_str(text: &str, store: &Store) -> Result<usize, IngestError> {
    let mut chunk: Vec<WordRecord> = Vec::with_capacity(CHUNK_SIZE);
    let mut total = 0usize;
    let mut article_no = 0usize;
    let mut article_lines: Vec<(usize, &str)> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !article_lines.is_empty() {
                article_no += 1;
                let records = process_article(&article_lines, article_no)?;
                article_lines.clear();
                flush_records(records, &mut chunk, &mut total, store)?;
            }
            continue;
        }
        article_lines.push((line_no, line));
    }
    if !article_lines.is_empty() {
        article_no += 1;
        let records = process_article(&article_lines, article_no)?;
        flush_records(records, &mut chunk, &mut total, store)?;
    }
    if !chunk.is_empty() {
        log::info!("writing final chunk of {} records", chunk.len());
        store.insert_chunk(&chunk)?;
        total += chunk.len();
    }
    log::info!("ingested {article_no} articles, {total} records");
    Ok(total)
}

fn flush_records(
    records: Vec<WordRecord>,
    chunk: &mut Vec<WordRecord>,
    total: &mut usize,
    store: &Store,
) -> Result<(), IngestError> {
    for record in records {
        chunk.push(record);
        if chunk.len() >= CHUNK_SIZE {
            log::info!("writing chunk of {} records", chunk.len());
            store.insert_chunk(chunk)?;
            *total += chunk.len();
            chunk.clear();
        }
    }
    Ok(())
}

fn process_article(lines: &[(usize, &str)], article_no: usize) -> Result<Vec<WordRecord>, IngestError> {
    let mut rows: Vec<Row> = Vec::new();

    for &(line_no, line) in lines {
        if line.starts_with('*') {
            continue;
        }
        let row = parse_line(line, line_no, article_no)?;
        for (id, accented_spell) in split_double_accents(row.id, &row.accented_spell, line_no, article_no)? {
            rows.push(Row { id, spell: row.spell.clone(), accented_spell, gram: row.gram.clone() });
        }
    }

    let rows = combine_identical_forms(rows);
    let lemma_id = match rows.first() {
        Some(row) => row.id,
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let trans = phonetizer::phonetize(&row.accented_spell);
        let Some(rhyme_key) = rhyme::basic_rhyme(&trans) else { continue };
        let gram = row.gram.into_iter().collect::<Vec<_>>().join(" ");
        out.push(WordRecord { word_id: row.id, lemma_id, spell: row.spell, trans, rhyme: rhyme_key, gram });
    }
    Ok(out)
}

fn parse_line(line: &str, line_no: usize, article_no: usize) -> Result<Row, IngestError> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 4 {
        return Err(IngestError::MalformedLine {
            line: line_no,
            article: article_no,
            reason: format!("expected 4 pipe-separated fields, found {}", fields.len()),
        });
    }
    let id: i64 = fields[3].trim().parse().map_err(|_| IngestError::MalformedLine {
        line: line_no,
        article: article_no,
        reason: format!("non-numeric id {:?}", fields[3].trim()),
    })?;
    Ok(Row {
        id,
        spell: accent::normalize_spell(fields[0].trim()),
        accented_spell: accent::normalize_accented_spell(fields[2].trim()),
        gram: gram::parse_tags(fields[1].trim()),
    })
}

/// A line with two stress marks names two distinct accentuations of the same
/// spelling; it becomes two rows, one per stress position, with the second
/// row's id negated so it never collides with the original id in the store.
/// A line with zero or one mark passes through unchanged.
fn split_double_accents(
    id: i64,
    accented_spell: &str,
    line_no: usize,
    article_no: usize,
) -> Result<Vec<(i64, String)>, IngestError> {
    match accented_spell.matches('\'').count() {
        0 | 1 => Ok(vec![(id, accented_spell.to_string())]),
        2 => {
            let parts: Vec<&str> = accented_spell.splitn(3, '\'').collect();
            let (p0, p1, p2) = (parts[0], parts[1], parts[2]);
            Ok(vec![(id, format!("{p0}'{p1}{p2}")), (-id, format!("{p0}{p1}'{p2}"))])
        }
        n => Err(IngestError::MalformedLine {
            line: line_no,
            article: article_no,
            reason: format!("{n} stress marks on one spelling"),
        }),
    }
}

/// Merges rows sharing an accented spelling, unioning their grammar tags,
/// preserving first-seen order.
fn combine_identical_forms(rows: Vec<Row>) -> Vec<Row> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Row> = std::collections::HashMap::new();
    for row in rows {
        match groups.get_mut(&row.accented_spell) {
            Some(existing) => existing.gram.extend(row.gram),
            None => {
                order.push(row.accented_spell.clone());
                groups.insert(row.accented_spell.clone(), row);
            }
        }
    }
    order.into_iter().map(|key| groups.remove(&key).unwrap()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_line_with_one_stress_mark_passes_through() {
        let split = split_double_accents(5, "ко'т", 1, 1).unwrap();
        assert_eq!(split, vec![(5, "ко'т".to_string())]);
    }

    #[test]
    fn a_line_with_two_stress_marks_splits_in_two() {
        let split = split_double_accents(5, "за'мо'к", 1, 1).unwrap();
        assert_eq!(split, vec![(5, "за'мок".to_string()), (-5, "замо'к".to_string())]);
    }

    #[test]
    fn three_stress_marks_is_malformed() {
        assert!(split_double_accents(5, "а'б'в'г", 1, 1).is_err());
    }

    #[test]
    fn identical_accented_spellings_merge_gram_sets() {
        let mut gram_a = BTreeSet::new();
        gram_a.insert("сущ".to_string());
        let mut gram_b = BTreeSet::new();
        gram_b.insert("мн".to_string());
        let rows = vec![
            Row { id: 1, spell: "кот".into(), accented_spell: "ко'т".into(), gram: gram_a },
            Row { id: 2, spell: "кот".into(), accented_spell: "ко'т".into(), gram: gram_b },
        ];
        let combined = combine_identical_forms(rows);
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, 1);
        assert!(combined[0].gram.contains("сущ"));
        assert!(combined[0].gram.contains("мн"));
    }

    #[test]
    fn a_star_prefixed_line_is_discarded() {
        let store = Store::open_in_memory().unwrap();
        let text = "*это комментарий|сущ|ко'мментарий|1\nкот|сущ|ко'т|2\n";
        let total = ingest_str(text, &store).unwrap();
        assert_eq!(total, 1);
        let found = store.find_by_spell("кот").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn lemma_id_comes_from_the_first_deduplicated_row() {
        let store = Store::open_in_memory().unwrap();
        let text = "кот|сущ|ко'т|10\nкоты|сущ мн|коты'|11\n";
        let total = ingest_str(text, &store).unwrap();
        assert_eq!(total, 2);
        let forms = store.find_by_spell("коты").unwrap();
        assert_eq!(forms[0].lemma_id, 10);
    }

    #[test]
    fn a_malformed_line_reports_its_line_and_article_number() {
        let store = Store::open_in_memory().unwrap();
        let text = "кот|сущ|ко'т|2\n\nплохая строка без полей\n";
        let err = ingest_str(text, &store).unwrap_err();
        match err {
            IngestError::MalformedLine { line, article, .. } => {
                assert_eq!(line, 3);
                assert_eq!(article, 2);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }
}

//! The word record: the persisted unit produced by `ingest` and queried by
//! `lookup`. Mirrors the `words` table schema (see `crate::store`)
//! one-for-one.

/// One inflected form of one lemma. Created once at ingest and never
/// mutated; the lookup path additionally creates ephemeral instances with
/// `word_id = 0, lemma_id = 0` for query words absent from the store — see
/// [`WordRecord::synthesize`] — which are never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
    pub word_id: i64,
    pub lemma_id: i64,
    /// Lowercased, no accent marks, `ё` folded to `е` — `normalize_spell`'s
    /// output, same folding applied to the query on lookup so the two sides
    /// compare equal.
    pub spell: String,
    /// Canonical phonemic transcription, see `rifma_rs::phonetizer`.
    pub trans: String,
    /// Basic rhyme key, see `rifma_rs::rhyme::basic_rhyme`.
    pub rhyme: String,
    /// Opaque space-joined grammatical-feature string; never parsed here.
    pub gram: String,
}

impl WordRecord {
    pub fn synthesize(spell: impl Into<String>, trans: String, rhyme: String) -> Self {
        WordRecord { word_id: 0, lemma_id: 0, spell: spell.into(), trans, rhyme, gram: String::new() }
    }
}

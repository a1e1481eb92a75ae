//! The six-step `lookup_word` procedure: resolve a query spelling to either
//! a disambiguation list (when more than one stress placement is attested)
//! or a ranked, lemma-grouped list of rhymes.

use rifma_rs::accent;
use rifma_rs::phonetizer;
use rifma_rs::rhyme::{self, RhymeOptions};

use crate::error::StoreError;
use crate::record::WordRecord;
use crate::store::Store;

/// Query-shaping flags threaded through to the distance accumulator, plus
/// `nu`, which instead excludes candidates outright.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookupOptions {
    pub xj: bool,
    pub zv: bool,
    pub uu: bool,
    pub yy: bool,
    /// Number of leading pretonic syllables (counted outward from stress)
    /// that a candidate must match exactly. `0` disables the filter.
    pub nu: usize,
}

impl LookupOptions {
    fn rhyme_options(&self) -> RhymeOptions {
        RhymeOptions { xj: self.xj, zv: self.zv, uu: self.uu, yy: self.yy }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LookupResult {
    Variants { input_pretty: String, variants: Vec<String> },
    /// One inner `Vec` per lemma, sorted by that lemma's best distance.
    /// Within a lemma, forms are sorted by distance; the first is full text,
    /// later ones are compressed to their suffix past the lemma's longest
    /// common prefix.
    Rhymes { input_pretty: String, groups: Vec<Vec<(String, f64)>> },
}

pub fn lookup_word(query: &str, store: &Store, opts: &LookupOptions) -> Result<LookupResult, StoreError> {
    let normalized = accent::normalize_accented_spell(query);
    if normalized.chars().count() != query.trim().chars().count() {
        log::debug!("dropped noise characters from query {query:?} -> {normalized:?}");
    }
    let was_accented = accent::is_correctly_accented(&normalized);
    let spell = accent::normalize_spell(&normalized);
    let input_pretty = accent::prettify_accent_marks(&normalized);

    let stored = store.find_by_spell(&spell)?;
    let mut groups = group_by_accent(stored);

    if was_accented {
        groups.retain(|(accented, _)| *accented == normalized);
    }

    if groups.is_empty() {
        groups = synthesize_groups(&spell, was_accented, &normalized);
    }

    if groups.len() > 1 {
        let mut variants: Vec<String> = groups.into_iter().map(|(accented, _)| accented).collect();
        variants.sort();
        let variants = variants.into_iter().map(|v| accent::prettify_accent_marks(&v)).collect();
        return Ok(LookupResult::Variants { input_pretty, variants });
    }

    let Some((_, representatives)) = groups.into_iter().next() else {
        return Ok(LookupResult::Rhymes { input_pretty, groups: Vec::new() });
    };
    let query_record = &representatives[0];

    let Some(query_rhyme) = rhyme::parse(&query_record.trans) else {
        return Ok(LookupResult::Rhymes { input_pretty, groups: Vec::new() });
    };

    let candidates = store.find_by_rhyme_excluding_lemma(&query_record.rhyme, query_record.lemma_id)?;
    let rhyme_opts = opts.rhyme_options();

    let mut scored: Vec<(WordRecord, f64)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(candidate_rhyme) = rhyme::parse(&candidate.trans) else { continue };
        if opts.nu > 0 && !rhyme::pretonic_prefix_agrees(&query_rhyme, &candidate_rhyme, opts.nu) {
            continue;
        }
        let distance = rhyme::rhyme_distance_with_options(&query_rhyme, &candidate_rhyme, &rhyme_opts);
        scored.push((candidate, distance));
    }

    let groups = group_and_compress(scored);
    Ok(LookupResult::Rhymes { input_pretty, groups })
}

pub fn lookup_random_word(store: &Store, opts: &LookupOptions) -> Result<LookupResult, StoreError> {
    loop {
        let Some(record) = store.random_record()? else {
            return Ok(LookupResult::Rhymes { input_pretty: String::new(), groups: Vec::new() });
        };
        if record.rhyme.is_empty() {
            continue;
        }
        let accented = accent::get_accent_by_transcription(&record.spell, &record.trans);
        return lookup_word(&accented, store, opts);
    }
}

/// Groups records by their reconstructed accented form, preserving the
/// first-seen order of distinct accents.
fn group_by_accent(records: Vec<WordRecord>) -> Vec<(String, Vec<WordRecord>)> {
    let mut groups: Vec<(String, Vec<WordRecord>)> = Vec::new();
    for record in records {
        let accented = accent::get_accent_by_transcription(&record.spell, &record.trans);
        match groups.iter_mut().find(|(key, _)| *key == accented) {
            Some((_, bucket)) => bucket.push(record),
            None => groups.push((accented, vec![record])),
        }
    }
    groups
}

fn synthesize_groups(spell: &str, was_accented: bool, normalized: &str) -> Vec<(String, Vec<WordRecord>)> {
    let variants = if was_accented { vec![normalized.to_string()] } else { accent::get_accent_variants(spell) };
    variants
        .into_iter()
        .filter_map(|variant| {
            let trans = phonetizer::phonetize(&variant);
            let rhyme_key = rhyme::basic_rhyme(&trans)?;
            Some((variant, vec![WordRecord::synthesize(spell.to_string(), trans, rhyme_key)]))
        })
        .collect()
}

fn group_and_compress(scored: Vec<(WordRecord, f64)>) -> Vec<Vec<(String, f64)>> {
    let mut by_lemma: Vec<(i64, Vec<(WordRecord, f64)>)> = Vec::new();
    for (record, distance) in scored {
        match by_lemma.iter_mut().find(|(lemma_id, _)| *lemma_id == record.lemma_id) {
            Some((_, forms)) => forms.push((record, distance)),
            None => by_lemma.push((record.lemma_id, vec![(record, distance)])),
        }
    }

    for (_, forms) in &mut by_lemma {
        forms.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    }
    by_lemma.sort_by(|a, b| {
        let da = a.1.first().map(|(_, d)| *d).unwrap_or(f64::INFINITY);
        let db = b.1.first().map(|(_, d)| *d).unwrap_or(f64::INFINITY);
        da.partial_cmp(&db).unwrap()
    });

    by_lemma
        .into_iter()
        .map(|(_, forms)| {
            let texts: Vec<String> =
                forms.iter().map(|(r, _)| accent::yoficate_by_transcription(&r.spell, &r.trans)).collect();
            let prefix_len = common_prefix_len(&texts);
            texts
                .into_iter()
                .zip(forms.into_iter())
                .enumerate()
                .map(|(i, (text, (_, distance)))| {
                    let shown = if i == 0 { text } else { format!("-{}", &text[prefix_len..]) };
                    (shown, distance)
                })
                .collect()
        })
        .collect()
}

/// Byte offset of the end of the longest common prefix shared by all of
/// `texts`. Returns `0` when there's only one text, so its only form is
/// never compressed.
fn common_prefix_len(texts: &[String]) -> usize {
    if texts.len() < 2 {
        return 0;
    }
    let char_vecs: Vec<Vec<char>> = texts.iter().map(|t| t.chars().collect()).collect();
    let min_len = char_vecs.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut prefix_chars = 0;
    while prefix_chars < min_len && char_vecs.iter().all(|c| c[prefix_chars] == char_vecs[0][prefix_chars]) {
        prefix_chars += 1;
    }
    texts[0].char_indices().nth(prefix_chars).map(|(byte, _)| byte).unwrap_or(texts[0].len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(store: &Store) {
        store
            .insert_chunk(&[
                WordRecord { word_id: 1, lemma_id: 1, spell: "кот".into(), trans: "kOt".into(), rhyme: "Ot".into(), gram: "сущ".into() },
                WordRecord { word_id: 2, lemma_id: 2, spell: "рот".into(), trans: "rOt".into(), rhyme: "Ot".into(), gram: "сущ".into() },
                WordRecord { word_id: 3, lemma_id: 2, spell: "рту".into(), trans: "rtU".into(), rhyme: "Ut".into(), gram: "сущ".into() },
                WordRecord { word_id: 4, lemma_id: 4, spell: "скот".into(), trans: "skOt".into(), rhyme: "Ot".into(), gram: "сущ".into() },
            ])
            .unwrap();
    }

    #[test]
    fn finds_rhymes_grouped_by_lemma_and_sorted() {
        let store = Store::open_in_memory().unwrap();
        seed(&store);
        let result = lookup_word("кот", &store, &LookupOptions::default()).unwrap();
        match result {
            LookupResult::Rhymes { groups, .. } => {
                assert_eq!(groups.len(), 2);
            }
            other => panic!("expected Rhymes, got {other:?}"),
        }
    }

    #[test]
    fn an_unknown_word_synthesizes_a_record_and_still_finds_rhymes() {
        let store = Store::open_in_memory().unwrap();
        seed(&store);
        let result = lookup_word("бо'т", &store, &LookupOptions::default()).unwrap();
        match result {
            LookupResult::Rhymes { groups, .. } => assert!(!groups.is_empty()),
            other => panic!("expected Rhymes, got {other:?}"),
        }
    }

    #[test]
    fn ambiguous_unaccented_spelling_returns_variants() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_chunk(&[
                WordRecord { word_id: 1, lemma_id: 1, spell: "замок".into(), trans: "zAmak".into(), rhyme: "aki".into(), gram: String::new() },
                WordRecord { word_id: 2, lemma_id: 2, spell: "замок".into(), trans: "zamOk".into(), rhyme: "Ok".into(), gram: String::new() },
            ])
            .unwrap();
        let result = lookup_word("замок", &store, &LookupOptions::default()).unwrap();
        match result {
            LookupResult::Variants { variants, .. } => assert_eq!(variants.len(), 2),
            other => panic!("expected Variants, got {other:?}"),
        }
    }

    #[test]
    fn common_prefix_compression_keeps_the_first_form_full() {
        let groups = group_and_compress(vec![
            (WordRecord { word_id: 2, lemma_id: 2, spell: "рот".into(), trans: "rOt".into(), rhyme: "Ot".into(), gram: String::new() }, 0.0),
            (WordRecord { word_id: 3, lemma_id: 2, spell: "рту".into(), trans: "rtU".into(), rhyme: "Ut".into(), gram: String::new() }, 0.4),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0][0].0, "рот");
        assert!(groups[0][1].0.starts_with('-'));
    }
}

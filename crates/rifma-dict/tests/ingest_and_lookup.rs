//! End-to-end: ingest a small fixture dictionary and exercise lookup
//! against it, covering a multi-form lemma, a discarded `*` line, and a
//! double-stress line.

use rifma_dict::ingest::ingest_str;
use rifma_dict::lookup::{LookupOptions, LookupResult, lookup_word};
use rifma_dict::store::Store;

const FIXTURE: &str = "\
кот|сущ мр ед им|ко'т|100
кота|сущ мр ед род|кота'|101
*устаревшая форма|сущ|ко'тиус|102

рот|сущ мр ед им|ро'т|200
рта|сущ мр ед род|рта'|201

замок|сущ мр ед им|за'мо'к|300
";

fn seeded_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    let total = ingest_str(FIXTURE, &store).unwrap();
    assert_eq!(total, 6);
    store
}

#[test]
fn discards_star_prefixed_lines() {
    let store = seeded_store();
    let found = store.find_by_spell("котиус").unwrap();
    assert!(found.is_empty());
}

#[test]
fn double_stress_line_becomes_two_distinct_accentuations() {
    let store = seeded_store();
    let forms = store.find_by_spell("замок").unwrap();
    assert_eq!(forms.len(), 2);
    let ids: Vec<i64> = forms.iter().map(|f| f.word_id).collect();
    assert!(ids.contains(&300));
    assert!(ids.contains(&-300));
}

#[test]
fn multi_form_lemma_shares_a_lemma_id() {
    let store = seeded_store();
    let kot = &store.find_by_spell("кот").unwrap()[0];
    let kota = &store.find_by_spell("кота").unwrap()[0];
    assert_eq!(kot.lemma_id, kota.lemma_id);
    assert_eq!(kot.lemma_id, 100);
}

#[test]
fn looking_up_a_known_word_finds_rhymes_from_another_lemma() {
    let store = seeded_store();
    let result = lookup_word("кот", &store, &LookupOptions::default()).unwrap();
    match result {
        LookupResult::Rhymes { groups, .. } => {
            assert!(groups.iter().any(|g| g.iter().any(|(text, _)| text.contains("рот"))));
        }
        other => panic!("expected Rhymes, got {other:?}"),
    }
}

#[test]
fn an_ambiguous_double_stress_spelling_returns_variants() {
    let store = seeded_store();
    let result = lookup_word("замок", &store, &LookupOptions::default()).unwrap();
    match result {
        LookupResult::Variants { variants, .. } => assert_eq!(variants.len(), 2),
        other => panic!("expected Variants, got {other:?}"),
    }
}

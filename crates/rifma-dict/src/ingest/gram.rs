//! Grammar-tag abbreviation table.
//!
//! The dictionary format carries grammar tags as whitespace-separated words;
//! this is an opaque feature string end to end, so no abbreviation is
//! required for correctness. A handful of common tags are nonetheless
//! shortened, matching the shape of the original ingester's abbreviation
//! table — unlike that table, a tag not found here is carried through
//! unabbreviated rather than dropped, since nothing downstream depends on a
//! closed tag set.

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("существительное", "сущ"),
    ("прилагательное", "прил"),
    ("глагол", "гл"),
    ("наречие", "нар"),
    ("местоимение", "мест"),
    ("числительное", "числ"),
    ("причастие", "прич"),
    ("деепричастие", "дееприч"),
    ("мужской", "мр"),
    ("женский", "жр"),
    ("средний", "ср"),
    ("единственное", "ед"),
    ("множественное", "мн"),
    ("именительный", "им"),
    ("родительный", "род"),
    ("дательный", "дат"),
    ("винительный", "вин"),
    ("творительный", "тв"),
    ("предложный", "пр"),
    ("совершенный", "сов"),
    ("несовершенный", "несов"),
];

/// Abbreviates one grammar tag, passing unrecognized tags through unchanged.
pub fn abbreviate(tag: &str) -> &str {
    ABBREVIATIONS.iter().find(|(full, _)| *full == tag).map(|(_, abbr)| *abbr).unwrap_or(tag)
}

/// Abbreviates a whitespace-separated grammar-tag field into a set (so
/// merging identical forms within an article can union tag sets directly).
pub fn parse_tags(field: &str) -> std::collections::BTreeSet<String> {
    field.split_whitespace().map(|t| abbreviate(t).to_string()).collect()
}

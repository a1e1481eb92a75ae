//! Normalizing, validating, projecting, and reconstructing stress marks on
//! Russian spellings.
//!
//! "Accented spelling" throughout this module means orthography carrying at
//! most one stress mark (normalized to `'`); "spell" means the stress-free,
//! `ё`-folded surface form stored in [records](crate) and the record store.

use crate::repertoire::{is_consonant_phoneme, is_repertoire_letter, is_separator, is_stressed_vowel_phoneme, is_vowel_letter, is_vowel_phoneme};

/// Lowercases, trims, folds every stress-mark variant (`_`, combining acute)
/// to `'`, canonicalizes `ё` (with or without an explicit mark) to `ё'`, and
/// drops characters outside the repertoire. Idempotent.
pub fn normalize_accented_spell(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut chars = lowered.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '_' | '\u{0301}' => out.push('\''),
            '\'' | '`' => out.push(c),
            'ё' => {
                out.push('ё');
                out.push('\'');
                // ё is inherently stressed; swallow any mark that followed it
                // in the input instead of emitting it a second time.
                if matches!(chars.peek(), Some('\'') | Some('`') | Some('_') | Some('\u{0301}')) {
                    chars.next();
                }
            }
            other if is_repertoire_letter(other) || is_separator(other) => out.push(other),
            _ => {}
        }
    }
    out
}

/// As [`normalize_accented_spell`], but strips all stress marks and folds
/// `ё` to `е`.
pub fn normalize_spell(s: &str) -> String {
    normalize_accented_spell(s)
        .chars()
        .filter_map(|c| match c {
            '\'' | '`' => None,
            'ё' => Some('е'),
            other => Some(other),
        })
        .collect()
}

/// Renders a normalized accented spelling for display: `'` becomes a
/// combining acute accent, `ё'` collapses back to plain `ё`, and in
/// single-syllable words the mark is dropped entirely.
pub fn prettify_accent_marks(s: &str) -> String {
    let syllable_count = s.chars().filter(|&c| is_vowel_letter(c)).count();
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            'ё' => {
                out.push('ё');
                if chars.peek() == Some(&'\'') {
                    chars.next();
                }
            }
            '\'' if syllable_count > 1 => out.push('\u{0301}'),
            '\'' => {}
            other => out.push(other),
        }
    }
    out
}

/// True iff `s` contains exactly one `'` and it immediately follows a vowel
/// letter. Expects `s` to already carry normalized accent marks.
pub fn is_correctly_accented(s: &str) -> bool {
    let mut marks = s.match_indices('\'');
    let Some((idx, _)) = marks.next() else { return false };
    if marks.next().is_some() {
        return false;
    }
    s[..idx].chars().next_back().is_some_and(is_vowel_letter)
}

/// Enumerates every possible stress placement of an unaccented `spell`. For
/// each vowel position, yields the spelling stressed there; additionally,
/// when that vowel is `е`, yields a second variant with it rewritten to
/// `ё'` (the letter `ё` is conventionally written `е` when unmarked).
pub fn get_accent_variants(spell: &str) -> Vec<String> {
    let chars: Vec<char> = spell.chars().collect();
    let mut variants = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        if !is_vowel_letter(c) {
            continue;
        }
        variants.push(stress_at(&chars, i));
        if c == 'е' {
            variants.push(yo_stress_at(&chars, i));
        }
    }
    variants
}

fn stress_at(chars: &[char], pos: usize) -> String {
    let mut s = String::with_capacity(chars.len() + 1);
    for (j, &c) in chars.iter().enumerate() {
        s.push(c);
        if j == pos {
            s.push('\'');
        }
    }
    s
}

fn yo_stress_at(chars: &[char], pos: usize) -> String {
    let mut s = String::with_capacity(chars.len() + 2);
    for (j, &c) in chars.iter().enumerate() {
        if j == pos {
            s.push('ё');
            s.push('\'');
        } else {
            s.push(c);
        }
    }
    s
}

/// A single `(text, vowel phoneme)` unit produced by segmenting a
/// transcription into consonant-run-plus-vowel syllables; `vowel` is `None`
/// for a trailing consonant-only cluster with no following vowel.
struct TransSyllable {
    text: String,
    vowel: Option<char>,
}

/// Segments orthography into C*V syllables, with a trailing consonant-only
/// cluster (if any) emitted as a final, vowel-less syllable.
fn segment_spell_syllables(spell: &str) -> Vec<String> {
    let chars: Vec<char> = spell.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        while i < chars.len() && !is_vowel_letter(chars[i]) {
            i += 1;
        }
        if i < chars.len() {
            i += 1; // include the vowel
            out.push(chars[start..i].iter().collect());
        } else if start < i {
            out.push(chars[start..i].iter().collect());
        }
    }
    out
}

/// As [`segment_spell_syllables`], over a phonemic transcription.
fn segment_trans_syllables(trans: &str) -> Vec<TransSyllable> {
    let chars: Vec<char> = trans.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        while i < chars.len() && is_consonant_phoneme(chars[i]) {
            i += 1;
        }
        if i < chars.len() && is_vowel_phoneme(chars[i]) {
            let vowel = chars[i];
            i += 1;
            out.push(TransSyllable { text: chars[start..i].iter().collect(), vowel: Some(vowel) });
        } else if start < i {
            out.push(TransSyllable { text: chars[start..i].iter().collect(), vowel: None });
        }
    }
    out
}

/// Reconstructs an accented spelling by walking `spell`'s syllables in
/// lockstep with `trans`'s (same count, by construction of the phonetizer):
/// the syllable whose transcription vowel is uppercase receives the stress
/// mark. A spelling syllable ending in `е` whose transcription vowel is `O`
/// is rewritten with `ё'` instead, recovering the `ё` the ingester folded.
pub fn get_accent_by_transcription(spell: &str, trans: &str) -> String {
    let mut out = String::with_capacity(spell.len() + 2);
    for (s, t) in segment_spell_syllables(spell).iter().zip(segment_trans_syllables(trans).iter()) {
        if t.vowel == Some('O') && s.ends_with('е') {
            out.push_str(&s[..s.len() - 'е'.len_utf8()]);
            out.push('ё');
            out.push('\'');
            continue;
        }
        out.push_str(s);
        if t.vowel.is_some_and(is_stressed_vowel_phoneme) {
            out.push('\'');
        }
    }
    out
}

/// As [`get_accent_by_transcription`], but only rewrites `е` to plain `ё`
/// (no marking of stress elsewhere).
pub fn yoficate_by_transcription(spell: &str, trans: &str) -> String {
    let mut out = String::with_capacity(spell.len());
    for (s, t) in segment_spell_syllables(spell).iter().zip(segment_trans_syllables(trans).iter()) {
        if t.vowel == Some('O') && s.ends_with('е') {
            out.push_str(&s[..s.len() - 'е'.len_utf8()]);
            out.push('ё');
        } else {
            out.push_str(s);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accented_spell_folds_marks_and_yo() {
        assert_eq!(normalize_accented_spell("  Плю'нь  "), "плю'нь");
        assert_eq!(normalize_accented_spell("плюнь_"), "плюнь'");
        assert_eq!(normalize_accented_spell("бЕ\u{0301}рег"), "бе'рег");
        assert_eq!(normalize_accented_spell("ещё"), "ещё'");
        assert_eq!(normalize_accented_spell("ещё'"), "ещё'");
    }

    #[test]
    fn normalize_accented_spell_is_idempotent() {
        for s in ["плю'нь", "бегемо`топодо'бный", "ещё", "ка'к бы"] {
            let once = normalize_accented_spell(s);
            let twice = normalize_accented_spell(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn normalize_spell_strips_marks_and_folds_yo() {
        assert_eq!(normalize_spell("плю'нь"), "плюнь");
        assert_eq!(normalize_spell("ещё'"), "еще");
    }

    #[test]
    fn is_correctly_accented_requires_exactly_one_mark_after_a_vowel() {
        assert!(is_correctly_accented("плю'нь"));
        assert!(!is_correctly_accented("плюнь"));
        assert!(!is_correctly_accented("п'люнь"));
        assert!(!is_correctly_accented("плю'н'ь"));
    }

    #[test]
    fn prettify_drops_mark_in_single_syllable_words() {
        assert_eq!(prettify_accent_marks("во'т"), "вот");
        assert_eq!(prettify_accent_marks("плю'нь"), "плю\u{0301}нь");
    }

    #[test]
    fn prettify_collapses_yo_mark() {
        assert_eq!(prettify_accent_marks("ещё'"), "ещё");
    }

    #[test]
    fn accent_variants_match_worked_examples() {
        assert_eq!(get_accent_variants("отнял"), vec!["о'тнял", "отня'л"]);
        assert_eq!(
            get_accent_variants("берег"),
            vec!["бе'рег", "бё'рег", "бере'г", "берё'г"]
        );
    }

    #[test]
    fn stripping_a_correctly_accented_spelling_yields_a_variant_containing_it() {
        for s in ["о'тнял", "отня'л", "бе'рег"] {
            let spell = normalize_spell(s);
            assert!(get_accent_variants(&spell).contains(&s.to_string()));
        }
    }

    #[test]
    fn get_accent_by_transcription_round_trips_through_phonetize() {
        use crate::phonetizer::phonetize;
        for s in ["плю'нь", "почтальо'н", "ле'стница", "зло'го"] {
            let spell = normalize_spell(s);
            let trans = phonetize(s);
            assert_eq!(get_accent_by_transcription(&spell, &trans), normalize_accented_spell(s));
        }
    }
}

//! Character classes and phoneme maps for Russian grapheme-to-phoneme transcription.
//!
//! Two alphabets are in play: the *orthographic repertoire* (Cyrillic letters,
//! accent marks, separators) consumed by [`crate::accent`], and the *phoneme
//! alphabet* (plain ASCII letters, case encodes stress/palatalization) produced
//! by [`crate::phonetizer`] and consumed by [`crate::rhyme`]. This module owns
//! both as exhaustive `char` classifications, rather than a packed encoding:
//! classification here runs once per dictionary line or query, not in a hot
//! inner loop.

/// Separator characters between words of a multi-word dictionary entry.
pub const SEPARATORS: &str = " ,-";

pub const fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | ',' | '-')
}

/// Primary (`'`) and secondary (`` ` ``) stress marks, already normalized.
/// `_` and the combining acute are folded to `'` before this stage; see
/// [`crate::accent::normalize_accented_spell`].
pub const fn is_accent_mark(ch: char) -> bool {
    matches!(ch, '\'' | '`')
}

// --- Orthographic repertoire -------------------------------------------------

pub const fn is_sign_letter(ch: char) -> bool {
    matches!(ch, 'ъ' | 'ь')
}

pub const fn is_plain_vowel_letter(ch: char) -> bool {
    matches!(ch, 'ы' | 'э' | 'а' | 'о' | 'у')
}

pub const fn is_jot_vowel_letter(ch: char) -> bool {
    matches!(ch, 'и' | 'е' | 'я' | 'ё' | 'ю')
}

pub const fn is_vowel_letter(ch: char) -> bool {
    is_plain_vowel_letter(ch) || is_jot_vowel_letter(ch)
}

/// The full orthographic consonant repertoire. Includes the Latin letter `h`,
/// carried through from borrowings (`хобби`-style transliterations written
/// with the Latin letter rather than `х`) and mapped to the paired-voiced
/// phoneme `h`.
pub const fn is_consonant_letter(ch: char) -> bool {
    matches!(
        ch,
        'й' | 'м' | 'н' | 'л' | 'р' | 'ф' | 'п' | 'т' | 'с' | 'ш' | 'к' | 'х' | 'в' | 'б' | 'д'
            | 'з' | 'ж' | 'г' | 'h' | 'ц' | 'ч' | 'щ'
    )
}

pub const fn is_soft_only_consonant_letter(ch: char) -> bool {
    matches!(ch, 'й' | 'ч' | 'щ')
}

pub const fn is_hard_only_consonant_letter(ch: char) -> bool {
    matches!(ch, 'ж' | 'ш' | 'ц')
}

/// Consonant letters that can be either hard or soft, i.e. every consonant
/// letter except the hard-only ones.
pub const fn is_softable_consonant_letter(ch: char) -> bool {
    is_consonant_letter(ch) && !is_hard_only_consonant_letter(ch)
}

/// Any letter belonging to the repertoire (vowel, sign, or consonant).
pub const fn is_repertoire_letter(ch: char) -> bool {
    is_vowel_letter(ch) || is_sign_letter(ch) || is_consonant_letter(ch)
}

// --- Phoneme alphabet ---------------------------------------------------------

pub const fn is_vowel_phoneme(ch: char) -> bool {
    matches!(ch, 'i' | 'e' | 'a' | 'o' | 'u' | 'I' | 'E' | 'A' | 'O' | 'U')
}

pub const fn is_stressed_vowel_phoneme(ch: char) -> bool {
    matches!(ch, 'I' | 'E' | 'A' | 'O' | 'U')
}

pub const fn is_sonorant_phoneme(ch: char) -> bool {
    matches!(ch, 'y' | 'm' | 'n' | 'l' | 'r' | 'Y' | 'M' | 'N' | 'L' | 'R')
}

pub const fn is_paired_voiced_phoneme(ch: char) -> bool {
    matches!(ch, 'v' | 'b' | 'd' | 'z' | 'j' | 'g' | 'h' | 'V' | 'B' | 'D' | 'Z' | 'J' | 'G' | 'H')
}

pub const fn is_paired_unvoiced_phoneme(ch: char) -> bool {
    matches!(ch, 'f' | 'p' | 't' | 's' | 'c' | 'k' | 'x' | 'F' | 'P' | 'T' | 'S' | 'C' | 'K' | 'X')
}

/// True for any consonant *symbol* this module deals with in isolation
/// (single `char`), i.e. excluding the two-character affricate `ts`, which
/// phonetizer passes handle as a literal two-byte string, not a `char`.
pub const fn is_consonant_phoneme(ch: char) -> bool {
    is_sonorant_phoneme(ch) || is_paired_voiced_phoneme(ch) || is_paired_unvoiced_phoneme(ch)
}

/// Lowercases a phoneme symbol, i.e. un-stresses a vowel or un-palatalizes a
/// consonant. Non-phoneme characters pass through unchanged.
pub fn unstress(ch: char) -> char {
    ch.to_ascii_lowercase()
}

/// Russian vowel letter (plain or jot) to base phoneme quality. Panics if
/// `ch` is not a vowel letter; callers are expected to have already checked
/// the class.
pub fn phonemize(ch: char) -> char {
    match ch {
        'ы' | 'и' => 'i',
        'э' | 'е' => 'e',
        'а' | 'я' => 'a',
        'о' | 'ё' => 'o',
        'у' | 'ю' => 'u',
        _ => unreachable!("phonemize called on non-vowel letter {ch:?}"),
    }
}

/// Russian consonant letter to its lowercase (hard) phoneme spelling. The
/// three affricates (`ц`, `ч`, `щ`) map to their derived multi-character
/// symbols (`ts`, `tc`, `c`); every other consonant maps to a single ASCII
/// letter. Callers apply palatalization by uppercasing the whole result, which
/// is a no-op on `ts` (hard-only, never palatalizes) and idempotent on `tc`
/// (soft-only, always produced uppercase already handled by the caller).
/// Panics if `ch` is not a consonant letter.
pub fn phonemize_consonant(ch: char) -> &'static str {
    match ch {
        'й' => "y",
        'м' => "m",
        'н' => "n",
        'л' => "l",
        'р' => "r",
        'ф' => "f",
        'п' => "p",
        'т' => "t",
        'с' => "s",
        'ш' => "c",
        'к' => "k",
        'х' => "x",
        'в' => "v",
        'б' => "b",
        'д' => "d",
        'з' => "z",
        'ж' => "j",
        'г' => "g",
        'h' => "h",
        'ц' => "ts",
        'ч' => "tc",
        'щ' => "c",
        _ => unreachable!("phonemize_consonant called on non-consonant letter {ch:?}"),
    }
}

/// Low reduction: `{i,e,a,o,u} -> {i,i,a,a,u}`. Case (stress) is not
/// meaningful on input here — reduction always produces an unstressed vowel.
pub fn reduct_less(ch: char) -> char {
    match ch {
        'i' | 'e' => 'i',
        'a' | 'o' => 'a',
        'u' => 'u',
        other => other,
    }
}

/// High reduction: `{i,e,a,o,u} -> {i,i,i,i,u}`.
pub fn reduct_more(ch: char) -> char {
    match ch {
        'i' | 'e' | 'a' | 'o' => 'i',
        'u' => 'u',
        other => other,
    }
}

/// Voices a paired-unvoiced consonant phoneme, preserving case
/// (palatalization) and passing through anything else unchanged.
pub fn voice(ch: char) -> char {
    let mapped = match ch.to_ascii_lowercase() {
        'f' => 'v',
        'p' => 'b',
        't' => 'd',
        's' => 'z',
        'c' => 'j',
        'k' => 'g',
        'x' => 'h',
        other => return other_or_same(ch, other),
    };
    if ch.is_ascii_uppercase() { mapped.to_ascii_uppercase() } else { mapped }
}

/// Unvoices a paired-voiced consonant phoneme, preserving case.
pub fn unvoice(ch: char) -> char {
    let mapped = match ch.to_ascii_lowercase() {
        'v' => 'f',
        'b' => 'p',
        'd' => 't',
        'z' => 's',
        'j' => 'c',
        'g' => 'k',
        'h' => 'x',
        other => return other_or_same(ch, other),
    };
    if ch.is_ascii_uppercase() { mapped.to_ascii_uppercase() } else { mapped }
}

fn other_or_same(original: char, lowered: char) -> char {
    if lowered == original.to_ascii_lowercase() { original } else { lowered }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonemize_maps_plain_and_jot_vowels_to_the_same_quality() {
        assert_eq!(phonemize('о'), phonemize('ё'));
        assert_eq!(phonemize('а'), phonemize('я'));
        assert_eq!(phonemize('ы'), phonemize('и'));
    }

    #[test]
    fn reductions_collapse_mid_vowels() {
        assert_eq!(reduct_less('o'), 'a');
        assert_eq!(reduct_more('o'), 'i');
        assert_eq!(reduct_less('u'), 'u');
        assert_eq!(reduct_more('u'), 'u');
    }

    #[test]
    fn voice_unvoice_round_trip_preserves_case() {
        assert_eq!(voice('s'), 'z');
        assert_eq!(voice('S'), 'Z');
        assert_eq!(unvoice('z'), 's');
        assert_eq!(unvoice('Z'), 'S');
        assert_eq!(unvoice(voice('t')), 't');
    }

    #[test]
    fn voice_unvoice_pass_through_non_paired_consonants() {
        assert_eq!(voice('m'), 'm');
        assert_eq!(unvoice('R'), 'R');
    }

    #[test]
    fn h_is_a_consonant_letter_mapped_to_paired_voiced_h() {
        assert!(is_consonant_letter('h'));
        assert!(is_paired_voiced_phoneme('h'));
    }
}

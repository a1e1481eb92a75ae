//! Grapheme-to-phoneme transcription: turns a normalized accented spelling
//! into a phoneme string over the alphabet described in
//! [`crate::repertoire`].
//!
//! The pipeline is six ordered, total rewrite passes. Each pass is a
//! self-contained scan over the previous pass's output; none of them are
//! regular-expression based (a handful of context-sensitive rules — the `ьо`
//! digraph, the reflexive ending, cluster simplification — don't reduce to
//! independent character classes, so they're easier to get right and to audit
//! as explicit index-based scans than as a dynamically built pattern).

use crate::repertoire;

/// Position of a vowel relative to the consonant (if any) preceding it,
/// controlling which reduction rule applies when unstressed.
#[derive(Clone, Copy, PartialEq, Eq)]
enum VowelPosition {
    AfterHard,
    AfterSoft,
    Isolated,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VowelStress {
    Stressed,
    Semistressed,
    UnstressedFinal,
    Unstressed,
}

/// Transcribes a normalized accented spelling (see
/// [`crate::accent::normalize_accented_spell`]) into its phoneme string.
/// Total: any well-formed normalized input produces a transcription.
pub fn phonetize(accented_spell: &str) -> String {
    let s = pass1_genitive_ending(accented_spell);
    let s = pass2_softness_and_stress(&s);
    let s = pass3_consonant_clusters(&s);
    let s = pass4_drop_separators(&s);
    let s = pass5_voicing_assimilation(&s);
    pass6_degeminate(&s)
}

/// Pass 1: adjectival/pronominal genitive ending `-ого`/`-его` (optionally
/// followed by the reflexive particle) is pronounced with `в`, not `г`.
fn pass1_genitive_ending(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n);
    let mut i = 0;
    while i < n {
        if matches!(chars[i], 'о' | 'е') {
            if let Some(end) = match_genitive_ending(&chars, i) {
                out.push(chars[i]);
                if chars.get(i + 1) == Some(&'\'') || chars.get(i + 1) == Some(&'`') {
                    out.push(chars[i + 1]);
                }
                out.push('в');
                // copy the remainder of the match (the trailing `о`, any
                // mark on it, and an optional reflexive particle) verbatim
                let go_start = i + if matches!(chars.get(i + 1), Some('\'') | Some('`')) { 2 } else { 1 };
                for &c in &chars[go_start + 1..end] {
                    out.push(c);
                }
                i = end;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// If `chars[start..]` begins with `[ое]'?го'?(ся)?` immediately followed by
/// a word boundary (separator or end of string), returns the end index of
/// the whole match (exclusive).
fn match_genitive_ending(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('\'') | Some('`')) {
        i += 1;
    }
    if chars.get(i) != Some(&'г') {
        return None;
    }
    i += 1;
    if chars.get(i) != Some(&'о') {
        return None;
    }
    i += 1;
    if matches!(chars.get(i), Some('\'') | Some('`')) {
        i += 1;
    }
    if chars[i..].starts_with(&['с', 'я']) {
        i += 2;
    }
    let word_end = chars.get(i).is_none() || chars.get(i).is_some_and(|&c| repertoire::is_separator(c));
    word_end.then_some(i)
}

/// Pass 2: the central pass. Pairs each consonant with the vowel or sign
/// immediately following it (determining palatalization), phonetizes bare
/// vowels, and resolves each vowel's stress from a trailing mark or word
/// boundary. Every consonant and vowel letter is converted to its ASCII
/// phoneme here; passes 3–6 operate purely on phonemes.
fn pass2_softness_and_stress(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n * 2);
    let mut i = 0;
    while i < n {
        let c = chars[i];

        // `C + ьо`: a digraph in its own right (inserts the `Й` glide).
        if repertoire::is_consonant_letter(c) && chars.get(i + 1) == Some(&'ь') && chars.get(i + 2) == Some(&'о') {
            let (stress, next) = detect_stress(&chars, i + 3);
            push_consonant(&mut out, c, !repertoire::is_hard_only_consonant_letter(c));
            out.push('Y');
            out.push(phonetize_vowel(VowelPosition::AfterSoft, stress, 'о'));
            i = next;
            continue;
        }

        if repertoire::is_consonant_letter(c) {
            if let Some(&v) = chars.get(i + 1).filter(|&&v| repertoire::is_vowel_letter(v)) {
                let soft = repertoire::is_soft_only_consonant_letter(c)
                    || (repertoire::is_softable_consonant_letter(c) && repertoire::is_jot_vowel_letter(v));
                let position = if soft { VowelPosition::AfterSoft } else { VowelPosition::AfterHard };
                let (stress, next) = detect_stress(&chars, i + 2);
                push_consonant(&mut out, c, soft);
                out.push(phonetize_vowel(position, stress, v));
                i = next;
                continue;
            }
            if let Some(&sign) = chars.get(i + 1).filter(|&&s| repertoire::is_sign_letter(s)) {
                let soft = if repertoire::is_hard_only_consonant_letter(c) {
                    false
                } else if repertoire::is_soft_only_consonant_letter(c) {
                    true
                } else {
                    sign == 'ь'
                };
                push_consonant(&mut out, c, soft);
                i += 2;
                continue;
            }
            if repertoire::is_soft_only_consonant_letter(c) {
                push_consonant(&mut out, c, true);
                i += 1;
                continue;
            }
            // Bare consonant with nothing to pair against (mid-cluster, or
            // trailing at a word/string boundary): hard by default.
            push_consonant(&mut out, c, false);
            i += 1;
            continue;
        }

        if repertoire::is_plain_vowel_letter(c) {
            let (stress, next) = detect_stress(&chars, i + 1);
            out.push(phonetize_vowel(VowelPosition::Isolated, stress, c));
            i = next;
            continue;
        }

        if repertoire::is_jot_vowel_letter(c) {
            let (stress, next) = detect_stress(&chars, i + 1);
            out.push('Y');
            out.push(phonetize_vowel(VowelPosition::AfterSoft, stress, c));
            i = next;
            continue;
        }

        if repertoire::is_sign_letter(c) {
            // A sign with nothing before or after it to pair with is
            // ill-formed input; drop it.
            i += 1;
            continue;
        }

        // Separators and stray marks pass through untouched.
        out.push(c);
        i += 1;
    }
    out
}

fn push_consonant(out: &mut String, letter: char, palatalized: bool) {
    let phoneme = repertoire::phonemize_consonant(letter);
    if palatalized {
        out.push_str(&phoneme.to_uppercase());
    } else {
        out.push_str(phoneme);
    }
}

fn detect_stress(chars: &[char], pos: usize) -> (VowelStress, usize) {
    match chars.get(pos) {
        Some('\'') => (VowelStress::Stressed, pos + 1),
        Some('`') => (VowelStress::Semistressed, pos + 1),
        _ => {
            let word_end = chars.get(pos).is_none() || chars.get(pos).is_some_and(|&c| repertoire::is_separator(c));
            if word_end { (VowelStress::UnstressedFinal, pos) } else { (VowelStress::Unstressed, pos) }
        }
    }
}

fn phonetize_vowel(position: VowelPosition, stress: VowelStress, vowel_letter: char) -> char {
    let base = repertoire::phonemize(vowel_letter);
    match stress {
        VowelStress::Stressed => base.to_ascii_uppercase(),
        VowelStress::Semistressed => base,
        VowelStress::UnstressedFinal => {
            if position == VowelPosition::Isolated { base } else { repertoire::reduct_less(base) }
        }
        VowelStress::Unstressed => {
            if position == VowelPosition::AfterSoft { repertoire::reduct_more(base) } else { repertoire::reduct_less(base) }
        }
    }
}

/// Pass 3: consonant-cluster simplification left over from pass 2 — the
/// reflexive verb ending, sibilant-plus-`ч` fusing into `щ`'s symbol, and
/// `стн`/`здн`-style cluster reduction (the middle stop is silent).
fn pass3_consonant_clusters(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n);
    let mut i = 0;
    while i < n {
        let c = chars[i];

        if matches!(c, 't' | 'T') && chars.get(i + 1) == Some(&'S') && chars.get(i + 2) == Some(&'a') {
            let word_end = chars.get(i + 3).is_none() || chars.get(i + 3).is_some_and(|&c| repertoire::is_separator(c));
            if word_end {
                out.push_str("tsa");
                i += 3;
                continue;
            }
        }

        if matches!(c, 's' | 'S' | 'c' | 'z' | 'Z' | 'j')
            && chars.get(i + 1) == Some(&'T')
            && chars.get(i + 2) == Some(&'C')
        {
            out.push('C');
            i += 3;
            continue;
        }

        if matches!(c, 's' | 'S' | 'z' | 'Z')
            && matches!(chars.get(i + 1), Some(&'t') | Some(&'T') | Some(&'d') | Some(&'D'))
            && matches!(chars.get(i + 2), Some(&'n') | Some(&'N'))
        {
            out.push(c);
            out.push(chars[i + 2]);
            i += 3;
            continue;
        }

        out.push(c);
        i += 1;
    }
    out
}

fn pass4_drop_separators(s: &str) -> String {
    s.chars().filter(|&c| !repertoire::is_separator(c)).collect()
}

/// Pass 5: regressive voicing assimilation. A run of one or two
/// paired-unvoiced phonemes immediately before a paired-voiced trigger
/// (anything but `в`/`V`) voices; a run of one or two paired-voiced phonemes
/// immediately before a paired-unvoiced trigger, or word end, unvoices.
/// Applied once, left to right; a substituted run is never re-examined.
fn pass5_voicing_assimilation(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n);
    let mut i = 0;
    while i < n {
        let c = chars[i];
        if repertoire::is_paired_unvoiced_phoneme(c) {
            if i + 1 < n && repertoire::is_paired_unvoiced_phoneme(chars[i + 1]) && is_voicing_trigger(chars.get(i + 2)) {
                out.push(repertoire::voice(c));
                out.push(repertoire::voice(chars[i + 1]));
                i += 2;
                continue;
            }
            if is_voicing_trigger(chars.get(i + 1)) {
                out.push(repertoire::voice(c));
                i += 1;
                continue;
            }
        } else if repertoire::is_paired_voiced_phoneme(c) {
            if i + 1 < n && repertoire::is_paired_voiced_phoneme(chars[i + 1]) && is_unvoicing_trigger(chars.get(i + 2)) {
                out.push(repertoire::unvoice(c));
                out.push(repertoire::unvoice(chars[i + 1]));
                i += 2;
                continue;
            }
            if is_unvoicing_trigger(chars.get(i + 1)) {
                out.push(repertoire::unvoice(c));
                i += 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

fn is_voicing_trigger(next: Option<&char>) -> bool {
    next.is_some_and(|&c| repertoire::is_paired_voiced_phoneme(c) && c.to_ascii_lowercase() != 'v')
}

fn is_unvoicing_trigger(next: Option<&char>) -> bool {
    match next {
        Some(&c) => repertoire::is_paired_unvoiced_phoneme(c),
        None => true,
    }
}

/// Pass 6: degemination. Two adjacent, case-insensitively identical
/// consonant phonemes collapse to one; if the two differ in case, the
/// palatalized (uppercase) spelling wins.
fn pass6_degeminate(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n);
    let mut i = 0;
    while i < n {
        let c = chars[i];
        if i + 1 < n
            && repertoire::is_consonant_phoneme(c)
            && repertoire::is_consonant_phoneme(chars[i + 1])
            && c.to_ascii_lowercase() == chars[i + 1].to_ascii_lowercase()
        {
            let winner = if c.is_ascii_uppercase() || chars[i + 1].is_ascii_uppercase() { c.to_ascii_uppercase() } else { c };
            out.push(winner);
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonetize_worked_examples() {
        assert_eq!(phonetize("плю'нь"), "pLUN");
        assert_eq!(phonetize("съе'л"), "sYEl");
        assert_eq!(phonetize("почтальо'н"), "paTCtaLYOn");
        assert_eq!(phonetize("ци'рк"), "tsIrk");
        assert_eq!(phonetize("счё'т"), "COt");
        assert_eq!(phonetize("ро'стбиф"), "rOzdBif");
        assert_eq!(phonetize("ле'стница"), "LEsNitsa");
        assert_eq!(phonetize("мета'лл"), "MitAl");
        assert_eq!(phonetize("зло'го"), "zlOva");
        assert_eq!(phonetize("куса'ться"), "kusAtsa");
        assert_eq!(phonetize("бегемо`топодо'бный"), "BiGimotapadObniY");
        assert_eq!(phonetize("колесо'"), "kaLisO");
    }

    #[test]
    fn orthographic_pangram() {
        assert_eq!(
            phonetize("э`кс-гра'ф, плю'ш изъя'т, бьё'м чу'ждый це'н хво'щ"),
            "egzgrAfpLUcYizYAdBYOmTCUjdiYtsEnxvOC"
        );
    }

    #[test]
    fn genitive_ending_is_pronounced_with_v() {
        assert_eq!(phonetize("зло'го"), "zlOva");
        assert!(phonetize("большо'го").ends_with("Ova"));
    }

    #[test]
    fn exactly_one_stressed_vowel_symbol() {
        use crate::repertoire::is_stressed_vowel_phoneme;
        for word in ["плю'нь", "почтальо'н", "ле'стница", "мета'лл", "зло'го"] {
            let trans = phonetize(word);
            assert_eq!(trans.chars().filter(|&c| is_stressed_vowel_phoneme(c)).count(), 1, "{word} -> {trans}");
        }
    }

    #[test]
    fn phonetize_is_stable_under_repeated_normalization() {
        use crate::accent::normalize_accented_spell;
        for word in ["плю'нь", "бегемо`топодо'бный", "ещё"] {
            let once = normalize_accented_spell(word);
            let twice = normalize_accented_spell(&once);
            assert_eq!(phonetize(&once), phonetize(&twice));
        }
    }

    #[test]
    fn every_phoneme_is_ascii() {
        for word in ["плю'нь", "почтальо'н", "ле'стница", "изъя'т", "мета'лл"] {
            assert!(phonetize(word).is_ascii());
        }
    }
}

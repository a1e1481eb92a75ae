//! Rhyme parsing, basic rhyme keys, and normalized rhyme distance over a
//! phonetizer transcription.
//!
//! A transcription is split around its *last* stressed vowel into: leading
//! pretonic syllables, the stressed syllable's onset cluster and vowel,
//! trailing posttonic syllables, and a final consonant-only cluster (if the
//! word ends on consonants). [`basic_rhyme`] reduces this to a short,
//! voicing-blind key; two transcriptions with unequal keys never rhyme.
//! [`rhyme_distance`] scores how close two transcriptions sharing a key are.

use crate::repertoire;

/// One `consonant-cluster + vowel` unit of a transcription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Syllable {
    pub onset: String,
    pub vowel: char,
}

/// The rhyme-relevant structure of a transcription, anchored on its last
/// stressed vowel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rhyme {
    /// Syllables before the stressed syllable's onset, in reading order.
    pub pretonic: Vec<Syllable>,
    /// Consonant cluster immediately before the stressed vowel (may be empty).
    pub stress_onset: String,
    pub stress_vowel: char,
    /// Syllables after the stressed vowel, in reading order.
    pub posttonic: Vec<Syllable>,
    /// Trailing consonant-only cluster with no vowel after it (may be empty).
    pub final_consonants: String,
}

/// Parses `trans` around its last stressed vowel. Returns `None` if `trans`
/// has no stressed vowel (nothing to rhyme on).
pub fn parse(trans: &str) -> Option<Rhyme> {
    let chars: Vec<char> = trans.chars().collect();
    let stress_idx = chars.iter().rposition(|&c| repertoire::is_stressed_vowel_phoneme(c))?;

    let mut onset_start = stress_idx;
    while onset_start > 0 && repertoire::is_consonant_phoneme(chars[onset_start - 1]) {
        onset_start -= 1;
    }
    let stress_onset: String = chars[onset_start..stress_idx].iter().collect();
    let stress_vowel = chars[stress_idx];

    let pretonic = split_syllables(&chars[..onset_start]);
    let rest = &chars[stress_idx + 1..];
    let posttonic = split_syllables(rest);
    let consumed: usize = posttonic.iter().map(|s| s.onset.chars().count() + 1).sum();
    let final_consonants: String = rest[consumed..].iter().collect();

    Some(Rhyme { pretonic, stress_onset, stress_vowel, posttonic, final_consonants })
}

/// Splits a run of phonemes into `consonant-run + vowel` syllables. Any
/// trailing consonant-only remainder (no vowel to close the last syllable)
/// is left unconsumed; callers that care (see [`parse`]'s `final_consonants`)
/// compute it from how much of the slice this function's syllables cover.
fn split_syllables(chars: &[char]) -> Vec<Syllable> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        while i < chars.len() && repertoire::is_consonant_phoneme(chars[i]) {
            i += 1;
        }
        if i < chars.len() && repertoire::is_vowel_phoneme(chars[i]) {
            let onset: String = chars[start..i].iter().collect();
            let vowel = chars[i];
            i += 1;
            out.push(Syllable { onset, vowel });
        } else {
            break;
        }
    }
    out
}

/// The coarse rhyme class of a transcription: two transcriptions with
/// unequal keys are never compared for distance. Voicing is erased from the
/// tail material (the ear doesn't distinguish a word-final devoiced `б` from
/// a `п`), and posttonic vowel *identity* is erased too — only the presence
/// and consonant shape of each posttonic syllable matters, represented by a
/// fixed `i` placeholder per syllable.
pub fn basic_rhyme(trans: &str) -> Option<String> {
    let r = parse(trans)?;
    if !r.posttonic.is_empty() {
        let mut key = String::new();
        key.push(r.stress_vowel);
        for syll in &r.posttonic {
            key.extend(syll.onset.chars().map(repertoire::unvoice));
            key.push('i');
        }
        Some(key)
    } else if !r.final_consonants.is_empty() {
        let mut key = String::new();
        key.push(r.stress_vowel);
        key.extend(r.final_consonants.chars().map(repertoire::unvoice));
        Some(key)
    } else {
        let mut key = String::new();
        if let Some(last) = r.stress_onset.chars().next_back() {
            key.push(last);
        }
        key.push(r.stress_vowel);
        Some(key)
    }
}

/// Query-shaping flags for rhyme distance, all off by default — with every
/// flag `false` the behavior is bit-for-bit what [`rhyme_distance`] computes.
/// A dispatcher (see `rifma_dict::lookup`) surfaces these as user-facing
/// query options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RhymeOptions {
    /// Ignore the trailing consonant cluster entirely (only presence of a
    /// stressed-last-syllable vs. a tail is scored elsewhere, not its shape).
    pub xj: bool,
    /// Treat voicing differences as free everywhere, not just where the
    /// unweighted algorithm already permits it (pretonic, stressed onset).
    pub zv: bool,
    /// Treat unstressed `у`/`а` as equal vowels.
    pub uu: bool,
    /// Treat unstressed `и`/`а` as equal vowels.
    pub yy: bool,
}

const WRONG_VOICENESS_DISTANCE: f64 = 0.5;
const VOWEL_TO_CONS_WEIGHT: f64 = 1.5;
const PRETONIC_EXP_BASE: f64 = 0.7;
const PRETONIC_WEIGHT: f64 = 0.2;
const STRESSED_SYL_CONS_WEIGHT: f64 = 0.8;
const POSTTONIC_WEIGHT: f64 = 1.2;
const FINAL_CONS_WEIGHT: f64 = 1.0;
/// A syllable comparison (cluster + weighted vowel) carries this much weight
/// relative to a plain `[0, 1]` leaf comparison (1 for the cluster, 1.5 for
/// the vowel) — matters when mixing syllable comparisons with flat `1.0`
/// penalties in the same weighted average, see [`rhyme_distance`].
const SYLLABLE_LEAF_WEIGHT: f64 = 1.0 + VOWEL_TO_CONS_WEIGHT;

/// A running weighted-average accumulator: every contribution carries its
/// own weight, and [`Distance::normalized`] is the weighted mean.
#[derive(Clone, Copy, Default)]
struct Distance {
    actual: f64,
    total: f64,
}

impl Distance {
    fn contribute(&mut self, d: f64, weight: f64) {
        self.actual += d * weight;
        self.total += weight;
    }

    fn normalized(self) -> f64 {
        if self.total == 0.0 { 0.0 } else { self.actual / self.total }
    }
}

/// Distance between two phonemes, in `[0, 1]`: `0` if equal, `0.5` if they
/// differ only in voicing and that's permitted here, else `1`. `opts.uu`/
/// `opts.yy` additionally zero the distance between certain unstressed vowel
/// pairs; `opts.zv` permits the voicing exception unconditionally.
fn phon_distance(a: char, b: char, allow_wrong_voiceness: bool, opts: &RhymeOptions) -> f64 {
    if a == b {
        return 0.0;
    }
    if repertoire::is_vowel_phoneme(a) && repertoire::is_vowel_phoneme(b) {
        let (la, lb) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
        if opts.uu && matches!((la, lb), ('u', 'a') | ('a', 'u')) {
            return 0.0;
        }
        if opts.yy && matches!((la, lb), ('i', 'a') | ('a', 'i')) {
            return 0.0;
        }
        return 1.0;
    }
    if (allow_wrong_voiceness || opts.zv)
        && a.is_ascii_uppercase() == b.is_ascii_uppercase()
        && unvoiced_form(a).eq_ignore_ascii_case(&unvoiced_form(b))
    {
        return WRONG_VOICENESS_DISTANCE;
    }
    1.0
}

fn unvoiced_form(c: char) -> char {
    if repertoire::is_paired_voiced_phoneme(c) { repertoire::unvoice(c) } else { c }
}

/// Distance between two consonant clusters, in `[0, 1]`: `1` if their
/// lengths differ, `0` if both are empty, else the mean per-symbol
/// [`phon_distance`].
fn cluster_distance(a: &str, b: &str, allow_wrong_voiceness: bool, opts: &RhymeOptions) -> f64 {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    if a_len != b_len {
        return 1.0;
    }
    if a_len == 0 {
        return 0.0;
    }
    let sum: f64 = a.chars().zip(b.chars()).map(|(x, y)| phon_distance(x, y, allow_wrong_voiceness, opts)).sum();
    sum / a_len as f64
}

/// Distance between two syllables, normalized to `[0, 1]`: onset
/// [`cluster_distance`] and vowel [`phon_distance`] combined with the
/// vowel-to-consonant weight.
fn syllable_distance(a: &Syllable, b: &Syllable, allow_wrong_voiceness: bool, opts: &RhymeOptions) -> f64 {
    let cons = cluster_distance(&a.onset, &b.onset, allow_wrong_voiceness, opts);
    let vow = phon_distance(a.vowel, b.vowel, allow_wrong_voiceness, opts);
    (cons + VOWEL_TO_CONS_WEIGHT * vow) / (1.0 + VOWEL_TO_CONS_WEIGHT)
}

/// Normalized rhyme distance between `query` and `candidate`, in `[0, 1]`,
/// with today's fixed behavior (no query-shaping flags). Assumes
/// `basic_rhyme(query) == basic_rhyme(candidate)` — in particular, that both
/// have the same number of posttonic syllables, since the basic rhyme key
/// encodes that count. Asymmetric in the pretonic syllables: ones present in
/// `candidate` beyond `query`'s count are ignored, but ones present in
/// `query` beyond `candidate`'s count are penalized — callers must always
/// pass the query first.
pub fn rhyme_distance(query: &Rhyme, candidate: &Rhyme) -> f64 {
    rhyme_distance_with_options(query, candidate, &RhymeOptions::default())
}

/// As [`rhyme_distance`], but honoring [`RhymeOptions`]. With every flag
/// `false` this computes exactly the same value as [`rhyme_distance`].
pub fn rhyme_distance_with_options(query: &Rhyme, candidate: &Rhyme, opts: &RhymeOptions) -> f64 {
    let mut acc = Distance::default();

    for i in 0..query.pretonic.len() {
        let a_syll = &query.pretonic[query.pretonic.len() - 1 - i];
        let decay = PRETONIC_EXP_BASE.powi(i as i32);
        if i < candidate.pretonic.len() {
            let b_syll = &candidate.pretonic[candidate.pretonic.len() - 1 - i];
            let d = syllable_distance(a_syll, b_syll, true, opts);
            acc.contribute(d, PRETONIC_WEIGHT * decay * SYLLABLE_LEAF_WEIGHT);
        } else {
            acc.contribute(1.0, PRETONIC_WEIGHT * decay);
        }
    }

    acc.contribute(cluster_distance(&query.stress_onset, &candidate.stress_onset, true, opts), STRESSED_SYL_CONS_WEIGHT);

    for (a, b) in query.posttonic.iter().zip(candidate.posttonic.iter()) {
        let d = syllable_distance(a, b, false, opts);
        acc.contribute(d, POSTTONIC_WEIGHT * SYLLABLE_LEAF_WEIGHT);
    }

    let final_weight = if opts.xj { 0.0 } else { FINAL_CONS_WEIGHT };
    acc.contribute(cluster_distance(&query.final_consonants, &candidate.final_consonants, false, opts), final_weight);

    acc.normalized()
}

/// True if `query` and `candidate` agree, syllable-for-syllable (onset and
/// vowel), on their leftmost `nu` pretonic syllables counted outward from the
/// stress. `nu == 0` always agrees; a side that runs out of pretonic
/// syllables before `nu` is exhausted disagrees. Backs the `nu` lookup flag,
/// which excludes disagreeing candidates rather than merely scoring them
/// worse.
pub fn pretonic_prefix_agrees(query: &Rhyme, candidate: &Rhyme, nu: usize) -> bool {
    (0..nu).all(|i| {
        let a = query.pretonic.len().checked_sub(1 + i).map(|idx| &query.pretonic[idx]);
        let b = candidate.pretonic.len().checked_sub(1 + i).map(|idx| &candidate.pretonic[idx]);
        matches!((a, b), (Some(a), Some(b)) if a == b)
    })
}

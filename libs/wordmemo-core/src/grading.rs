//! Answer grading for quiz sessions.
//!
//! Term recall is graded strictly (case-insensitive equality). Definition
//! recall is graded leniently: both sides are normalized, then accepted on
//! equality, containment, or Levenshtein similarity above
//! [`SIMILARITY_THRESHOLD`].
//!
//! Part-of-speech tags are stripped as whole tokens only: `"n. nice"`
//! normalizes to `"nice"`, and `"nice"` is left as is rather than losing its
//! leading `n`.

use crate::types::QuizMode;
use serde::{Deserialize, Serialize};

/// Minimum similarity (exclusive) for a lenient match.
pub const SIMILARITY_THRESHOLD: f64 = 0.70;

/// Part-of-speech abbreviations stripped before lenient comparison.
pub const POS_ABBREVIATIONS: &[&str] = &[
    "adj", "adv", "n", "vt", "vi", "prep", "conj", "pron", "num", "art", "int",
];

/// How a candidate answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Contained,
    Similar,
    Mismatch,
}

/// Result of grading a candidate answer against the expected one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    pub is_correct: bool,
    pub kind: MatchKind,
    /// Similarity score between 0.0 and 1.0.
    pub similarity: f64,
    /// Normalized candidate (for display).
    pub candidate_normalized: String,
    /// Normalized expected answer (for display).
    pub expected_normalized: String,
}

impl GradeResult {
    fn mismatch(candidate_normalized: String, expected_normalized: String) -> Self {
        Self {
            is_correct: false,
            kind: MatchKind::Mismatch,
            similarity: 0.0,
            candidate_normalized,
            expected_normalized,
        }
    }
}

/// Decide whether `candidate` counts as a correct answer for `expected`.
pub fn is_correct(mode: QuizMode, candidate: &str, expected: &str) -> bool {
    grade(mode, candidate, expected).is_correct
}

/// Grade `candidate` against `expected` using the policy for `mode`.
pub fn grade(mode: QuizMode, candidate: &str, expected: &str) -> GradeResult {
    match mode {
        QuizMode::TermRecall => grade_strict(candidate, expected),
        QuizMode::DefinitionRecall => grade_lenient(candidate, expected),
    }
}

fn grade_strict(candidate: &str, expected: &str) -> GradeResult {
    let a = candidate.trim().to_lowercase();
    let b = expected.trim().to_lowercase();

    if a.is_empty() || b.is_empty() || a != b {
        return GradeResult::mismatch(a, b);
    }

    GradeResult {
        is_correct: true,
        kind: MatchKind::Exact,
        similarity: 1.0,
        candidate_normalized: a,
        expected_normalized: b,
    }
}

fn grade_lenient(candidate: &str, expected: &str) -> GradeResult {
    let a = normalize(candidate);
    let b = normalize(expected);

    if a.is_empty() || b.is_empty() {
        return GradeResult::mismatch(a, b);
    }

    let (kind, similarity) = if a == b {
        (MatchKind::Exact, 1.0)
    } else if a.contains(&b) || b.contains(&a) {
        (MatchKind::Contained, normalized_similarity(&a, &b))
    } else {
        let similarity = normalized_similarity(&a, &b);
        if similarity > SIMILARITY_THRESHOLD {
            (MatchKind::Similar, similarity)
        } else {
            (MatchKind::Mismatch, similarity)
        }
    };

    GradeResult {
        is_correct: kind != MatchKind::Mismatch,
        kind,
        similarity,
        candidate_normalized: a,
        expected_normalized: b,
    }
}

/// Normalize an answer for lenient comparison.
///
/// Lower-cases, removes part-of-speech tokens (with an optional trailing
/// period), then keeps only Latin letters and CJK ideographs.
pub fn normalize(s: &str) -> String {
    strip_abbreviations(&s.to_lowercase())
        .chars()
        .filter(|&c| c.is_ascii_alphabetic() || is_cjk_ideograph(c))
        .collect()
}

fn strip_abbreviations(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() {
        let at_token_start = i == 0 || !chars[i - 1].is_ascii_alphabetic();
        if !(at_token_start && chars[i].is_ascii_alphabetic()) {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut end = i;
        while end < chars.len() && chars[end].is_ascii_alphabetic() {
            end += 1;
        }
        let token: String = chars[i..end].iter().collect();

        if POS_ABBREVIATIONS.contains(&token.as_str()) {
            if chars.get(end) == Some(&'.') {
                end += 1;
            }
        } else {
            out.push_str(&token);
        }
        i = end;
    }

    out
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity in 0.0..=1.0 based on Levenshtein distance over characters.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

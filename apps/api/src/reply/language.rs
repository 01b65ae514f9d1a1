//! Heuristic language detection over recent conversation turns.
//!
//! This is a coarse best-effort guess, not a classifier: it matches fixed
//! hint substrings, so false positives are a known and accepted limitation.
//! The hint lists and the score threshold are tuning constants — changing
//! them changes which conversations resolve to which language.

use crate::reply::models::ChatTurn;

/// How many trailing non-empty turns feed the detector.
const DETECTION_TURNS: usize = 6;

/// A candidate needs at least this many hint hits to decide on its own.
const SCORE_THRESHOLD: usize = 2;

/// Hint lists per language, in tie-break priority order.
const LANGUAGE_HINTS: &[(&str, &[&str])] = &[
    ("es", &["¿", "¡", "hola", "gracias", "por favor", "mañana", "qué"]),
    ("de", &["nicht", "danke", "bitte", "hallo", "schon", "ß"]),
    ("it", &["ciao", "grazie", "bene", "perché", "scusa", "davvero"]),
    ("en", &["hello", "thanks", "please", "sorry", "okay", "tonight"]),
];

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

fn hint_score(sample: &str, hints: &[&str]) -> usize {
    hints.iter().map(|hint| sample.matches(hint).count()).sum()
}

/// Best-guess ISO language code for a conversation, or `None` when
/// undetermined.
///
/// Priority order: Cyrillic anywhere in the sample wins immediately (`ru`);
/// then each candidate turn — most recent first — can decide via inverted
/// punctuation (`es`) or a hint score of at least two; finally a presence
/// scan over the whole sample. Ties break in es → de → it → en order.
pub fn detect_language(turns: &[ChatTurn]) -> Option<&'static str> {
    let sample_turns: Vec<&str> = turns
        .iter()
        .map(|turn| turn.text.as_str())
        .filter(|text| !text.trim().is_empty())
        .collect();
    if sample_turns.is_empty() {
        return None;
    }

    let start = sample_turns.len().saturating_sub(DETECTION_TURNS);
    let recent = &sample_turns[start..];
    let combined = recent.join(" ");

    if combined.chars().any(is_cyrillic) {
        return Some("ru");
    }

    // Most recent turn first, then the earlier turns in original order.
    let (latest, earlier) = recent.split_last()?;
    let candidates = std::iter::once(*latest).chain(earlier.iter().copied());

    for candidate in candidates {
        let lowered = candidate.to_lowercase();

        if lowered.contains('¿') || lowered.contains('¡') {
            return Some("es");
        }

        let mut best: Option<(&'static str, usize)> = None;
        for &(language, hints) in LANGUAGE_HINTS {
            let score = hint_score(&lowered, hints);
            // Strict greater-than keeps the first language on a tied score.
            if score >= SCORE_THRESHOLD && best.map_or(true, |(_, top)| score > top) {
                best = Some((language, score));
            }
        }
        if let Some((language, _)) = best {
            return Some(language);
        }
    }

    let combined_lower = combined.to_lowercase();
    for &(language, hints) in LANGUAGE_HINTS {
        if hints.iter().any(|hint| combined_lower.contains(hint)) {
            return Some(language);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::models::TurnRole;

    fn turns(texts: &[&str]) -> Vec<ChatTurn> {
        texts
            .iter()
            .map(|text| ChatTurn {
                role: TurnRole::Other,
                text: (*text).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_empty_conversation_is_undetermined() {
        assert_eq!(detect_language(&[]), None);
        assert_eq!(detect_language(&turns(&["", "   "])), None);
    }

    #[test]
    fn test_cyrillic_short_circuits_to_russian() {
        assert_eq!(detect_language(&turns(&["Привет, как дела?"])), Some("ru"));
    }

    #[test]
    fn test_cyrillic_wins_over_latin_hint_words() {
        // Hint words for other languages are present, but any Cyrillic
        // character has highest priority.
        assert_eq!(
            detect_language(&turns(&["ciao grazie", "Привет"])),
            Some("ru")
        );
    }

    #[test]
    fn test_inverted_question_mark_decides_spanish() {
        assert_eq!(detect_language(&turns(&["¿Vienes mañana?"])), Some("es"));
    }

    #[test]
    fn test_two_italian_hints_decide_italian() {
        assert_eq!(detect_language(&turns(&["Ciao, grazie mille!"])), Some("it"));
    }

    #[test]
    fn test_most_recent_turn_is_scored_first() {
        // The older turn is German, but the latest turn already reaches the
        // threshold for Italian.
        assert_eq!(
            detect_language(&turns(&["danke, bitte!", "ciao, grazie!"])),
            Some("it")
        );
    }

    #[test]
    fn test_single_hint_falls_back_to_presence_scan() {
        // One hit is below the score threshold, so the decision comes from
        // the whole-sample presence scan.
        assert_eq!(detect_language(&turns(&["grazie!"])), Some("it"));
    }

    #[test]
    fn test_presence_scan_prefers_spanish_first() {
        // One Spanish hint and one English hint, neither reaching the
        // threshold: priority order makes it Spanish.
        assert_eq!(
            detect_language(&turns(&["hola", "tonight"])),
            Some("es")
        );
    }

    #[test]
    fn test_hintless_text_is_undetermined() {
        assert_eq!(detect_language(&turns(&["zzz 123 !!"])), None);
    }

    #[test]
    fn test_only_last_six_nonempty_turns_are_sampled() {
        // The Russian turn is pushed out of the 6-turn window by later turns.
        let conversation = turns(&[
            "Привет",
            "one", "two", "three", "four", "five", "ciao grazie",
        ]);
        assert_eq!(detect_language(&conversation), Some("it"));
    }
}

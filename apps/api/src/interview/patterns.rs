//! Deterministic answer patterns: short-circuit phrases, non-answers, and word counting.
//!
//! Regexes are compiled once and cached in `OnceLock`s.

use std::sync::OnceLock;

use regex::Regex;

/// Answers at or under this many words may end the turn with a weak closing phrase.
const SHORT_ANSWER_WORDS: usize = 8;

/// Setup acknowledgements longer than this are treated as real answers.
const SETUP_ACK_MAX_WORDS: usize = 12;

struct Patterns {
    /// Explicit requests to move on, valid anywhere in the answer.
    move_on: Regex,
    /// Closing phrases that only mean "move on" in a short answer ("I'm done").
    closing: Regex,
    setup_ack: Regex,
    bare_non_answer: Regex,
    non_answer_phrase: Regex,
    concrete_experience: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        move_on: Regex::new(
            r"(?i)\b(?:let'?s|lets|can\s+we|could\s+we|we\s+can|please)\s+(?:move|go)\s+(?:on|forward|ahead)\b|\bmove\s+on\s+to\s+the\s+next\b|\bnext\s+question\b|\bskip\s+(?:this|that|the)\s+question\b",
        )
        .expect("valid move-on regex"),
        closing: Regex::new(
            r"(?i)\b(?:i'?m|i\s+am)\s+(?:done|finished)\b|\bthat'?s\s+(?:all|it)\b|\bthat\s+is\s+(?:all|it)\b|\bnothing\s+(?:else|more)\s+to\s+add\b",
        )
        .expect("valid closing-phrase regex"),
        setup_ack: Regex::new(
            r"(?i)^(?:(?:yes|yeah|yep|yup|sure|ok(?:ay)?|hi|hello)[\s,.!]*)*(?:i\s+can\s+(?:hear|see)\s+you|(?:the\s+)?(?:audio|sound|video|mic(?:rophone)?|camera)\s+(?:is\s+)?(?:working|fine|good|ok(?:ay)?)|loud\s+and\s+clear|(?:i'?m|i\s+am)\s+ready)",
        )
        .expect("valid setup-acknowledgement regex"),
        bare_non_answer: Regex::new(
            r"(?i)^(?:yes|yeah|yep|yup|no|nope|nah|ok(?:ay)?|sure|maybe|nothing|n/?a|hmm+|um+)[\s.!?,]*$",
        )
        .expect("valid bare non-answer regex"),
        non_answer_phrase: Regex::new(
            r"(?i)\b(?:i\s+(?:don'?t|do\s+not)\s+know|not\s+sure|no\s+idea|(?:can'?t|cannot)\s+(?:say|remember|recall)|idk|dunno|no\s+comment|pass)\b",
        )
        .expect("valid non-answer phrase regex"),
        concrete_experience: Regex::new(
            r"(?i)\b(?:i\s+(?:have\s+|had\s+)?(?:used|built|wrote|written|developed|designed|implemented|deployed|led|managed|migrated|created|maintained|shipped|worked\s+(?:on|with))|years?\s+of|in\s+my\s+(?:last|previous|current)\s+(?:role|job|position|team)|at\s+my\s+(?:last|previous|current)\s+(?:company|job|employer))\b",
        )
        .expect("valid concrete-experience regex"),
    })
}

/// Trims and folds typographic apostrophes so `I’m` matches `I'm`.
pub fn normalize(answer: &str) -> String {
    answer.trim().replace(['\u{2019}', '\u{2018}'], "'")
}

pub fn word_count(answer: &str) -> usize {
    answer.split_whitespace().count()
}

/// Words longer than two characters once surrounding punctuation is stripped.
pub fn content_word_count(answer: &str) -> usize {
    answer
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() > 2)
        .count()
}

/// The candidate explicitly asked to move on.
pub fn is_move_on(answer: &str) -> bool {
    let p = patterns();
    p.move_on.is_match(answer)
        || (word_count(answer) <= SHORT_ANSWER_WORDS && p.closing.is_match(answer))
}

/// "Yes, I can hear you" style confirmations from the environment check.
pub fn is_setup_acknowledgement(answer: &str) -> bool {
    word_count(answer) <= SETUP_ACK_MAX_WORDS && patterns().setup_ack.is_match(answer.trim())
}

/// Empty, a one-word yes/no, or a stock "I don't know".
pub fn is_non_answer(answer: &str) -> bool {
    let answer = answer.trim();
    if answer.is_empty() {
        return true;
    }
    let p = patterns();
    p.bare_non_answer.is_match(answer) || p.non_answer_phrase.is_match(answer)
}

/// Below this many content words a non-answer phrase is taken at face value.
pub const NON_ANSWER_MAX_CONTENT_WORDS: usize = 5;

/// A non-answer with nothing else in it. "I'm not sure, but in my last role I..."
/// carries real content and is not one.
pub fn is_genuine_non_answer(answer: &str) -> bool {
    is_non_answer(answer) && content_word_count(answer) < NON_ANSWER_MAX_CONTENT_WORDS
}

/// Names a tool or a first-hand experience: a digit, a capitalised term that does
/// not start a sentence, or an "I built / years of" style phrase.
pub fn mentions_concrete_experience(answer: &str) -> bool {
    if answer.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    if patterns().concrete_experience.is_match(answer) {
        return true;
    }

    let mut sentence_start = true;
    for raw in answer.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let capitalised = word.chars().next().is_some_and(|c| c.is_uppercase());
        if capitalised && !sentence_start && word != "I" && !word.starts_with("I'") {
            return true;
        }
        sentence_start = raw.ends_with(['.', '!', '?']);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hedged_answer_with_content_is_not_genuine_non_answer() {
        assert!(is_genuine_non_answer("I don't know"));
        assert!(is_genuine_non_answer("no idea, sorry"));
        assert!(is_genuine_non_answer(""));
        assert!(!is_genuine_non_answer(
            "I'm not sure this is what you mean, but I designed the retry logic for payments"
        ));
    }

    #[test]
    fn test_move_on_phrases() {
        for answer in [
            "Let's move forward.",
            "can we move on please",
            "Next question",
            "I'm done",
            "I am finished.",
            "That's all",
            "ok, nothing else to add",
            "Could we skip this question?",
        ] {
            assert!(is_move_on(&normalize(answer)), "expected move-on: {answer}");
        }
    }

    #[test]
    fn test_curly_apostrophe_is_normalized() {
        assert!(is_move_on(&normalize("I\u{2019}m done")));
    }

    #[test]
    fn test_closing_phrase_inside_long_answer_is_not_move_on() {
        let answer = "When I'm done with a feature I always write integration tests and then pair with QA on the rollout";
        assert!(!is_move_on(answer));
    }

    #[test]
    fn test_setup_acknowledgements() {
        assert!(is_setup_acknowledgement("Yes, I can hear you"));
        assert!(is_setup_acknowledgement("yeah the audio is working"));
        assert!(is_setup_acknowledgement("Loud and clear!"));
        assert!(is_setup_acknowledgement("Hi! I'm ready"));
        assert!(!is_setup_acknowledgement("I led a team of five engineers"));
    }

    #[test]
    fn test_non_answers() {
        assert!(is_non_answer(""));
        assert!(is_non_answer("Yes."));
        assert!(is_non_answer("no"));
        assert!(is_non_answer("I don't know"));
        assert!(is_non_answer("Honestly, not sure"));
        assert!(!is_non_answer("I designed the billing service in Go"));
    }

    #[test]
    fn test_content_word_count_ignores_short_words_and_punctuation() {
        assert_eq!(content_word_count("I don't know"), 2);
        assert_eq!(content_word_count("I am a dev, ok?"), 1);
        assert_eq!(content_word_count("Kubernetes, Terraform, AWS."), 3);
    }

    #[test]
    fn test_concrete_experience_detection() {
        assert!(mentions_concrete_experience("I used it for 3 projects"));
        assert!(mentions_concrete_experience("mostly with Postgres and some caching"));
        assert!(mentions_concrete_experience("i built the ingestion pipeline myself"));
        assert!(!mentions_concrete_experience("It depends. I think it is important."));
    }
}

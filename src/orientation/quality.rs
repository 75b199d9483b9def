//! Heuristic quality scoring for vision and current-reality statements.
//!
//! Both scorers start at 5, apply every adjustment independently, and clamp
//! the sum into `[1, 10]`. Lengths are measured in characters.

use super::types::{SCORE_MAX, SCORE_MIN};
use crate::patterns::matcher::contains_any;
use crate::patterns::{PatternCategory, PatternDictionary};

const BASE_SCORE: i32 = 5;

pub fn score_vision(text: &str, dict: &PatternDictionary) -> i32 {
    let mut score = BASE_SCORE;
    if text.chars().count() > 50 {
        score += 1;
    }
    if contains_any(text, dict.terms(PatternCategory::VisionAction)) {
        score += 1;
    }
    if !contains_any(text, dict.terms(PatternCategory::VisionNegative)) {
        score += 2;
    }
    if contains_any(text, dict.terms(PatternCategory::CreativeVocabulary)) {
        score += 2;
    }
    if contains_any(text, dict.terms(PatternCategory::ProblemVocabulary)) {
        score -= 3;
    }
    score.clamp(SCORE_MIN, SCORE_MAX)
}

pub fn score_reality(text: &str, dict: &PatternDictionary) -> i32 {
    let mut score = BASE_SCORE;
    let len = text.chars().count();
    if len > 30 {
        score += 1;
    }
    if len > 100 {
        score += 1;
    }
    if contains_any(text, dict.terms(PatternCategory::ObjectiveReality)) {
        score += 1;
    }
    if contains_any(text, dict.terms(PatternCategory::JudgmentalReality)) {
        score -= 2;
    }
    if contains_any(text, dict.terms(PatternCategory::FutureTenseReality)) {
        score -= 1;
    }
    score.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> &'static PatternDictionary {
        PatternDictionary::builtin()
    }

    #[test]
    fn creative_vision_scores_high() {
        assert_eq!(score_vision("Establish a thriving community garden", dict()), 9);
    }

    #[test]
    fn problem_vision_scores_low() {
        // base 5, "fix"/"problem" block the +2, problem vocabulary -3
        assert_eq!(score_vision("Fix the problem", dict()), 2);
    }

    #[test]
    fn vision_score_is_clamped_to_ten() {
        let text = "Create and design a studio where we develop and realize the art we love most";
        assert_eq!(score_vision(text, dict()), 10);
    }

    #[test]
    fn objective_reality_gets_length_and_language_bonus() {
        assert_eq!(
            score_reality("We currently have an empty lot and no funding", dict()),
            7
        );
    }

    #[test]
    fn long_reality_gets_cumulative_length_bonus() {
        let text = "x".repeat(120);
        assert_eq!(score_reality(&text, dict()), 7);
        assert_eq!(score_reality(&"x".repeat(40), dict()), 6);
        assert_eq!(score_reality("short", dict()), 5);
    }

    #[test]
    fn judgment_and_future_language_lower_reality() {
        // "bad" -2, "will" -1
        assert_eq!(score_reality("It is bad. We will see.", dict()), 2);
    }

    #[test]
    fn scores_stay_in_bounds() {
        for text in ["", "stop avoid prevent", "terrible awful, we must and will go"] {
            let v = score_vision(text, dict());
            let r = score_reality(text, dict());
            assert!((SCORE_MIN..=SCORE_MAX).contains(&v));
            assert!((SCORE_MIN..=SCORE_MAX).contains(&r));
        }
    }
}

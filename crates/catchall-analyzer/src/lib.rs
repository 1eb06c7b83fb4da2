//! Catch-all disambiguation: pattern scoring, name-likeness scoring, and
//! z-score timing comparison, fused into the confidence contribution the
//! orchestrator adds when a domain turns out to accept any recipient.
//!
//! The z-score variant is authoritative — it is what the orchestrator
//! calls. `legacy_weighted_confidence` is kept as an alternate entry point
//! for callers who want the older weighted-sum scheme, but nothing in this
//! workspace drives its public confidence from it.

mod names;

use regex::Regex;
use std::sync::LazyLock;
use verify_types::CatchAllSignals;

struct PatternRule {
    regex: Regex,
    score: f64,
    name: &'static str,
}

// Order matters: the first matching rule wins, and higher-scoring rules
// must appear earlier so a string that could satisfy several shapes gets
// the most specific one.
static PATTERN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule { regex: Regex::new(r"^[a-z]+\.[a-z]+$").unwrap(), score: 0.90, name: "first.last" },
        PatternRule { regex: Regex::new(r"^[a-z]+\.[a-z]\.[a-z]+$").unwrap(), score: 0.90, name: "first.m.last" },
        PatternRule { regex: Regex::new(r"^[a-z]+_[a-z]+$").unwrap(), score: 0.85, name: "first_last" },
        PatternRule { regex: Regex::new(r"^[a-z]+-[a-z]+$").unwrap(), score: 0.85, name: "first-last" },
        PatternRule { regex: Regex::new(r"^[a-z]{4,}[a-z]{3,}$").unwrap(), score: 0.70, name: "firstlast" },
        PatternRule { regex: Regex::new(r"^[a-z][a-z]{3,}$").unwrap(), score: 0.60, name: "flast" },
        PatternRule { regex: Regex::new(r"^[a-z]{3,}[a-z]$").unwrap(), score: 0.50, name: "firstl" },
    ]
});

static SINGLE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]{3,12}$").unwrap());

/// Scores a local part's resemblance to a human-name pattern, returning the
/// score and the name of the pattern (or fallback category) that matched.
pub fn pattern_score(local: &str) -> (f64, Option<String>) {
    let folded = local.to_lowercase();
    if folded.is_empty() {
        return (0.0, None);
    }

    for rule in PATTERN_RULES.iter() {
        if rule.regex.is_match(&folded) {
            return (rule.score, Some(rule.name.to_string()));
        }
    }

    let tokens: Vec<&str> = folded.split(['.', '_', '-']).filter(|t| !t.is_empty()).collect();
    if tokens.iter().any(|t| names::is_known_first_name(t)) {
        return (0.60, Some("contains_name".to_string()));
    }
    if SINGLE_WORD.is_match(&folded) {
        return (0.40, Some("single_word".to_string()));
    }
    if folded.chars().any(|c| c.is_ascii_digit()) {
        return (0.20, Some("contains_numbers".to_string()));
    }
    (0.30, Some("unknown".to_string()))
}

/// Scores how closely a local part resembles an actual personal name.
pub fn name_score(local: &str) -> f64 {
    let folded = local.to_lowercase();
    if folded.is_empty() {
        return 0.0;
    }

    let parts: Vec<&str> = folded.split(['.', '_', '-']).filter(|t| !t.is_empty()).collect();
    if parts.len() >= 2 {
        let alphabetic_sized = |s: &str| s.chars().all(|c| c.is_ascii_lowercase()) && (2..=15).contains(&s.len());
        if alphabetic_sized(parts[0]) && alphabetic_sized(parts[1]) {
            return if names::is_known_first_name(parts[0]) { 0.95 } else { 0.75 };
        }
    }

    if names::is_known_first_name(&folded) {
        return 0.70;
    }
    if SINGLE_WORD.is_match(&folded) {
        return 0.50;
    }
    if folded.chars().any(|c| c.is_ascii_digit() || !matches!(c, 'a'..='z' | '.' | '_' | '-')) {
        return 0.20;
    }
    0.30
}

/// The z-score timing band: confidence, the z value (when computable), and
/// a human-readable reason.
pub struct TimingBand {
    pub confidence: f64,
    pub z_score: Option<f64>,
    pub reason: &'static str,
}

/// Compares average RCPT-TO timing for the real recipient against the
/// synthetic catch-all probe, per `σ̂ = max(0.3 · fakeAvg, 30)`,
/// `z = |realAvg − fakeAvg| / σ̂`.
pub fn timing_zscore_band(real_avg: f64, fake_avg: f64) -> TimingBand {
    if real_avg <= 0.0 || fake_avg <= 0.0 {
        return TimingBand { confidence: 0.50, z_score: None, reason: "insufficient timing data" };
    }

    let sigma = (0.3 * fake_avg).max(30.0);
    let z = (real_avg - fake_avg).abs() / sigma;

    let (confidence, reason) = if z > 5.0 {
        (0.85, "very strong timing difference")
    } else if z > 3.0 {
        (0.75, "strong timing difference")
    } else if z > 2.0 {
        (0.65, "moderate timing difference")
    } else {
        (0.50, "no significant timing difference")
    };

    TimingBand { confidence, z_score: Some(z), reason }
}

/// The adjustment applied to the z-score band when a domain is a confirmed
/// catch-all. Never positive.
pub fn pattern_penalty(pattern_score: f64, name_score: f64) -> f64 {
    if pattern_score >= 0.70 {
        0.0
    } else if pattern_score >= 0.50 {
        if name_score >= 0.70 { 0.0 } else { -0.05 }
    } else if pattern_score >= 0.30 {
        if name_score >= 0.70 { -0.10 } else { -0.15 }
    } else {
        -0.25
    }
}

/// Assembles the catch-all confidence contribution: z-score band as the
/// base, pattern penalty applied, clamped to `[0, 0.85]`. SPF/DMARC and MX
/// count do not factor into the number, only into the narrative.
pub fn catchall_confidence(band: &TimingBand, pattern_score: f64, name_score: f64) -> f64 {
    (band.confidence + pattern_penalty(pattern_score, name_score)).clamp(0.0, 0.85)
}

/// Builds the full signal bundle reported alongside a verification result.
pub fn build_signals(
    local: &str,
    real_avg: f64,
    fake_avg: f64,
    mx_count: usize,
    has_spf: bool,
    has_dmarc: bool,
) -> CatchAllSignals {
    let (pattern_match, pattern_name) = pattern_score(local);
    let name_score = name_score(local);
    let band = timing_zscore_band(real_avg, fake_avg);

    CatchAllSignals {
        pattern_match,
        pattern_name,
        name_score,
        timing_score: band.confidence,
        z_score: band.z_score,
        has_spf,
        has_dmarc,
        mx_count,
        timing_analysis: Some(band.reason.to_string()),
    }
}

/// A legacy weighted-sum analyzer, retained as an alternate entry point.
/// Not used by the orchestrator — `catchall_confidence` (the z-score
/// variant) is authoritative. Weights here are deliberately coarse: pattern
/// and timing dominate, SPF/DMARC and MX count contribute only a small
/// trust adjustment.
pub fn legacy_weighted_confidence(signals: &CatchAllSignals) -> f64 {
    let mut score = 0.40 * signals.pattern_match + 0.25 * signals.name_score + 0.25 * signals.timing_score;
    if signals.has_spf {
        score += 0.05;
    }
    if signals.has_dmarc {
        score += 0.05;
    }
    if signals.mx_count == 0 {
        score *= 0.5;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_first_dot_last_pattern() {
        let (score, name) = pattern_score("jane.smith");
        assert_eq!(score, 0.90);
        assert_eq!(name.as_deref(), Some("first.last"));
    }

    #[test]
    fn scores_first_middle_last_pattern() {
        let (score, name) = pattern_score("jane.m.smith");
        assert_eq!(score, 0.90);
        assert_eq!(name.as_deref(), Some("first.m.last"));
    }

    #[test]
    fn scores_underscore_and_hyphen_patterns() {
        assert_eq!(pattern_score("jane_smith").0, 0.85);
        assert_eq!(pattern_score("jane-smith").0, 0.85);
    }

    #[test]
    fn falls_back_to_contains_name_when_no_pattern_matches() {
        let (score, name) = pattern_score("x1.jane.9");
        assert_eq!(score, 0.60);
        assert_eq!(name.as_deref(), Some("contains_name"));
    }

    #[test]
    fn falls_back_to_contains_numbers() {
        let (score, name) = pattern_score("a1b2!!");
        assert_eq!(score, 0.20);
        assert_eq!(name.as_deref(), Some("contains_numbers"));
    }

    #[test]
    fn empty_local_part_scores_zero() {
        assert_eq!(pattern_score("").0, 0.0);
        assert_eq!(name_score(""), 0.0);
    }

    #[test]
    fn name_score_rewards_known_first_name_in_two_part_split() {
        assert_eq!(name_score("jane.smith"), 0.95);
        assert_eq!(name_score("zyx.qvw"), 0.75);
    }

    #[test]
    fn name_score_recognizes_whole_first_name() {
        assert_eq!(name_score("jane"), 0.70);
    }

    #[test]
    fn timing_band_insufficient_data_when_either_average_is_zero() {
        let band = timing_zscore_band(0.0, 100.0);
        assert_eq!(band.confidence, 0.50);
        assert!(band.z_score.is_none());
    }

    #[test]
    fn timing_band_very_strong_above_z_five() {
        // sigma = max(0.3*100, 30) = 30; z = |400-100|/30 = 10
        let band = timing_zscore_band(400.0, 100.0);
        assert_eq!(band.confidence, 0.85);
        assert!(band.z_score.unwrap() > 5.0);
    }

    #[test]
    fn timing_band_no_signal_for_close_averages() {
        let band = timing_zscore_band(105.0, 100.0);
        assert_eq!(band.confidence, 0.50);
    }

    #[test]
    fn pattern_penalty_is_zero_for_good_patterns() {
        assert_eq!(pattern_penalty(0.90, 0.30), 0.0);
    }

    #[test]
    fn pattern_penalty_grows_as_pattern_and_name_weaken() {
        assert_eq!(pattern_penalty(0.60, 0.30), -0.05);
        assert_eq!(pattern_penalty(0.60, 0.80), 0.0);
        assert_eq!(pattern_penalty(0.40, 0.30), -0.15);
        assert_eq!(pattern_penalty(0.40, 0.80), -0.10);
        assert_eq!(pattern_penalty(0.10, 0.90), -0.25);
    }

    #[test]
    fn catchall_confidence_clamps_to_band() {
        let band = TimingBand { confidence: 0.85, z_score: Some(10.0), reason: "very strong timing difference" };
        assert_eq!(catchall_confidence(&band, 0.20, 0.10), 0.60);
    }

    #[test]
    fn legacy_analyzer_is_independent_of_zscore_path() {
        let signals = CatchAllSignals {
            pattern_match: 0.9,
            pattern_name: Some("first.last".into()),
            name_score: 0.9,
            timing_score: 0.85,
            z_score: Some(10.0),
            has_spf: true,
            has_dmarc: true,
            mx_count: 2,
            timing_analysis: None,
        };
        let legacy = legacy_weighted_confidence(&signals);
        assert!(legacy > 0.8 && legacy <= 1.0);
    }
}

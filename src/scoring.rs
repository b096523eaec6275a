use serde::{Deserialize, Serialize};

/// How the match count is reduced to a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum ScoringFormula {
    /// `matches / (len_ref * fine) * 100`, where
    /// `fine = 1 + |len_ref - len_act| / len_ref` penalises length mismatch.
    #[default]
    LengthPenalized,
    /// `(len_ref - mistakes) / len_ref * 100`, or `0` when nothing was said.
    /// Clamped to `[0, 100]` since insertions can outnumber reference tokens.
    Legacy,
}

/// Inputs of the scoring step. `reference_len` must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInput {
    pub reference_len: usize,
    pub actual_len: usize,
    pub matches: usize,
    pub mistakes: usize,
}

pub fn accuracy(formula: ScoringFormula, input: ScoreInput) -> f64 {
    debug_assert!(input.reference_len > 0);
    let len_ref = input.reference_len as f64;
    let raw = match formula {
        ScoringFormula::LengthPenalized => {
            let len_act = input.actual_len as f64;
            let fine = 1.0 + (len_ref - len_act).abs() / len_ref;
            input.matches as f64 / (len_ref * fine) * 100.0
        }
        ScoringFormula::Legacy if input.actual_len == 0 => 0.0,
        ScoringFormula::Legacy => {
            let correct = len_ref - input.mistakes as f64;
            (correct / len_ref * 100.0).clamp(0.0, 100.0)
        }
    };
    round_to_hundredths(raw)
}

/// Rounds to two decimals, exact halves going to the even neighbour
/// (`28.125` becomes `28.12`, `28.135` becomes `28.14`).
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

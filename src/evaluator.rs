//! Reference vs. actual transcript evaluation.
//!
//! Every call is a pure function of its arguments: tokens, the cost table
//! and the report are created per call and nothing is retained afterwards,
//! so concurrent evaluations need no coordination.

use tracing::debug;

use crate::alignment::{align, Alignment};
use crate::error::EvaluationError;
use crate::mistakes::detect_mistakes;
use crate::scoring::{accuracy, ScoreInput, ScoringFormula};
use crate::tokenizer::tokenize;
use crate::types::Report;

pub type Result<T> = std::result::Result<T, EvaluationError>;

/// A report together with the alignment it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub report: Report,
    pub alignment: Alignment,
    pub matches: usize,
    pub reference_len: usize,
    pub actual_len: usize,
}

/// Scores `actual` against `reference` with the length-penalized formula.
///
/// Fails with [`EvaluationError::InvalidInput`] when `reference` contains no
/// tokens.
pub fn evaluate(reference: &str, actual: &str) -> Result<Report> {
    evaluate_with(ScoringFormula::default(), reference, actual).map(|e| e.report)
}

pub fn evaluate_with(formula: ScoringFormula, reference: &str, actual: &str) -> Result<Evaluation> {
    let reference = tokenize(reference);
    if reference.is_empty() {
        return Err(EvaluationError::InvalidInput);
    }
    let actual = tokenize(actual);

    let alignment = align(&reference, &actual);
    let detection = detect_mistakes(&alignment.operations, &reference, &actual);
    let accuracy = accuracy(
        formula,
        ScoreInput {
            reference_len: reference.len(),
            actual_len: actual.len(),
            matches: detection.matches,
            mistakes: detection.mistakes.len(),
        },
    );
    debug!(
        reference_len = reference.len(),
        actual_len = actual.len(),
        matches = detection.matches,
        mistakes = detection.mistakes.len(),
        accuracy,
        "evaluated pronunciation"
    );

    Ok(Evaluation {
        report: Report {
            accuracy,
            mistakes: detection.mistakes,
        },
        alignment,
        matches: detection.matches,
        reference_len: reference.len(),
        actual_len: actual.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MistakeKind;

    #[test]
    fn identity_is_perfect() {
        let report = evaluate("a b c", "a b c").unwrap();
        assert_eq!(report.accuracy, 100.0);
        assert!(report.mistakes.is_empty());
    }

    #[test]
    fn pure_substitution() {
        let report = evaluate("a b c", "a x c").unwrap();
        assert_eq!(report.accuracy, 66.67);
        assert_eq!(report.mistakes.len(), 1);
        let mistake = &report.mistakes[0];
        assert_eq!(mistake.kind, MistakeKind::Replacement);
        assert_eq!(mistake.reference.as_ref().unwrap().position, 1);
        assert_eq!(mistake.reference.as_ref().unwrap().value, "b");
        assert_eq!(mistake.actual.as_ref().unwrap().value, "x");
    }

    #[test]
    fn pure_deletion() {
        let report = evaluate("a b c", "a c").unwrap();
        assert_eq!(report.accuracy, 50.0);
        assert_eq!(report.mistakes[0].kind, MistakeKind::Deletion);
        assert!(report.mistakes[0].actual.is_none());
    }

    #[test]
    fn pure_insertion() {
        let report = evaluate("a b", "a b c").unwrap();
        assert_eq!(report.accuracy, 66.67);
        assert_eq!(report.mistakes[0].kind, MistakeKind::Insertion);
        assert!(report.mistakes[0].reference.is_none());
        assert_eq!(report.mistakes[0].actual.as_ref().unwrap().position, 2);
    }

    #[test]
    fn empty_reference_is_invalid() {
        assert_eq!(evaluate("", "a b"), Err(EvaluationError::InvalidInput));
        assert_eq!(evaluate(" \n\t", ""), Err(EvaluationError::InvalidInput));
    }

    #[test]
    fn empty_actual_scores_zero() {
        let report = evaluate("a b", "").unwrap();
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.mistakes.len(), 2);
    }

    #[test]
    fn legacy_formula_is_selectable() {
        let evaluation = evaluate_with(ScoringFormula::Legacy, "a b", "a b c").unwrap();
        assert_eq!(evaluation.report.accuracy, 50.0);
        assert_eq!(evaluation.matches, 2);
        assert_eq!(evaluation.alignment.distance, 1);
    }
}

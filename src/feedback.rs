//! Request handling around the evaluator: reference lookup, input size
//! guard and the response shape returned to callers.

use serde::{Deserialize, Serialize};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::FeedbackError;
use crate::evaluator::{evaluate_with, Evaluation};
use crate::reference::ReferenceSource;
use crate::scoring::ScoringFormula;
use crate::settings::Settings;
use crate::tokenizer::TokenParser;
use crate::types::{Mistake, Report};

pub type Result<T> = std::result::Result<T, FeedbackError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub text_id: Uuid,
    /// Phonetic transcription of what was actually said.
    pub actual_result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub accuracy: f64,
    pub mistakes: Vec<Mistake>,
}

impl From<Report> for FeedbackResponse {
    fn from(report: Report) -> Self {
        Self {
            accuracy: report.accuracy,
            mistakes: report.mistakes,
        }
    }
}

/// Rejects inputs whose cost table would have more than `limit` cells,
/// counting `len(reference) * len(actual)`. A `limit` of zero disables the
/// check.
pub fn check_alignment_size(reference: &str, actual: &str, limit: usize) -> Result<()> {
    if limit == 0 {
        return Ok(());
    }
    let cells = TokenParser::parse(reference)
        .count()
        .saturating_mul(TokenParser::parse(actual).count());
    if cells > limit {
        warn!(cells, limit, "rejecting oversized alignment");
        return Err(FeedbackError::ResourceExhausted { cells, limit });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationPolicy {
    pub formula: ScoringFormula,
    pub max_alignment_cells: usize,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for EvaluationPolicy {
    fn from(settings: &Settings) -> Self {
        Self {
            formula: settings.scoring,
            max_alignment_cells: settings.max_alignment_cells,
        }
    }
}

impl EvaluationPolicy {
    pub fn evaluate(&self, reference: &str, actual: &str) -> Result<Evaluation> {
        check_alignment_size(reference, actual, self.max_alignment_cells)?;
        Ok(evaluate_with(self.formula, reference, actual)?)
    }
}

pub struct FeedbackService<S> {
    references: S,
    policy: EvaluationPolicy,
}

impl<S: ReferenceSource> FeedbackService<S> {
    pub fn new(references: S, policy: EvaluationPolicy) -> Self {
        Self { references, policy }
    }

    /// Resolves the reference text and scores the transcription against it.
    ///
    /// The lookup is the only step that waits; scoring runs to completion
    /// once the reference is known.
    pub async fn handle(&self, request: &FeedbackRequest) -> Result<FeedbackResponse> {
        let span = info_span!("feedback", text_id = %request.text_id);
        async {
            let reference = self
                .references
                .transcription(request.text_id)
                .await
                .inspect_err(|e| warn!(error = %e, "reference lookup failed"))?;
            let evaluation = self.policy.evaluate(&reference, &request.actual_result)?;
            Ok::<_, FeedbackError>(FeedbackResponse::from(evaluation.report))
        }
        .instrument(span)
        .await
    }
}

//! Pronunciation feedback: aligns a spoken phonetic transcription against a
//! reference transcription, classifies the differences and scores them.
//!
//! ```
//! use phonetic_feedback::{evaluate, MistakeKind};
//!
//! let report = evaluate("a b c", "a x c").unwrap();
//! assert_eq!(report.accuracy, 66.67);
//! assert_eq!(report.mistakes[0].kind, MistakeKind::Replacement);
//! ```

pub mod alignment;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod logging;
pub mod mistakes;
pub mod reference;
pub mod scoring;
pub mod settings;
pub mod tokenizer;
pub mod types;

pub use alignment::{align, Alignment, CostTable};
pub use error::{EvaluationError, FeedbackError, ReferenceError, SettingsError};
pub use evaluator::{evaluate, evaluate_with, Evaluation};
pub use feedback::{EvaluationPolicy, FeedbackRequest, FeedbackResponse, FeedbackService};
pub use mistakes::{detect_mistakes, Detection};
pub use reference::{DirectoryReferences, HttpReferences, InMemoryReferences, ReferenceSource};
pub use scoring::ScoringFormula;
pub use settings::Settings;
pub use tokenizer::tokenize;
pub use types::{AlignmentOperation, Mistake, MistakeKind, PositionedToken, Report};

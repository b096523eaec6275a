use serde::{Deserialize, Serialize};

pub trait Token {
    fn text(&self) -> &str;
    /// Zero-based index of the token within its own sequence.
    fn position(&self) -> usize;
}

/// One step of a global alignment between a reference and an actual sequence.
///
/// Operations carry no payload: which tokens they refer to follows from the
/// running cursors while walking the sequence from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentOperation {
    Match,
    Replacement,
    Insertion,
    Deletion,
}

impl AlignmentOperation {
    /// `Match`, `Replacement` and `Deletion` consume a reference token.
    pub fn advances_reference(self) -> bool {
        !matches!(self, AlignmentOperation::Insertion)
    }

    /// `Match`, `Replacement` and `Insertion` consume an actual token.
    pub fn advances_actual(self) -> bool {
        !matches!(self, AlignmentOperation::Deletion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MistakeKind {
    Replacement,
    Insertion,
    Deletion,
}

impl From<MistakeKind> for AlignmentOperation {
    fn from(kind: MistakeKind) -> Self {
        match kind {
            MistakeKind::Replacement => AlignmentOperation::Replacement,
            MistakeKind::Insertion => AlignmentOperation::Insertion,
            MistakeKind::Deletion => AlignmentOperation::Deletion,
        }
    }
}

/// An owned copy of a token, as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedToken {
    pub position: usize,
    pub value: String,
}

impl PositionedToken {
    pub fn from_token<T: Token>(token: &T) -> Self {
        Self {
            position: token.position(),
            value: token.text().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    /// Absent for insertions.
    pub reference: Option<PositionedToken>,
    /// Absent for deletions.
    pub actual: Option<PositionedToken>,
    #[serde(rename = "type")]
    pub kind: MistakeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Percentage in `[0, 100]`, rounded to two decimals.
    pub accuracy: f64,
    pub mistakes: Vec<Mistake>,
}

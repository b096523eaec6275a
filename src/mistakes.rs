use crate::types::{AlignmentOperation, Mistake, MistakeKind, PositionedToken, Token};

/// Result of walking an operation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Detection {
    pub mistakes: Vec<Mistake>,
    pub matches: usize,
}

/// Emits one mistake per non-matching operation, in alignment order.
///
/// `operations` must have been produced by aligning `reference` against
/// `actual`; a cursor that runs past its sequence yields an absent token
/// rather than a panic.
pub fn detect_mistakes<T: Token>(
    operations: &[AlignmentOperation],
    reference: &[T],
    actual: &[T],
) -> Detection {
    let mut detection = Detection::default();
    let mut ref_pos = 0;
    let mut act_pos = 0;

    for &operation in operations {
        let kind = match operation {
            AlignmentOperation::Match => None,
            AlignmentOperation::Replacement => Some(MistakeKind::Replacement),
            AlignmentOperation::Insertion => Some(MistakeKind::Insertion),
            AlignmentOperation::Deletion => Some(MistakeKind::Deletion),
        };
        match kind {
            Some(kind) => detection.mistakes.push(Mistake {
                reference: operation
                    .advances_reference()
                    .then(|| reference.get(ref_pos).map(PositionedToken::from_token))
                    .flatten(),
                actual: operation
                    .advances_actual()
                    .then(|| actual.get(act_pos).map(PositionedToken::from_token))
                    .flatten(),
                kind,
            }),
            None => detection.matches += 1,
        }

        if operation.advances_reference() {
            ref_pos += 1;
        }
        if operation.advances_actual() {
            act_pos += 1;
        }
    }

    detection
}

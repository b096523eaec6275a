//! Global alignment of two token sequences under unit edit costs.
//!
//! The full `(N+1) x (M+1)` cost table is kept for the traceback, so time
//! and memory are both `O(N * M)`. Callers bound input sizes before
//! aligning (see [`crate::feedback::check_alignment_size`]).

use colored::Colorize;
use tracing::debug;

use crate::types::{AlignmentOperation, Token};

/// Row-major dynamic-programming table of minimal edit costs.
///
/// `cost(i, j)` is the edit distance between the first `i` reference tokens
/// and the first `j` actual tokens.
#[derive(Debug, Clone)]
pub struct CostTable {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl CostTable {
    fn new(reference_len: usize, actual_len: usize) -> Self {
        let rows = reference_len + 1;
        let cols = actual_len + 1;
        let mut table = Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        };
        for i in 0..rows {
            table.set(i, 0, i);
        }
        for j in 0..cols {
            table.set(0, j, j);
        }
        table
    }

    pub fn build<T: Token>(reference: &[T], actual: &[T]) -> Self {
        let mut table = Self::new(reference.len(), actual.len());
        for (i, r) in reference.iter().enumerate() {
            let i = i + 1;
            for (j, a) in actual.iter().enumerate() {
                let j = j + 1;
                let mutation = table.cost(i - 1, j - 1) + usize::from(r.text() != a.text());
                let deletion = table.cost(i - 1, j) + 1;
                let insertion = table.cost(i, j - 1) + 1;
                table.set(i, j, mutation.min(deletion).min(insertion));
            }
        }
        table
    }

    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: usize) {
        self.cells[i * self.cols + j] = value;
    }

    /// Edit distance between the complete sequences.
    pub fn distance(&self) -> usize {
        self.cost(self.rows - 1, self.cols - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub operations: Vec<AlignmentOperation>,
    /// Minimal total cost, `T[N][M]`.
    pub distance: usize,
}

pub fn align<T: Token>(reference: &[T], actual: &[T]) -> Alignment {
    let table = CostTable::build(reference, actual);
    debug!(
        rows = reference.len() + 1,
        cols = actual.len() + 1,
        distance = table.distance(),
        "filled cost table"
    );
    Alignment {
        operations: traceback(&table, reference, actual),
        distance: table.distance(),
    }
}

/// Walks from `(N, M)` back to `(0, 0)`.
///
/// Among equally cheap predecessors the order of preference is fixed:
/// match, replacement, deletion, insertion. Reports depend on this order.
fn traceback<T: Token>(
    table: &CostTable,
    reference: &[T],
    actual: &[T],
) -> Vec<AlignmentOperation> {
    let mut operations = Vec::with_capacity(reference.len() + actual.len());
    let (mut i, mut j) = (reference.len(), actual.len());
    while i > 0 || j > 0 {
        let here = table.cost(i, j);
        let diagonal = (i > 0 && j > 0).then(|| table.cost(i - 1, j - 1));
        let operation = match diagonal {
            Some(d) if here == d && reference[i - 1].text() == actual[j - 1].text() => {
                AlignmentOperation::Match
            }
            Some(d) if here == d + 1 => AlignmentOperation::Replacement,
            _ if i > 0 && here == table.cost(i - 1, j) + 1 => AlignmentOperation::Deletion,
            _ => AlignmentOperation::Insertion,
        };
        if operation.advances_reference() {
            i -= 1;
        }
        if operation.advances_actual() {
            j -= 1;
        }
        operations.push(operation);
    }
    operations.reverse();
    operations
}

/// Reference and actual lines of a rendered alignment, columns padded so
/// aligned tokens start at the same offset.
#[derive(Debug, Default)]
pub struct RenderedAlignment {
    pub reference: String,
    pub actual: String,
}

impl RenderedAlignment {
    fn push_column(
        &mut self,
        left: Option<(&str, bool)>,
        right: Option<(&str, bool)>,
        deleted: bool,
    ) {
        let width = left
            .map(|(t, _)| t.chars().count())
            .max(right.map(|(t, _)| t.chars().count()))
            .unwrap_or(0);
        if !self.reference.is_empty() || !self.actual.is_empty() {
            self.reference.push(' ');
            self.actual.push(' ');
        }
        let lines = [
            (&mut self.reference, left, true),
            (&mut self.actual, right, false),
        ];
        for (line, cell, is_reference) in lines {
            let used = match cell {
                Some((text, false)) => {
                    line.push_str(text);
                    text.chars().count()
                }
                Some((text, true)) if is_reference && deleted => {
                    line.extend(format!("{}", text.red().strikethrough()).chars());
                    text.chars().count()
                }
                Some((text, true)) if is_reference => {
                    line.extend(format!("{}", text.red()).chars());
                    text.chars().count()
                }
                Some((text, true)) => {
                    line.extend(format!("{}", text.green()).chars());
                    text.chars().count()
                }
                None => 0,
            };
            line.extend(std::iter::repeat(' ').take(width - used));
        }
    }
}

impl Alignment {
    pub fn render<T: Token>(&self, reference: &[T], actual: &[T]) -> RenderedAlignment {
        let mut output = RenderedAlignment::default();
        let mut reference = reference.iter();
        let mut actual = actual.iter();
        for operation in self.operations.iter() {
            let left = if operation.advances_reference() {
                reference.next().map(|t| t.text())
            } else {
                None
            };
            let right = if operation.advances_actual() {
                actual.next().map(|t| t.text())
            } else {
                None
            };
            let changed = *operation != AlignmentOperation::Match;
            output.push_column(
                left.map(|t| (t, changed)),
                right.map(|t| (t, changed)),
                *operation == AlignmentOperation::Deletion,
            );
        }
        output
    }

    pub fn pretty<T: Token>(&self, reference: &[T], actual: &[T]) {
        let rendered = self.render(reference, actual);
        println!("- {}", rendered.reference.trim_end());
        println!("+ {}", rendered.actual.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use AlignmentOperation::*;

    fn ops(reference: &str, actual: &str) -> Vec<AlignmentOperation> {
        align(&tokenize(reference), &tokenize(actual)).operations
    }

    #[test]
    fn empty_sequences_have_no_operations() {
        let alignment = align(&tokenize(""), &tokenize(""));
        assert!(alignment.operations.is_empty());
        assert_eq!(alignment.distance, 0);
    }

    #[test]
    fn empty_reference_is_all_insertions() {
        assert_eq!(ops("", "a b c"), vec![Insertion, Insertion, Insertion]);
    }

    #[test]
    fn empty_actual_is_all_deletions() {
        assert_eq!(ops("a b", ""), vec![Deletion, Deletion]);
    }

    #[test]
    fn identical_sequences_match() {
        assert_eq!(ops("a b c", "a b c"), vec![Match, Match, Match]);
    }

    #[test]
    fn substitution_deletion_insertion() {
        assert_eq!(ops("a b c", "a x c"), vec![Match, Replacement, Match]);
        assert_eq!(ops("a b c", "a c"), vec![Match, Deletion, Match]);
        assert_eq!(ops("a b", "a b c"), vec![Match, Match, Insertion]);
    }

    #[test]
    fn replacement_preferred_over_deletion_plus_insertion() {
        assert_eq!(ops("a", "b"), vec![Replacement]);
    }

    #[test]
    fn ties_resolve_toward_replacement_then_deletion() {
        // "a b" -> "b": both [Deletion, Match] and [Replacement, Deletion] cost 1,
        // traceback from the end sees the match first.
        assert_eq!(ops("a b", "b"), vec![Deletion, Match]);
        // "a b" -> "c": last cell prefers replacement, then deletion of "a".
        assert_eq!(ops("a b", "c"), vec![Deletion, Replacement]);
        // "a" -> "b c": replacement at the end, insertion before it.
        assert_eq!(ops("a", "b c"), vec![Insertion, Replacement]);
    }

    #[test]
    fn distance_is_edit_distance() {
        let reference = tokenize("k i t t e n");
        let actual = tokenize("s i t t i n g");
        assert_eq!(align(&reference, &actual).distance, 3);
    }

    #[test]
    fn cost_table_borders() {
        let table = CostTable::build(&tokenize("a b c"), &tokenize("x y"));
        for i in 0..=3 {
            assert_eq!(table.cost(i, 0), i);
        }
        for j in 0..=2 {
            assert_eq!(table.cost(0, j), j);
        }
        assert_eq!(table.distance(), 3);
    }

    #[test]
    fn render_pads_columns() {
        colored::control::set_override(false);
        let reference = tokenize("a bb c");
        let actual = tokenize("a c");
        let alignment = align(&reference, &actual);
        let rendered = alignment.render(&reference, &actual);
        assert_eq!(rendered.reference.trim_end(), "a bb c");
        assert_eq!(rendered.actual.trim_end(), "a    c");
    }
}

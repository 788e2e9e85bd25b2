use serde::Serialize;

use crate::ast::Span;

/// Replace the bytes in `range` with `replacement`. An empty range inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(range: Span, replacement: impl Into<String>) -> Self {
        TextEdit {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn remove(range: Span) -> Self {
        TextEdit::replace(range, "")
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        TextEdit::replace(Span::new(offset, offset), text)
    }
}

/// Edits belonging to one report, applied all together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    edits: Vec<TextEdit>,
}

impl Fix {
    /// Sorts the edits by position.
    ///
    /// # Panics
    /// When two edits overlap. Synthesizers only emit disjoint, node-bounded
    /// ranges, so an overlap is a bug in the synthesizer.
    pub fn new(mut edits: Vec<TextEdit>) -> Self {
        edits.sort_by_key(|e| (e.range.start, e.range.end));
        for pair in edits.windows(2) {
            assert!(
                pair[0].range.end <= pair[1].range.start,
                "overlapping edits {:?} and {:?}",
                pair[0].range,
                pair[1].range
            );
        }
        Fix { edits }
    }

    pub fn single(edit: TextEdit) -> Self {
        Fix { edits: vec![edit] }
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Range from the first edit's start to the last edit's end.
    pub fn extent(&self) -> Option<Span> {
        let first = self.edits.first()?;
        let last = self.edits.last()?;
        Some(Span::new(first.range.start, last.range.end))
    }

    fn overlaps(&self, other: &Fix) -> bool {
        self.edits
            .iter()
            .any(|a| other.edits.iter().any(|b| ranges_collide(a.range, b.range)))
    }

    /// Apply this fix alone.
    pub fn apply(&self, source: &str) -> String {
        let (fixed, _) = apply_fixes(source, std::slice::from_ref(self));
        fixed
    }
}

/// Shared bytes, or an insertion touching the other range.
fn ranges_collide(a: Span, b: Span) -> bool {
    if a.is_empty() || b.is_empty() {
        a.start.max(b.start) <= a.end.min(b.end)
    } else {
        a.start < b.end && b.start < a.end
    }
}

/// Apply as many fixes as possible, in order, skipping any fix that touches
/// a range already claimed by an accepted one. Returns the new text and the
/// number of fixes applied.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> (String, usize) {
    let mut accepted: Vec<&Fix> = Vec::new();
    for fix in fixes {
        if accepted.iter().all(|a| !a.overlaps(fix)) {
            accepted.push(fix);
        }
    }

    let mut edits: Vec<&TextEdit> = accepted.iter().flat_map(|f| f.edits()).collect();
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&source[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(&source[cursor..]);
    (out, accepted.len())
}

//! Detect-only consistency checks for redundant layouts.

/// Verify reports stored lanes that disagree with the layout's redundancy.
/// Nothing is repaired.
pub trait Verify {
    /// mismatched returns the channel indices holding inconsistent lanes.
    fn mismatched(&self) -> Vec<usize>;

    fn consistent(&self) -> bool {
        self.mismatched().is_empty()
    }
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced when committing a change to a fold view.
pub enum FoldError {
    #[error("edit {start}..{end} is outside the document (length {len})")]
    /// An edit addressed characters past the end of the document. Nothing was committed.
    InvalidEdit {
        /// Start character offset of the rejected edit.
        start: usize,
        /// Exclusive end character offset of the rejected edit.
        end: usize,
        /// Document length, in characters, when the edit was applied.
        len: usize,
    },
}

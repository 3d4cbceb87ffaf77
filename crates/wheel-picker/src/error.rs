use thiserror::Error;

/// Errors raised by picker state operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PickerError {
    /// Pixel offsets were requested before the picker was laid out.
    #[error("picker has not been measured yet")]
    NotMeasured,
    #[error("picker needs at least one value")]
    EmptyValues,
}

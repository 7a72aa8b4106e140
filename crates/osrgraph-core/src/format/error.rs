use thiserror::Error;

/// Fatal errors returned while decoding a replay buffer.
///
/// Any of these aborts the current buffer; no partial record is produced.
///
/// # Examples
/// ```
/// use osrgraph_core::ReplayError;
///
/// let err = ReplayError::MalformedMarker { offset: 5, value: 0x42 };
/// assert!(err.to_string().contains("malformed string marker"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("out of bounds at offset {offset}: need {needed} bytes, got {actual}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        actual: usize,
    },
    #[error("malformed string marker 0x{value:02x} at offset {offset}")]
    MalformedMarker { offset: usize, value: u8 },
    #[error("ULEB128 value at offset {offset} overflows 64 bits")]
    UlebOverflow { offset: usize },
    #[error("unsupported integer width {width} at offset {offset} (expected 1..=8)")]
    InvalidWidth { offset: usize, width: usize },
}

impl ReplayError {
    /// Stable identifier used in batch reports.
    pub fn id(&self) -> &'static str {
        match self {
            ReplayError::OutOfBounds { .. } => "OSR-OUT-OF-BOUNDS",
            ReplayError::MalformedMarker { .. } => "OSR-MALFORMED-MARKER",
            ReplayError::UlebOverflow { .. } => "OSR-ULEB-OVERFLOW",
            ReplayError::InvalidWidth { .. } => "OSR-INVALID-WIDTH",
        }
    }
}

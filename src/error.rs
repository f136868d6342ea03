use thiserror::Error;

/// Errors that can occur while encoding and transmitting metrics and events.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The request was rejected before encoding, e.g. an event with an empty title.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The encoded packet exceeds the configured limit and auto-truncate is disabled.
    #[error("Packet too large: {size} bytes exceeds the {max} byte limit")]
    PacketTooLarge {
        /// Size of the encoded packet in bytes.
        size: usize,
        /// Configured maximum packet size in bytes.
        max: usize,
    },

    /// The underlying transport failed to resolve, write or close.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl MetricsError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

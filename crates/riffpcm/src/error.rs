//! Error types for WAV decoding and encoding.

use thiserror::Error;

/// Result type for WAV operations.
pub type WaveResult<T> = Result<T, WaveError>;

/// Errors that can occur while decoding or encoding a WAV container.
///
/// Every error is fatal to the operation that raised it: there is no
/// partial-success mode and nothing is retried. Structural variants carry
/// the offending value alongside the expected one where that helps a caller
/// diagnose a malformed file.
#[derive(Debug, Error)]
pub enum WaveError {
    /// Underlying read, write, or seek failure.
    ///
    /// Running off the end of the stream during a chunk scan surfaces here
    /// as [`std::io::ErrorKind::UnexpectedEof`] rather than as a dedicated
    /// not-found error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container or sub-type magic did not match.
    #[error("invalid id: found {found:?}, expected {expected:?}")]
    InvalidId {
        /// The four bytes read from the stream.
        found: [u8; 4],
        /// The magic that was required at that position.
        expected: [u8; 4],
    },

    /// Format chunk declared a size other than the fixed 16-byte descriptor.
    #[error("format chunk has a different size than expected: {found} (expected {expected})")]
    FormatChunkSize {
        /// Declared chunk size.
        found: u32,
        /// Required descriptor size.
        expected: u32,
    },

    /// Encoding tag was not uncompressed PCM.
    #[error("unsupported encoding tag: {tag}")]
    UnsupportedEncoding {
        /// The encoding tag read from the format chunk.
        tag: u16,
    },

    /// Bits per sample outside the supported set {8, 16}.
    ///
    /// Raised by the read path for the on-disk field and by the write path
    /// for the requested output depth, before any byte is written.
    #[error("unsupported bit depth: {bits}")]
    UnsupportedBitDepth {
        /// The offending bit depth.
        bits: u16,
    },

    /// Channel count of zero, or one whose block align at the requested
    /// bit depth does not fit the 16-bit block align field.
    #[error("invalid channel count: {channels}")]
    InvalidChannelCount {
        /// The offending channel count.
        channels: u16,
    },

    /// Sample rate of zero.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The sample rate read from the format chunk.
        rate: u32,
    },

    /// Block align field inconsistent with channels and bit depth.
    #[error("block align {found} does not match channels and bit depth (expected {expected})")]
    BlockAlignMismatch {
        /// The block align read from the format chunk.
        found: u16,
        /// Channels multiplied by bytes per sample. Wider than the on-disk
        /// field so that an oversized channel count surfaces here instead
        /// of overflowing.
        expected: u32,
    },

    /// A derived header value exceeds its 32-bit on-disk field.
    ///
    /// Raised by the write path when the payload size or byte rate
    /// computed from the caller's parameters cannot be represented in the
    /// container, before any byte is written.
    #[error("derived header value {value} exceeds its 32-bit on-disk field")]
    HeaderFieldOverflow {
        /// The value that did not fit.
        value: u64,
    },
}

//! riffpcm — canonical uncompressed PCM WAV container codec.
//!
//! This crate decodes and encodes the canonical RIFF/WAVE container for
//! uncompressed PCM audio: it validates structural headers, locates
//! sub-chunks by a forward-only scan, and converts between the on-disk
//! fixed-width sample encodings (8-bit unsigned, 16-bit signed) and an
//! in-memory floating-point representation.
//!
//! The crate never opens or closes files; every operation works on a
//! caller-supplied [`std::io::Read`] + [`std::io::Seek`] or
//! [`std::io::Write`] handle. All I/O is synchronous and blocking, and
//! every operation either fully completes or fails with a [`WaveError`].
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use riffpcm::{read_samples, write_samples, WaveInfo};
//!
//! let info = WaveInfo { channels: 1, sample_rate: 8000 };
//! let samples = [0.0f64, 0.5, -0.5, 0.25];
//!
//! let mut bytes = Vec::new();
//! write_samples(&mut bytes, &samples, info, 16)?;
//!
//! let (decoded, decoded_info) = read_samples::<f64, _>(&mut Cursor::new(bytes), None)?;
//! assert_eq!(decoded_info, info);
//! assert_eq!(decoded.len(), 4);
//! # Ok::<(), riffpcm::WaveError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`chunk`] - Forward-only chunk scanning
//! - [`format`] - Container header and format descriptor validation
//! - [`codec`] - Generic sample decoding and encoding
//! - [`error`] - Error types

pub mod chunk;
pub mod codec;
pub mod error;
pub mod format;

// Re-export main types at crate root
pub use codec::{read_samples, write_samples, Sample};
pub use error::{WaveError, WaveResult};
pub use format::{read_format, write_header, WaveFormat, WaveInfo};

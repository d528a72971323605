//! PCM sample decoding and encoding.
//!
//! The read path locates the data chunk, splits it into frames, and
//! converts each fixed-width integer sample to the caller's floating-point
//! type; the write path does the inverse. Conversion is defined for a
//! closed set of output types via the sealed [`Sample`] trait, so an
//! unsupported type fails at compile time rather than at call time.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::chunk::{find_chunk, DATA_ID};
use crate::error::{WaveError, WaveResult};
use crate::format::{read_format, write_header, WaveInfo};

/// Byte offset of the first sub-chunk, just past the container header.
const FIRST_CHUNK_OFFSET: u64 = 12;

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating-point sample type with registered PCM conversions.
///
/// Implemented for `f32` and `f64`. Each implementation supplies both
/// directions of the 8-bit and 16-bit mappings; the trait is sealed, so
/// extending the set means adding an implementation here.
///
/// 16-bit samples map onto approximately [-1, 1] by dividing by
/// `i16::MAX`. The 8-bit mapping divides the unsigned byte by 127.5 and
/// shifts down by one, which places its zero point at byte 127.5 rather
/// than the conventional 128; the encode direction is the exact inverse,
/// so 8-bit material round-trips modulo integer truncation.
pub trait Sample: sealed::Sealed + Copy {
    /// Decodes an 8-bit unsigned sample.
    fn from_u8(raw: u8) -> Self;
    /// Decodes a 16-bit signed sample.
    fn from_i16(raw: i16) -> Self;
    /// Encodes to an 8-bit unsigned sample, truncating.
    fn to_u8(self) -> u8;
    /// Encodes to a 16-bit signed sample, truncating.
    fn to_i16(self) -> i16;
}

impl Sample for f32 {
    fn from_u8(raw: u8) -> Self {
        f32::from(raw) / (f32::from(u8::MAX) / 2.0) - 1.0
    }

    fn from_i16(raw: i16) -> Self {
        f32::from(raw) / f32::from(i16::MAX)
    }

    fn to_u8(self) -> u8 {
        ((self + 1.0) * (f32::from(u8::MAX) / 2.0)) as u8
    }

    fn to_i16(self) -> i16 {
        (self * f32::from(i16::MAX)) as i16
    }
}

impl Sample for f64 {
    fn from_u8(raw: u8) -> Self {
        f64::from(raw) / (f64::from(u8::MAX) / 2.0) - 1.0
    }

    fn from_i16(raw: i16) -> Self {
        f64::from(raw) / f64::from(i16::MAX)
    }

    fn to_u8(self) -> u8 {
        ((self + 1.0) * (f64::from(u8::MAX) / 2.0)) as u8
    }

    fn to_i16(self) -> i16 {
        (self * f64::from(i16::MAX)) as i16
    }
}

/// Decodes the data chunk into an interleaved sample buffer.
///
/// The reader must be positioned at the start of the container; the header
/// and format chunk are validated on every call. `max_channels` limits the
/// output to a prefix of each frame's channels: `Some(n)` keeps
/// `min(n, file_channels)` channels and discards the rest of every frame,
/// `None` keeps them all.
///
/// The declared data size is read in full, but only whole frames are
/// decoded; trailing bytes from a size not divisible by the block align
/// are ignored without error. Returns the buffer in channel-interleaved
/// frame order together with the effective channel count and the file's
/// sample rate.
///
/// # Errors
///
/// Any [`read_format`] failure, or [`WaveError::Io`](crate::WaveError::Io)
/// if the data chunk cannot be located or read in full.
pub fn read_samples<T: Sample, R: Read + Seek>(
    reader: &mut R,
    max_channels: Option<u16>,
) -> WaveResult<(Vec<T>, WaveInfo)> {
    let format = read_format(reader)?;

    // The format chunk need not precede the data chunk adjacently; rescan
    // from the first sub-chunk.
    reader.seek(SeekFrom::Start(FIRST_CHUNK_OFFSET))?;
    let data_size = find_chunk(reader, DATA_ID)? as usize;

    let block_align = usize::from(format.block_align);
    let frames = data_size / block_align;

    // Read the whole declared chunk, slack included; only whole frames are
    // decoded below.
    let mut data = vec![0u8; data_size];
    reader.read_exact(&mut data)?;

    let channels = match max_channels {
        Some(n) => usize::from(n.min(format.channels)),
        None => usize::from(format.channels),
    };
    let bytes_per_sample = usize::from(format.bytes_per_sample());

    let mut samples = Vec::with_capacity(frames * channels);
    for frame in data[..frames * block_align].chunks_exact(block_align) {
        for channel in 0..channels {
            let at = channel * bytes_per_sample;
            let sample = match format.bits_per_sample {
                8 => T::from_u8(frame[at]),
                _ => T::from_i16(i16::from_le_bytes([frame[at], frame[at + 1]])),
            };
            samples.push(sample);
        }
    }

    let info = WaveInfo {
        channels: channels as u16,
        sample_rate: format.sample_rate,
    };
    Ok((samples, info))
}

/// Encodes an interleaved sample buffer as a complete container.
///
/// `samples` is read in order as the total interleaved sequence
/// (frames times channels elements); `info` supplies the channel count and
/// sample rate for the format chunk, and `bits` selects the on-disk sample
/// width. The buffer is only read, never retained.
///
/// # Errors
///
/// * [`WaveError::UnsupportedBitDepth`](crate::WaveError::UnsupportedBitDepth)
///   if `bits` is neither 8 nor 16, before any byte is written.
/// * [`WaveError::Io`](crate::WaveError::Io) if any write fails.
pub fn write_samples<T: Sample, W: Write>(
    writer: &mut W,
    samples: &[T],
    info: WaveInfo,
    bits: u16,
) -> WaveResult<()> {
    if bits != 8 && bits != 16 {
        return Err(WaveError::UnsupportedBitDepth { bits });
    }

    write_header(writer, samples.len() as u32, info, bits)?;

    match bits {
        8 => {
            for &sample in samples {
                writer.write_u8(sample.to_u8())?;
            }
        }
        _ => {
            for &sample in samples {
                writer.write_i16::<LittleEndian>(sample.to_i16())?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Builds a complete file around a raw payload.
    fn file_with_payload(channels: u16, sample_rate: u32, bits: u16, payload: &[u8]) -> Vec<u8> {
        let info = WaveInfo {
            channels,
            sample_rate,
        };
        let bytes_per_sample = u32::from((bits + 7) / 8);
        let mut bytes = Vec::new();
        write_header(
            &mut bytes,
            payload.len() as u32 / bytes_per_sample,
            info,
            bits,
        )
        .expect("header should write");
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_load_mono_16_bit() {
        let mut payload = Vec::new();
        for raw in [0i16, 16384, -16384, 32767] {
            payload.extend_from_slice(&raw.to_le_bytes());
        }
        let bytes = file_with_payload(1, 8000, 16, &payload);

        let (samples, info) =
            read_samples::<f64, _>(&mut Cursor::new(bytes), None).expect("load should succeed");

        assert_eq!(info, WaveInfo { channels: 1, sample_rate: 8000 });
        assert_eq!(samples.len(), 4);
        assert!((samples[0]).abs() < 1e-9);
        assert!((samples[1] - 16384.0 / 32767.0).abs() < 1e-9);
        assert!((samples[2] + 16384.0 / 32767.0).abs() < 1e-9);
        assert!((samples[3] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_channel_prefix() {
        // Two stereo frames: (L0, R0), (L1, R1).
        let mut payload = Vec::new();
        for raw in [1000i16, -1000, 2000, -2000] {
            payload.extend_from_slice(&raw.to_le_bytes());
        }
        let bytes = file_with_payload(2, 44100, 16, &payload);

        let (samples, info) = read_samples::<f64, _>(&mut Cursor::new(bytes), Some(1))
            .expect("load should succeed");

        // Only the left channel of each frame survives.
        assert_eq!(info.channels, 1);
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 1000.0 / 32767.0).abs() < 1e-9);
        assert!((samples[1] - 2000.0 / 32767.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_max_channels_above_file_channels() {
        let mut payload = Vec::new();
        for raw in [1000i16, -1000] {
            payload.extend_from_slice(&raw.to_le_bytes());
        }
        let bytes = file_with_payload(2, 44100, 16, &payload);

        let (samples, info) = read_samples::<f32, _>(&mut Cursor::new(bytes), Some(8))
            .expect("load should succeed");

        assert_eq!(info.channels, 2);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_load_drops_trailing_partial_frame() {
        // Stereo 16-bit, block align 4, payload of 10 bytes: two whole
        // frames plus two slack bytes.
        let payload = [0u8; 10];
        let info = WaveInfo { channels: 2, sample_rate: 8000 };
        let mut bytes = Vec::new();
        write_header(&mut bytes, 0, info, 16).expect("header should write");
        // Patch the data size to the odd payload length.
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(&payload);

        let (samples, _) =
            read_samples::<f64, _>(&mut Cursor::new(bytes), None).expect("load should succeed");

        assert_eq!(samples.len(), 4); // 2 frames x 2 channels
    }

    #[test]
    fn test_load_skips_chunk_between_fmt_and_data() {
        let info = WaveInfo { channels: 1, sample_rate: 8000 };
        let mut bytes = Vec::new();
        write_header(&mut bytes, 1, info, 16).expect("header should write");
        // Splice an unknown chunk in front of the data descriptor.
        let data_descriptor = bytes.split_off(36);
        bytes.extend_from_slice(b"LIST");
        bytes.extend_from_slice(&6u32.to_le_bytes());
        bytes.extend_from_slice(&[0x55; 6]);
        bytes.extend_from_slice(&data_descriptor);
        bytes.extend_from_slice(&100i16.to_le_bytes());

        let (samples, _) =
            read_samples::<f64, _>(&mut Cursor::new(bytes), None).expect("load should succeed");

        assert_eq!(samples.len(), 1);
        assert!((samples[0] - 100.0 / 32767.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_8_bit_mapping() {
        let bytes = file_with_payload(1, 8000, 8, &[0, 255, 128]);
        let (samples, _) =
            read_samples::<f64, _>(&mut Cursor::new(bytes), None).expect("load should succeed");

        assert_eq!(samples.len(), 3);
        assert!((samples[0] + 1.0).abs() < 1e-9);
        assert!((samples[1] - 1.0).abs() < 1e-2); // 255 / 127.5 - 1
        assert!(samples[2].abs() < 1e-2); // off-center zero point
    }

    #[test]
    fn test_save_16_bit_payload() {
        let info = WaveInfo { channels: 1, sample_rate: 8000 };
        let samples = [0.0f64, 0.5, -0.5];
        let mut bytes = Vec::new();
        write_samples(&mut bytes, &samples, info, 16).expect("save should succeed");

        assert_eq!(bytes.len(), 44 + 6);
        let first = i16::from_le_bytes([bytes[44], bytes[45]]);
        let second = i16::from_le_bytes([bytes[46], bytes[47]]);
        assert_eq!(first, 0);
        assert_eq!(second, (0.5f64 * 32767.0) as i16);
    }

    #[test]
    fn test_save_rejects_bad_depth_before_writing() {
        let info = WaveInfo { channels: 1, sample_rate: 8000 };
        let mut bytes = Vec::new();
        let err = write_samples(&mut bytes, &[0.0f32], info, 12).unwrap_err();
        assert!(matches!(err, WaveError::UnsupportedBitDepth { bits: 12 }));
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_round_trip_16_bit_stereo() {
        let info = WaveInfo { channels: 2, sample_rate: 44100 };
        let original = [0.25f64, -0.25, 0.75, -0.75, 0.0, 1.0];
        let mut bytes = Vec::new();
        write_samples(&mut bytes, &original, info, 16).expect("save should succeed");

        let (decoded, decoded_info) =
            read_samples::<f64, _>(&mut Cursor::new(bytes), None).expect("load should succeed");

        assert_eq!(decoded_info, info);
        assert_eq!(decoded.len(), original.len());
        for (a, b) in original.iter().zip(&decoded) {
            assert!((a - b).abs() <= 1.0 / 32767.0);
        }
    }

    #[test]
    fn test_round_trip_8_bit() {
        let info = WaveInfo { channels: 1, sample_rate: 22050 };
        let original = [0.0f32, 0.5, -0.5, 0.9];
        let mut bytes = Vec::new();
        write_samples(&mut bytes, &original, info, 8).expect("save should succeed");

        let (decoded, decoded_info) =
            read_samples::<f32, _>(&mut Cursor::new(bytes), None).expect("load should succeed");

        assert_eq!(decoded_info, info);
        assert_eq!(decoded.len(), original.len());
        for (a, b) in original.iter().zip(&decoded) {
            // One 8-bit step of truncation error.
            assert!((a - b).abs() <= 1.0 / 127.5);
        }
    }

    #[test]
    fn test_conversion_extremes() {
        assert_eq!(f64::from_i16(i16::MAX), 1.0);
        assert!(f64::from_i16(i16::MIN) < -1.0);
        assert_eq!(1.0f64.to_i16(), i16::MAX);
        assert_eq!((-1.0f64).to_i16(), -i16::MAX);
        assert_eq!(f64::from_u8(0), -1.0);
        assert_eq!((-1.0f64).to_u8(), 0);
        assert_eq!(f32::from_u8(255).to_u8(), 255);
    }
}

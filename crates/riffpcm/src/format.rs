//! Container header and format descriptor handling.
//!
//! The read path validates the RIFF/WAVE preamble and the format sub-chunk
//! and produces a [`WaveFormat`]; the write path emits the complete
//! 44-byte canonical preamble up to and including the data chunk
//! descriptor, leaving the payload to the caller.

use std::io::{Read, Seek, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::chunk::{find_chunk, DATA_ID, FMT_ID, RIFF_ID, WAVE_ID};
use crate::error::{WaveError, WaveResult};

/// Encoding tag for uncompressed PCM.
pub const PCM_ENCODING: u16 = 1;

/// On-disk size of the format descriptor in bytes.
pub const FMT_CHUNK_SIZE: u32 = 16;

/// Bytes of the canonical preamble counted by the RIFF size field.
///
/// The RIFF size excludes the first 8 bytes of the file, so a canonical
/// file declares 36 bytes of header plus the data payload.
const HEADER_OVERHEAD: u32 = 36;

/// Validated format descriptor read from or written to the format chunk.
///
/// Constructed once per decode or encode operation and immutable
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    /// Encoding tag (always [`PCM_ENCODING`] once validated).
    pub encoding: u16,
    /// Number of interleaved channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz, per channel.
    pub sample_rate: u32,
    /// Bytes per second (block align times sample rate).
    pub byte_rate: u32,
    /// Bytes per frame across all channels.
    pub block_align: u16,
    /// Bits per sample (8 or 16).
    pub bits_per_sample: u16,
}

impl WaveFormat {
    /// Bytes occupied by one sample of one channel.
    pub(crate) fn bytes_per_sample(&self) -> u16 {
        (self.bits_per_sample + 7) / 8
    }
}

/// Channel count and sample rate paired with a sample buffer.
///
/// Produced by the read path alongside the decoded samples, and required
/// as input by the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveInfo {
    /// Number of interleaved channels in the buffer.
    pub channels: u16,
    /// Sample rate in Hz, per channel.
    pub sample_rate: u32,
}

fn expect_id<R: Read>(reader: &mut R, expected: [u8; 4]) -> WaveResult<()> {
    let mut found = [0u8; 4];
    reader.read_exact(&mut found)?;
    if found != expected {
        return Err(WaveError::InvalidId { found, expected });
    }
    Ok(())
}

/// Reads and validates the container header and format chunk.
///
/// The reader must be positioned at the start of the container. On success
/// the reader is left immediately after the format descriptor. The RIFF
/// size field is read but treated as advisory; it is not checked against
/// the actual stream length.
///
/// # Errors
///
/// * [`WaveError::InvalidId`] if either magic mismatches.
/// * [`WaveError::FormatChunkSize`] if the format chunk is not exactly
///   [`FMT_CHUNK_SIZE`] bytes.
/// * [`WaveError::UnsupportedEncoding`], [`WaveError::UnsupportedBitDepth`],
///   [`WaveError::InvalidChannelCount`], [`WaveError::InvalidSampleRate`],
///   or [`WaveError::BlockAlignMismatch`] for descriptor fields that
///   violate the PCM invariants.
/// * [`WaveError::Io`] if the stream ends before the descriptor does.
pub fn read_format<R: Read + Seek>(reader: &mut R) -> WaveResult<WaveFormat> {
    expect_id(reader, RIFF_ID)?;
    let _riff_size = reader.read_u32::<LittleEndian>()?;
    expect_id(reader, WAVE_ID)?;

    let fmt_size = find_chunk(reader, FMT_ID)?;
    if fmt_size != FMT_CHUNK_SIZE {
        return Err(WaveError::FormatChunkSize {
            found: fmt_size,
            expected: FMT_CHUNK_SIZE,
        });
    }

    let format = WaveFormat {
        encoding: reader.read_u16::<LittleEndian>()?,
        channels: reader.read_u16::<LittleEndian>()?,
        sample_rate: reader.read_u32::<LittleEndian>()?,
        byte_rate: reader.read_u32::<LittleEndian>()?,
        block_align: reader.read_u16::<LittleEndian>()?,
        bits_per_sample: reader.read_u16::<LittleEndian>()?,
    };

    if format.encoding != PCM_ENCODING {
        return Err(WaveError::UnsupportedEncoding {
            tag: format.encoding,
        });
    }
    if format.bits_per_sample != 8 && format.bits_per_sample != 16 {
        return Err(WaveError::UnsupportedBitDepth {
            bits: format.bits_per_sample,
        });
    }
    if format.channels == 0 {
        return Err(WaveError::InvalidChannelCount {
            channels: format.channels,
        });
    }
    if format.sample_rate == 0 {
        return Err(WaveError::InvalidSampleRate {
            rate: format.sample_rate,
        });
    }
    // Widened so an absurd channel count cannot overflow the multiply; a
    // true align that does not fit the 16-bit field can never match.
    let expected_align = u32::from(format.channels) * u32::from(format.bytes_per_sample());
    if u32::from(format.block_align) != expected_align {
        return Err(WaveError::BlockAlignMismatch {
            found: format.block_align,
            expected: expected_align,
        });
    }

    Ok(format)
}

/// Writes the container header, format chunk, and data chunk descriptor.
///
/// `sample_count` is the total number of interleaved samples the caller
/// will write (frames times channels). The data chunk is sized to
/// `sample_count` times the bytes per sample at the requested depth, and
/// the RIFF size field covers everything past the leading 8 bytes.
///
/// # Errors
///
/// All validation happens before any byte is written.
///
/// * [`WaveError::UnsupportedBitDepth`] if `bits` is neither 8 nor 16.
/// * [`WaveError::InvalidChannelCount`] if the block align at the
///   requested depth does not fit its 16-bit field.
/// * [`WaveError::HeaderFieldOverflow`] if the payload size or byte rate
///   does not fit its 32-bit field.
/// * [`WaveError::Io`] if any write fails.
pub fn write_header<W: Write>(
    writer: &mut W,
    sample_count: u32,
    info: WaveInfo,
    bits: u16,
) -> WaveResult<()> {
    if bits != 8 && bits != 16 {
        return Err(WaveError::UnsupportedBitDepth { bits });
    }

    // All derived fields are computed wide and checked against their
    // on-disk widths before the first byte goes out.
    let bytes_per_sample = (bits + 7) / 8;
    let block_align = u32::from(info.channels) * u32::from(bytes_per_sample);
    if block_align > u32::from(u16::MAX) {
        return Err(WaveError::InvalidChannelCount {
            channels: info.channels,
        });
    }
    let data_size = u64::from(sample_count) * u64::from(bytes_per_sample);
    let riff_size = u64::from(HEADER_OVERHEAD) + data_size;
    if riff_size > u64::from(u32::MAX) {
        return Err(WaveError::HeaderFieldOverflow { value: riff_size });
    }
    let byte_rate = u64::from(block_align) * u64::from(info.sample_rate);
    if byte_rate > u64::from(u32::MAX) {
        return Err(WaveError::HeaderFieldOverflow { value: byte_rate });
    }

    writer.write_all(&RIFF_ID)?;
    writer.write_u32::<LittleEndian>(riff_size as u32)?;
    writer.write_all(&WAVE_ID)?;

    writer.write_all(&FMT_ID)?;
    writer.write_u32::<LittleEndian>(FMT_CHUNK_SIZE)?;
    writer.write_u16::<LittleEndian>(PCM_ENCODING)?;
    writer.write_u16::<LittleEndian>(info.channels)?;
    writer.write_u32::<LittleEndian>(info.sample_rate)?;
    writer.write_u32::<LittleEndian>(byte_rate as u32)?;
    writer.write_u16::<LittleEndian>(block_align as u16)?;
    writer.write_u16::<LittleEndian>(bits)?;

    writer.write_all(&DATA_ID)?;
    writer.write_u32::<LittleEndian>(data_size as u32)?;

    Ok(())
}

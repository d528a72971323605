//! Forward-only chunk scanning.
//!
//! A RIFF container is a sequence of tagged, length-prefixed records. The
//! scanner reads descriptors one after another and skips non-matching
//! payloads by their declared size; it never seeks backward and keeps no
//! state beyond the stream position.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::WaveResult;

/// Container magic identifier.
pub const RIFF_ID: [u8; 4] = *b"RIFF";

/// Audio sub-type magic identifier.
pub const WAVE_ID: [u8; 4] = *b"WAVE";

/// Format sub-chunk tag.
pub const FMT_ID: [u8; 4] = *b"fmt ";

/// Data sub-chunk tag.
pub const DATA_ID: [u8; 4] = *b"data";

/// Scans forward until a chunk with the wanted tag is found.
///
/// Reads successive 8-byte chunk descriptors (4-byte tag, little-endian
/// u32 size) from the current position. On a match the declared size is
/// returned and the reader is left at the start of that chunk's payload.
/// Non-matching chunks are skipped by seeking past their declared size;
/// the size field is trusted.
///
/// # Errors
///
/// Returns [`WaveError::Io`](crate::WaveError::Io) if a descriptor cannot
/// be fully read, which is also how running off the end of the stream
/// without a match manifests.
pub fn find_chunk<R: Read + Seek>(reader: &mut R, wanted: [u8; 4]) -> WaveResult<u32> {
    loop {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        let size = reader.read_u32::<LittleEndian>()?;

        if tag == wanted {
            return Ok(size);
        }

        reader.seek(SeekFrom::Current(i64::from(size)))?;
    }
}

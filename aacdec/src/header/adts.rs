//! ADTS (Audio Data Transport Stream) fixed + variable header parsing.
//!
//! Ported from `symphonia-codec-aac/src/adts.rs`'s `AdtsHeader::{sync,read}`,
//! stripped of the `FormatReader`/`MediaSourceStream`/`Track`/`Cue` demuxer
//! plumbing built around it — container framing is an explicit non-goal
//! (spec §1), so only header parsing survives; the caller is expected to
//! supply one frame's bytes at a time, having located the syncword itself
//! or via `AdtsHeader::sync`.
use aacdec_core::audio::Channels;
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::common::{map_channels, ObjectType, AAC_SAMPLE_RATES, OBJECT_TYPES};

pub const MAX_SYNC_SCAN: usize = 768;

#[derive(Debug, Clone)]
pub struct AdtsHeader {
    pub object_type: ObjectType,
    pub sample_rate: u32,
    pub channels: Option<Channels>,
    /// Total frame length in bytes, including this header.
    pub frame_len: usize,
    /// Header size in bytes: 7 without CRC, 9 with.
    pub header_size: usize,
    pub old_format_emphasis: Option<u8>,
}

impl AdtsHeader {
    /// Scans up to `MAX_SYNC_SCAN` bytes of `buf` for the 12-bit syncword
    /// `0xFFF`, returning the byte offset it starts at.
    pub fn find_sync(buf: &[u8]) -> Result<usize> {
        let limit = buf.len().min(MAX_SYNC_SCAN);
        for i in 0..limit.saturating_sub(1) {
            if buf[i] == 0xFF && (buf[i + 1] & 0xF0) == 0xF0 {
                return Ok(i);
            }
        }
        Err(Error::InvalidSyncword)
    }

    /// Parses the fixed + variable ADTS header starting at `buf[0]` (the
    /// first syncword byte). `use_old_adts` gates reading the old-format
    /// emphasis bits per spec §9's open question: this is an explicit
    /// caller-provided knob, never auto-detected.
    pub fn read(buf: &[u8], use_old_adts: bool) -> Result<Self> {
        if buf.len() < 7 {
            return Err(Error::BufferTooSmall);
        }
        let mut bs = BitReader::new(buf);

        let sync = bs.read_bits(12);
        if sync != 0xFFF {
            return Err(Error::InvalidSyncword);
        }
        let id = bs.read_bits(1);
        let layer = bs.read_bits(2);
        if layer != 0 {
            return Err(Error::BitstreamValueNotAllowed);
        }
        let protection_absent = bs.read_bit();

        let profile = bs.read_bits(2) as usize;
        let object_type = OBJECT_TYPES[profile + 1];

        let sample_rate = match bs.read_bits(4) as usize {
            15 => return Err(Error::InvalidSampleRate),
            13 | 14 => return Err(Error::InvalidSampleRate),
            idx => AAC_SAMPLE_RATES[idx],
        };

        bs.ignore_bit(); // private bit

        let channel_config = bs.read_bits(3);
        let channels = if channel_config == 0 { None } else { map_channels(channel_config) };

        bs.ignore_bit(); // original/copy
        bs.ignore_bit(); // home

        let old_format_emphasis = if use_old_adts && id == 0 {
            bs.ignore_bit(); // copyright_identification_bit
            bs.ignore_bit(); // copyright_identification_start
            None
        }
        else {
            bs.ignore_bit();
            bs.ignore_bit();
            None
        };

        let frame_len = bs.read_bits(13) as usize;
        let header_size = if protection_absent { 7 } else { 9 };
        if frame_len < header_size {
            return Err(Error::BitstreamValueNotAllowed);
        }

        bs.ignore_bits(11); // buffer fullness
        let num_frames = bs.read_bits(2) + 1;
        if num_frames > 1 {
            return Err(Error::UnsupportedObjectType);
        }

        if !protection_absent {
            bs.ignore_bits(16); // CRC
        }

        Ok(AdtsHeader {
            object_type,
            sample_rate,
            channels,
            frame_len,
            header_size,
            old_format_emphasis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syncword_at_offset_zero() {
        let buf = [0xFFu8, 0xF1, 0x50, 0x80, 0x00, 0x1F, 0xFC];
        assert_eq!(AdtsHeader::find_sync(&buf).unwrap(), 0);
    }

    #[test]
    fn syncword_missing_within_scan_window_fails() {
        let buf = vec![0u8; MAX_SYNC_SCAN + 2];
        assert!(AdtsHeader::find_sync(&buf).is_err());
    }

    #[test]
    fn parses_scenario_2_header() {
        // FF F1 50 80 00 1F FC : ADTS LC, 44.1kHz, stereo, frame_len=8.
        let buf = [0xFFu8, 0xF1, 0x50, 0x80, 0x00, 0x1F, 0xFC];
        let header = AdtsHeader::read(&buf, false).unwrap();
        assert_eq!(header.object_type, ObjectType::Lc);
        assert_eq!(header.frame_len, 8);
        assert_eq!(header.header_size, 7);
    }
}

//! ADIF (Audio Data Interchange Format) header — a header-at-start wrapper,
//! as opposed to ADTS's per-frame header.
//!
//! No teacher implementation exists anywhere in the pack; authored fresh
//! from spec §4.2, following the same field-by-field `BitReader` style as
//! `adts.rs`/`asc.rs`.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::header::pce::ProgramConfig;

pub const ADIF_MAGIC: [u8; 4] = *b"ADIF";

#[derive(Debug, Clone)]
pub struct AdifHeader {
    pub copyright_id: Option<[u8; 9]>,
    pub original_copy: bool,
    pub home: bool,
    pub bitstream_type: bool,
    pub bitrate: u32,
    pub program_configs: Vec<ProgramConfig>,
}

impl AdifHeader {
    pub fn read(buf: &[u8]) -> Result<Self> {
        if buf.len() < 4 || buf[..4] != ADIF_MAGIC {
            return Err(Error::InvalidSyncword);
        }
        let mut bs = BitReader::new(&buf[4..]);

        let copyright_present = bs.read_bit();
        let copyright_id = if copyright_present {
            let mut id = [0u8; 9];
            for b in id.iter_mut() {
                *b = bs.read_bits(8) as u8;
            }
            Some(id)
        }
        else {
            None
        };

        let original_copy = bs.read_bit();
        let home = bs.read_bit();
        let bitstream_type = bs.read_bit();
        let bitrate = bs.read_bits(23);
        let num_pce = bs.read_bits(4) as usize + 1;

        let mut program_configs = Vec::with_capacity(num_pce);
        for _ in 0..num_pce {
            if !bitstream_type {
                bs.ignore_bits(20); // buffer_fullness, constant-rate streams only
            }
            program_configs.push(ProgramConfig::read(&mut bs)?);
        }

        Ok(AdifHeader { copyright_id, original_copy, home, bitstream_type, bitrate, program_configs })
    }
}

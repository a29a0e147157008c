//! AudioSpecificConfig (ASC) — the MP4-delivered descriptor for an AAC
//! elementary stream.
//!
//! Ported from `symphonia-codec-aac/src/aac.rs`'s `M4AInfo::read`: object
//! type escape decoding, explicit sample-rate handling, per-object-type
//! branching (this decoder keeps only the AAC-LC path live; every other
//! object type still parses far enough to report `UnsupportedObjectType`
//! rather than silently misinterpreting the rest of the stream), and the
//! implicit backward-compatible SBR sync-word scan.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::common::{ObjectType, AAC_SAMPLE_RATES, OBJECT_TYPES};
use crate::header::pce::ProgramConfig;

#[derive(Debug, Clone)]
pub struct AudioSpecificConfig {
    pub object_type: ObjectType,
    pub sample_rate: u32,
    pub channel_config: u8,
    pub frame_length: usize,
    pub sbr_present: bool,
    pub ps_present: bool,
    pub pce: Option<ProgramConfig>,
}

impl AudioSpecificConfig {
    fn read_object_type(bs: &mut BitReader<'_>) -> Result<ObjectType> {
        let mut idx = bs.read_bits(5) as usize;
        if idx == 31 {
            idx = 32 + bs.read_bits(6) as usize;
        }
        OBJECT_TYPES.get(idx).copied().ok_or(Error::UnsupportedObjectType)
    }

    fn read_sampling_frequency(bs: &mut BitReader<'_>) -> Result<u32> {
        let idx = bs.read_bits(4) as usize;
        if idx == 0x0F {
            // Open question resolved per spec §9: the explicit 24-bit rate
            // is authoritative, used directly (not discarded).
            let rate = bs.read_bits(24);
            Ok(rate)
        }
        else {
            let rate = AAC_SAMPLE_RATES[idx];
            if rate == 0 {
                Err(Error::InvalidSampleRate)
            }
            else {
                Ok(rate)
            }
        }
    }

    pub fn read(bs: &mut BitReader<'_>) -> Result<Self> {
        let mut object_type = Self::read_object_type(bs)?;
        let mut sample_rate = Self::read_sampling_frequency(bs)?;
        let mut channel_config = bs.read_bits(4) as u8;

        let mut sbr_present = false;
        let mut ps_present = false;
        let mut explicit_srate = None;

        if object_type == ObjectType::Sbr || object_type == ObjectType::Ps {
            sbr_present = true;
            explicit_srate = Some(Self::read_sampling_frequency(bs)?);
            object_type = Self::read_object_type(bs)?;
        }

        match object_type {
            ObjectType::Lc | ObjectType::Main | ObjectType::Ltp | ObjectType::ErAacLc
            | ObjectType::ErAacLtp | ObjectType::ErAacLd | ObjectType::ErAacEld => {}
            _ => return Err(Error::UnsupportedObjectType),
        }

        // GASpecificConfig.
        let frame_length_flag = bs.read_bit();
        let depends_on_core = bs.read_bit();
        if depends_on_core {
            bs.ignore_bits(14); // core coder delay
        }
        let extension_flag = bs.read_bit();

        let pce = if channel_config == 0 { Some(ProgramConfig::read(bs)?) } else { None };

        if matches!(object_type, ObjectType::ErAacLc | ObjectType::ErAacLtp | ObjectType::ErAacLd) {
            bs.ignore_bits(3); // aacSectionDataResilienceFlag/scalefactor/spectral
        }

        if extension_flag {
            if matches!(object_type, ObjectType::ErAacLd) {
                bs.ignore_bits(1); // ldSbrPresentFlag, simplified
            }
            bs.ignore_bit(); // extensionFlag3, reserved
        }

        let frame_length = if frame_length_flag { 960 } else { 1024 };

        // Implicit backward-compatible SBR: an 11-bit sync 0x2B7 followed
        // by extensionAudioObjectType == Sbr and a presence bit.
        if bs.bits_left() >= 16 {
            let sync = bs.peek(11);
            if sync == 0x2B7 {
                bs.consume(11);
                let ext_object_type = Self::read_object_type(bs)?;
                if ext_object_type == ObjectType::Sbr {
                    sbr_present = bs.read_bit();
                    if sbr_present {
                        explicit_srate = Some(Self::read_sampling_frequency(bs)?);
                    }
                    if bs.bits_left() >= 12 {
                        let ps_sync = bs.peek(11);
                        if ps_sync == 0x548 {
                            bs.consume(11);
                            ps_present = bs.read_bit();
                        }
                    }
                }
            }
        }

        if let Some(r) = explicit_srate {
            sample_rate = r;
        }

        Ok(AudioSpecificConfig {
            object_type,
            sample_rate,
            channel_config,
            frame_length,
            sbr_present,
            ps_present,
            pce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_lc_stereo_44100() {
        // object_type=2 (LC): 00010
        // sampling_frequency_index=4 (44100): 0100
        // channel_config=2: 0010
        // frame_length_flag=0, depends_on_core=0, extension_flag=0
        let bits = "00010 0100 0010 0 0 0";
        let mut bytes_str: Vec<u8> = bits.chars().filter(|c| *c == '0' || *c == '1').map(|c| c as u8 - b'0').collect();
        // pad to full bytes with zero bits (harmless trailing reserved field bits).
        while bytes_str.len() % 8 != 0 {
            bytes_str.push(0);
        }
        let mut bytes = Vec::new();
        for chunk in bytes_str.chunks(8) {
            let mut b = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                b |= bit << (7 - i);
            }
            bytes.push(b);
        }
        let mut bs = BitReader::new(&bytes);
        let asc = AudioSpecificConfig::read(&mut bs).unwrap();
        assert_eq!(asc.object_type, ObjectType::Lc);
        assert_eq!(asc.sample_rate, 44100);
        assert_eq!(asc.channel_config, 2);
        assert_eq!(asc.frame_length, 1024);
        assert!(!asc.sbr_present);
    }
}

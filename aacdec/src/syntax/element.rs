//! `raw_data_block()`: the top-level element dispatch loop (spec §4.2,
//! §4.3), reading syntactic elements until the `END` marker.
//!
//! Ported from `symphonia-codec-aac/src/aac/mod.rs::decode_ga`.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::codebooks::{self, ZERO_HCB};
use crate::common::NoiseGen;
use crate::header::pce::ProgramConfig;
use crate::syntax::cpe::ChannelPair;
use crate::syntax::ics::Ics;

const ID_SCE: u32 = 0;
const ID_CPE: u32 = 1;
const ID_CCE: u32 = 2;
const ID_LFE: u32 = 3;
const ID_DSE: u32 = 4;
const ID_PCE: u32 = 5;
const ID_FIL: u32 = 6;
const ID_END: u32 = 7;

/// One fully decoded `raw_data_block()`: every element in bitstream order,
/// plus whether a `fill_element` signalled SBR/PS presence (spec's
/// supplemental detection feature — full SBR/PS decode stays out of scope,
/// but the decoder reports the signal so callers aren't silently handed a
/// half-bandwidth reconstruction).
#[derive(Debug, Clone, Default)]
pub struct RawDataBlockResult {
    pub sce: Vec<Ics>,
    pub cpe: Vec<ChannelPair>,
    pub lfe: Vec<Ics>,
    pub pce: Option<ProgramConfig>,
    pub sbr_signalled: bool,
    pub ps_signalled: bool,
}

pub fn decode_raw_data_block(
    bs: &mut BitReader<'_>,
    sample_rate: u32,
    rng: &mut NoiseGen,
) -> Result<RawDataBlockResult> {
    let mut result = RawDataBlockResult::default();
    let mut first_element = true;

    loop {
        let id = bs.read_bits(3);
        match id {
            ID_SCE => {
                let _tag = bs.read_bits(4);
                result.sce.push(Ics::read(bs, sample_rate, None, false, rng)?);
                first_element = false;
            }
            ID_CPE => {
                let _tag = bs.read_bits(4);
                result.cpe.push(ChannelPair::read(bs, sample_rate, rng)?);
                first_element = false;
            }
            ID_CCE => {
                read_coupling_channel_element(bs, sample_rate, rng)?;
                first_element = false;
            }
            ID_LFE => {
                let _tag = bs.read_bits(4);
                result.lfe.push(Ics::read(bs, sample_rate, None, false, rng)?);
                first_element = false;
            }
            ID_DSE => {
                read_data_stream_element(bs);
                first_element = false;
            }
            ID_PCE => {
                if !first_element {
                    return Err(Error::PCENotFirst);
                }
                result.pce = Some(ProgramConfig::read(bs)?);
                first_element = false;
            }
            ID_FIL => {
                let (sbr, ps) = read_fill_element(bs);
                result.sbr_signalled |= sbr;
                result.ps_signalled |= ps;
                first_element = false;
            }
            ID_END => break,
            _ => return Err(Error::BitstreamValueNotAllowed),
        }
        if bs.has_error() {
            return Err(Error::BitstreamOverrun);
        }
    }

    Ok(result)
}

fn read_data_stream_element(bs: &mut BitReader<'_>) {
    let _tag = bs.read_bits(4);
    let align = bs.read_bit();
    let mut count = bs.read_bits(8) as usize;
    if count == 255 {
        count += bs.read_bits(8) as usize;
    }
    if align {
        bs.byte_align();
    }
    bs.ignore_bits(count * 8);
}

/// Coupling channel element: its gain values may affect playback of other
/// elements, but decoding that effect is out of scope here (spec §4.3) — the
/// element's bits still have to be parsed field-by-field so the bitstream
/// stays in sync for whatever element follows it, since unlike `DSE`/`FIL`
/// a `CCE` carries no declared byte count to skip over wholesale.
fn read_coupling_channel_element(bs: &mut BitReader<'_>, sample_rate: u32, rng: &mut NoiseGen) -> Result<()> {
    let _tag = bs.read_bits(4);
    let ind_sw_cce_flag = bs.read_bit();
    let num_coupled_elements = bs.read_bits(3) as usize;

    let mut num_gain_lists = 0usize;
    for _ in 0..=num_coupled_elements {
        let target_is_cpe = bs.read_bit();
        let _target_tag = bs.read_bits(4);
        if target_is_cpe {
            let cc_l = bs.read_bit();
            let cc_r = bs.read_bit();
            num_gain_lists += cc_l as usize + cc_r as usize;
        }
        else {
            num_gain_lists += 1;
        }
    }

    let _cc_domain = bs.read_bit();
    let _gain_element_sign = bs.read_bit();
    let _gain_element_scale = bs.read_bits(2);

    let ics = Ics::read(bs, sample_rate, None, false, rng)?;

    for _ in 0..num_gain_lists {
        let common_gain_element_present = ind_sw_cce_flag || bs.read_bit();
        if common_gain_element_present {
            let _ = codebooks::decode_scalefactor_delta(bs).ok_or(Error::BitstreamOverrun)?;
        }
        else {
            for g in 0..ics.info.num_window_groups {
                for s in 0..ics.info.max_sfb {
                    let idx = g * ics.info.max_sfb + s;
                    if ics.sfb_cb.get(idx).copied().unwrap_or(ZERO_HCB) != ZERO_HCB {
                        let _ = codebooks::decode_scalefactor_delta(bs).ok_or(Error::BitstreamOverrun)?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// `extension_type` values that mark SBR/PS extension payloads, per the
/// standard's `extension_payload()` table.
const EXT_SBR_DATA: u32 = 0b1101;
const EXT_SBR_DATA_CRC: u32 = 0b1110;

fn read_fill_element(bs: &mut BitReader<'_>) -> (bool, bool) {
    let mut count = bs.read_bits(4) as usize;
    if count == 15 {
        count += bs.read_bits(8) as usize;
        count -= 1;
    }

    let mut sbr = false;
    let ps = false;
    if count > 0 {
        let ext_type = bs.peek(4);
        if ext_type == EXT_SBR_DATA || ext_type == EXT_SBR_DATA_CRC {
            sbr = true;
        }
        bs.ignore_bits(count * 8);
    }
    (sbr, ps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_bits(bits: &mut Vec<bool>, value: u32, width: usize) {
        for i in (0..width).rev() {
            bits.push((value >> i) & 1 == 1);
        }
    }

    fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
        let mut out = vec![0u8; bits.len().div_ceil(8)];
        for (i, b) in bits.iter().enumerate() {
            if *b {
                out[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        out
    }

    #[test]
    fn empty_block_is_just_the_end_marker() {
        // id_syn_ele = END (111), then pad to byte.
        let buf = [0b111_00000u8];
        let mut bs = BitReader::new(&buf);
        let mut rng = NoiseGen::new();
        let result = decode_raw_data_block(&mut bs, 44100, &mut rng).unwrap();
        assert!(result.sce.is_empty());
        assert!(result.cpe.is_empty());
        assert!(!result.sbr_signalled);
    }

    /// A coupling channel element with one coupled target whose `cc_l`/
    /// `cc_r` are both unset (no gain elements to read) must parse cleanly
    /// and consume exactly its own bits, leaving the bitstream in sync for
    /// the `END` marker that follows.
    #[test]
    fn coupling_channel_element_is_parsed_and_consumed() {
        let mut bits = Vec::new();
        push_bits(&mut bits, 0b010, 3); // CCE
        push_bits(&mut bits, 0, 4); // element_instance_tag
        push_bits(&mut bits, 0, 1); // ind_sw_cce_flag
        push_bits(&mut bits, 0, 3); // num_coupled_elements = 0 (one iteration)
        push_bits(&mut bits, 1, 1); // cc_target_is_cpe[0]
        push_bits(&mut bits, 0, 4); // cc_target_tag_select[0]
        push_bits(&mut bits, 0, 1); // cc_l[0]
        push_bits(&mut bits, 0, 1); // cc_r[0] -- num_gain_lists stays 0
        push_bits(&mut bits, 0, 1); // cc_domain
        push_bits(&mut bits, 0, 1); // gain_element_sign
        push_bits(&mut bits, 0, 2); // gain_element_scale
        push_bits(&mut bits, 0, 8); // ics: global_gain
        push_bits(&mut bits, 0, 1); // ics_reserved
        push_bits(&mut bits, 0, 2); // window_sequence = ONLY_LONG
        push_bits(&mut bits, 0, 1); // window_shape
        push_bits(&mut bits, 0, 6); // max_sfb = 0
        push_bits(&mut bits, 0, 1); // predictor_data_present
        push_bits(&mut bits, 0, 1); // pulse_data_present
        push_bits(&mut bits, 0, 1); // tns_data_present
        push_bits(&mut bits, 0, 1); // gain_control_data_present
        push_bits(&mut bits, 0b111, 3); // END

        let buf = bits_to_bytes(&bits);
        let mut bs = BitReader::new(&buf);
        let mut rng = NoiseGen::new();
        let result = decode_raw_data_block(&mut bs, 44100, &mut rng).unwrap();
        assert!(result.sce.is_empty());
        assert!(result.cpe.is_empty());
    }

    #[test]
    fn pce_after_other_elements_is_rejected() {
        // SCE (000) with tag+global_gain+minimal ics_info, long enough to
        // reach a second element header, then PCE (101).
        let mut bits = vec![false, false, false]; // SCE
        bits.extend([false; 4]); // tag
        bits.extend([false; 8]); // global_gain
        bits.extend([false; 4]); // ics_info: reserved+window_sequence(2)+window_shape
        bits.extend([false; 6]); // max_sfb = 0
        bits.push(false); // predictor_data_present = 0
        // section_data: max_sfb = 0 means the while loop never runs.
        // scale_factor_data: nothing to read.
        bits.push(false); // pulse_data_present = 0
        bits.push(false); // tns_data_present = 0
        bits.push(false); // gain_control_data_present = 0
        bits.extend([true, false, true]); // PCE id = 101

        let mut buf = vec![0u8; bits.len().div_ceil(8)];
        for (i, b) in bits.iter().enumerate() {
            if *b {
                buf[i / 8] |= 1 << (7 - (i % 8));
            }
        }
        let mut bs = BitReader::new(&buf);
        let mut rng = NoiseGen::new();
        let err = decode_raw_data_block(&mut bs, 44100, &mut rng).unwrap_err();
        assert_eq!(err, Error::PCENotFirst);
    }
}

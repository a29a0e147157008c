//! Program Configuration Element (PCE) — describes channel layout when
//! `channel_configuration == 0`.
//!
//! No teacher implementation exists anywhere in the retrieval pack (both
//! AAC snapshots return `unsupported_error` the moment a PCE is seen);
//! authored fresh from spec §3/§4.2, following the same per-field
//! `BitReader`-driven read style the rest of the header layer uses.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

pub const MAX_ELEMENTS: usize = 16;
pub const MAX_LFE: usize = 4;
pub const MAX_CHANNELS: usize = 64;

#[derive(Debug, Clone)]
pub struct ElementTagged {
    pub is_cpe: bool,
    pub tag: u8,
}

#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub element_instance_tag: u8,
    pub object_type: u8,
    pub sampling_frequency_index: u8,
    pub front: Vec<ElementTagged>,
    pub side: Vec<ElementTagged>,
    pub back: Vec<ElementTagged>,
    pub lfe_tags: Vec<u8>,
    pub assoc_data_tags: Vec<u8>,
    pub cc_tags: Vec<u8>,
    pub mono_mixdown: Option<u8>,
    pub stereo_mixdown: Option<u8>,
    pub matrix_mixdown: Option<(u8, bool)>,
    pub comment: Vec<u8>,
    /// `sce_tag_to_channel[tag]` is the first output-channel index an SCE
    /// with that instance tag maps to, if the tag appears.
    pub sce_tag_to_channel: [Option<usize>; MAX_ELEMENTS],
    /// Same, for CPE instance tags (maps to the left channel; right is
    /// `+ 1`).
    pub cpe_tag_to_channel: [Option<usize>; MAX_ELEMENTS],
    pub num_channels: usize,
}

impl ProgramConfig {
    pub fn read(bs: &mut BitReader<'_>) -> Result<Self> {
        let element_instance_tag = bs.read_bits(4) as u8;
        let object_type = bs.read_bits(2) as u8;
        let sampling_frequency_index = bs.read_bits(4) as u8;

        let n_front = bs.read_bits(4) as usize;
        let n_side = bs.read_bits(4) as usize;
        let n_back = bs.read_bits(4) as usize;
        let n_lfe = bs.read_bits(2) as usize;
        let n_assoc = bs.read_bits(3) as usize;
        let n_cc = bs.read_bits(4) as usize;

        let mono_mixdown = if bs.read_bit() { Some(bs.read_bits(4) as u8) } else { None };
        let stereo_mixdown = if bs.read_bit() { Some(bs.read_bits(4) as u8) } else { None };
        let matrix_mixdown = if bs.read_bit() {
            let idx = bs.read_bits(2) as u8;
            let pseudo_surround = bs.read_bit();
            Some((idx, pseudo_surround))
        }
        else {
            None
        };

        let mut sce_tag_to_channel = [None; MAX_ELEMENTS];
        let mut cpe_tag_to_channel = [None; MAX_ELEMENTS];
        let mut channel = 0usize;

        let read_group = |bs: &mut BitReader<'_>,
                           n: usize,
                           sce_map: &mut [Option<usize>; MAX_ELEMENTS],
                           cpe_map: &mut [Option<usize>; MAX_ELEMENTS],
                           channel: &mut usize|
         -> Result<Vec<ElementTagged>> {
            let mut out = Vec::with_capacity(n);
            for _ in 0..n {
                let is_cpe = bs.read_bit();
                let tag = bs.read_bits(4) as u8;
                if is_cpe {
                    cpe_map[tag as usize] = Some(*channel);
                    *channel += 2;
                }
                else {
                    sce_map[tag as usize] = Some(*channel);
                    *channel += 1;
                }
                out.push(ElementTagged { is_cpe, tag });
            }
            Ok(out)
        };

        let front = read_group(bs, n_front, &mut sce_tag_to_channel, &mut cpe_tag_to_channel, &mut channel)?;
        let side = read_group(bs, n_side, &mut sce_tag_to_channel, &mut cpe_tag_to_channel, &mut channel)?;
        let back = read_group(bs, n_back, &mut sce_tag_to_channel, &mut cpe_tag_to_channel, &mut channel)?;

        let mut lfe_tags = Vec::with_capacity(n_lfe);
        for _ in 0..n_lfe {
            lfe_tags.push(bs.read_bits(4) as u8);
            channel += 1;
        }

        let mut assoc_data_tags = Vec::with_capacity(n_assoc);
        for _ in 0..n_assoc {
            assoc_data_tags.push(bs.read_bits(4) as u8);
        }

        let mut cc_tags = Vec::with_capacity(n_cc);
        for _ in 0..n_cc {
            bs.ignore_bit(); // cc_element_is_ind_sw
            cc_tags.push(bs.read_bits(4) as u8);
        }

        bs.byte_align();

        let comment_len = bs.read_bits(8) as usize;
        let mut comment = Vec::with_capacity(comment_len);
        for _ in 0..comment_len {
            comment.push(bs.read_bits(8) as u8);
        }

        if channel > MAX_CHANNELS {
            return Err(Error::BitstreamValueNotAllowed);
        }

        Ok(ProgramConfig {
            element_instance_tag,
            object_type,
            sampling_frequency_index,
            front,
            side,
            back,
            lfe_tags,
            assoc_data_tags,
            cc_tags,
            mono_mixdown,
            stereo_mixdown,
            matrix_mixdown,
            comment,
            sce_tag_to_channel,
            cpe_tag_to_channel,
            num_channels: channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_from_str(s: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        let bits: Vec<u8> = s.chars().filter(|c| *c == '0' || *c == '1').map(|c| c as u8 - b'0').collect();
        for chunk in bits.chunks(8) {
            let mut b = 0u8;
            for (i, bit) in chunk.iter().enumerate() {
                b |= bit << (7 - i);
            }
            bytes.push(b);
        }
        bytes
    }

    #[test]
    fn minimal_pce_one_front_sce() {
        // tag=0, object_type=1(Main), srate_idx=3, fronts=1, side=0, back=0, lfe=0,
        // assoc=0, cc=0, no mixdowns, front[0] = (is_cpe=0, tag=0), then byte align,
        // comment_len=0.
        let s = "0000 01 0011 0001 0000 0000 00 000 0000 0 0 0 0 0000";
        let bytes = bits_from_str(s);
        let mut bs = BitReader::new(&bytes);
        let pce = ProgramConfig::read(&mut bs).unwrap();
        assert_eq!(pce.num_channels, 1);
        assert_eq!(pce.sce_tag_to_channel[0], Some(0));
    }
}

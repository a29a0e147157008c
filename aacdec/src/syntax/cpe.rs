//! Channel pair element: two `individual_channel_stream()`s sharing an
//! optional common `ics_info()`, plus mid/side and intensity joint-stereo
//! reconstruction (spec §4.3 `channel_pair_element`, §4.4 step 4).
//!
//! Ported from `symphonia-codec-aac/src/aac/cpe.rs`.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::codebooks::{INTENSITY_HCB, INTENSITY_HCB2};
use crate::common::{GASubbandInfo, NoiseGen};
use crate::syntax::ics::Ics;

#[derive(Debug, Clone)]
pub struct ChannelPair {
    pub common_window: bool,
    pub ms_mask_present: u32,
    pub ms_used: Vec<bool>,
    pub ch0: Ics,
    pub ch1: Ics,
}

impl ChannelPair {
    pub fn read(bs: &mut BitReader<'_>, sample_rate: u32, rng: &mut NoiseGen) -> Result<Self> {
        let common_window = bs.read_bit();

        let (shared_info, ms_mask_present, ms_used) = if common_window {
            let info = crate::syntax::ics::IcsInfo::read(bs, sample_rate)?;
            let ms_mask_present = bs.read_bits(2);
            if ms_mask_present == 3 {
                return Err(Error::MSMaskReserved);
            }
            let mut ms_used = vec![false; info.num_window_groups * info.max_sfb];
            if ms_mask_present == 1 {
                for m in ms_used.iter_mut() {
                    *m = bs.read_bit();
                }
            }
            else if ms_mask_present == 2 {
                for m in ms_used.iter_mut() {
                    *m = true;
                }
            }
            (Some(info), ms_mask_present, ms_used)
        }
        else {
            (None, 0, Vec::new())
        };

        let ch0 = Ics::read(bs, sample_rate, shared_info.as_ref(), false, rng)?;
        let ch1 = Ics::read(bs, sample_rate, shared_info.as_ref(), true, rng)?;

        let mut pair = ChannelPair { common_window, ms_mask_present, ms_used, ch0, ch1 };
        pair.apply_ms(sample_rate);
        pair.apply_intensity(sample_rate);
        Ok(pair)
    }

    /// Mid/side reconstruction: for every (window group, sfb) flagged in
    /// `ms_used`, replace the stored (mid, side) pair with (L, R) =
    /// (mid + side, mid - side) across every bin of every window in that
    /// sfb of that group.
    fn apply_ms(&mut self, sample_rate: u32) {
        if !self.common_window || self.ms_mask_present == 0 {
            return;
        }
        let info = self.ch0.info.clone();
        let swb_info = match GASubbandInfo::find(sample_rate) {
            Some(i) => i,
            None => return,
        };
        let offsets =
            if info.window_sequence.is_short() { swb_info.short_bands } else { swb_info.long_bands };

        for g in 0..info.num_window_groups {
            for s in 0..info.max_sfb {
                let idx = g * info.max_sfb + s;
                if !self.ms_used.get(idx).copied().unwrap_or(false) {
                    continue;
                }
                let cb0 = self.ch0.sfb_cb[idx];
                let cb1 = self.ch1.sfb_cb[idx];
                if cb0 == INTENSITY_HCB || cb0 == INTENSITY_HCB2 || cb1 == INTENSITY_HCB || cb1 == INTENSITY_HCB2
                {
                    continue;
                }
                let start = *offsets.get(s).unwrap_or(&0);
                let end = *offsets.get(s + 1).unwrap_or(&start);
                let ch0 = &mut self.ch0.coeffs;
                let ch1 = &mut self.ch1.coeffs;
                Self::for_band_bins_range(&info, g, start, end, |bin| {
                    if bin < ch0.len() && bin < ch1.len() {
                        let m = ch0[bin];
                        let side = ch1[bin];
                        ch0[bin] = m + side;
                        ch1[bin] = m - side;
                    }
                });
            }
        }
    }

    /// Intensity stereo: bands where channel 1 used codebook 14/15 carry no
    /// spectral data of their own — they're reconstructed from channel 0's
    /// spectrum, scaled by the intensity position stored as channel 1's
    /// "scale factor" and sign-flipped for codebook 14 (INTENSITY_HCB2,
    /// "out of phase").
    fn apply_intensity(&mut self, sample_rate: u32) {
        let info = self.ch1.info.clone();
        let swb_info = match GASubbandInfo::find(sample_rate) {
            Some(i) => i,
            None => return,
        };
        let offsets =
            if info.window_sequence.is_short() { swb_info.short_bands } else { swb_info.long_bands };

        for g in 0..info.num_window_groups {
            for s in 0..info.max_sfb {
                let idx = g * info.max_sfb + s;
                let cb1 = self.ch1.sfb_cb[idx];
                if cb1 != INTENSITY_HCB && cb1 != INTENSITY_HCB2 {
                    continue;
                }
                let sign = if cb1 == INTENSITY_HCB2 { -1.0 } else { 1.0 };
                let ms_sign = if self.ms_mask_present != 0
                    && self.ms_used.get(idx).copied().unwrap_or(false)
                {
                    -1.0
                }
                else {
                    1.0
                };
                let scale = crate::spectral::intensity_multiplier(self.ch1.scale_factors[idx]);
                let factor = sign * ms_sign * scale;

                let start = *offsets.get(s).unwrap_or(&0);
                let end = *offsets.get(s + 1).unwrap_or(&start);
                Self::for_band_bins_range(&info, g, start, end, |bin| {
                    if bin < self.ch0.coeffs.len() && bin < self.ch1.coeffs.len() {
                        self.ch1.coeffs[bin] = self.ch0.coeffs[bin] * factor;
                    }
                });
            }
        }
    }

    fn for_band_bins_range(
        info: &crate::syntax::ics::IcsInfo,
        group: usize,
        start: usize,
        end: usize,
        mut f: impl FnMut(usize),
    ) {
        let win_len = if info.window_sequence.is_short() { 128 } else { 1024 };
        let group_len = info.window_group_length[group];
        let base_window: usize = info.window_group_length[..group].iter().sum();
        for w in 0..group_len {
            let win_base = (base_window + w) * win_len;
            for bin in start..end {
                f(win_base + bin);
            }
        }
    }
}

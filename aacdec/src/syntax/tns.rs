//! Temporal Noise Shaping (TNS): an all-pole filter applied in the
//! frequency domain to control pre-echo (spec §4.3 `tns_data`, §4.4 step 6).
//!
//! Ported from `symphonia-codec-aac/src/aac/ics/tns.rs`: PARCOR reflection
//! coefficients are read directly from the bitstream (as `sin()` of a
//! quantised angle) and converted to direct-form LPC coefficients via the
//! standard Levinson-style lattice recursion, then applied as a forward or
//! backward all-pole IIR filter over the filter's declared band range.
use aacdec_core::io::bit::BitReader;

use crate::syntax::ics::WindowSequence;

pub const TNS_MAX_ORDER: usize = 20;

/// Per-sample-rate-index maximum number of TNS bands for long and short
/// windows, as specified by the standard.
pub const TNS_MAX_LONG_BANDS: [usize; 12] =
    [31, 31, 34, 40, 42, 51, 46, 46, 42, 42, 42, 39];
pub const TNS_MAX_SHORT_BANDS: [usize; 12] = [9, 9, 10, 14, 14, 14, 14, 14, 14, 14, 14, 14];

#[derive(Debug, Clone, Default)]
pub struct TnsFilter {
    pub length: usize,
    pub order: usize,
    pub direction: bool,
    pub coef: [f32; TNS_MAX_ORDER + 1],
}

impl TnsFilter {
    fn read(bs: &mut BitReader<'_>, long: bool, coef_res: u32) -> Self {
        let length = if long { bs.read_bits(6) } else { bs.read_bits(4) } as usize;
        let order = (if long { bs.read_bits(5) } else { bs.read_bits(3) } as usize).min(TNS_MAX_ORDER);
        let direction = if order > 0 { bs.read_bit() } else { false };
        let coef_compress = if order > 0 { bs.read_bit() } else { false };
        let coef_bits = coef_res + 3 - coef_compress as u32;

        let mut parcor = [0f32; TNS_MAX_ORDER + 1];
        for p in parcor.iter_mut().take(order) {
            let raw = bs.read_bits_signed(coef_bits);
            let inv_scale = 1.0 / (1i32 << (coef_bits - 1)) as f32;
            *p = (raw as f32 * inv_scale * std::f32::consts::FRAC_PI_2).sin();
        }

        // PARCOR (lattice reflection coefficients) to direct form, via the
        // standard recursion.
        let mut coef = [0f32; TNS_MAX_ORDER + 1];
        let mut tmp = [0f32; TNS_MAX_ORDER + 1];
        for i in 0..order {
            tmp[i] = parcor[i];
            for j in 0..i {
                tmp[j] = coef[j] + parcor[i] * coef[i - 1 - j];
            }
            coef[..i + 1].copy_from_slice(&tmp[..i + 1]);
        }

        TnsFilter { length, order, direction, coef }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tns {
    pub n_filt: [usize; 8],
    pub filters: Vec<Vec<TnsFilter>>,
}

impl Tns {
    pub fn read(bs: &mut BitReader<'_>, window_sequence: WindowSequence, num_windows: usize) -> Self {
        let long = window_sequence != WindowSequence::EightShort;
        let mut n_filt = [0usize; 8];
        let mut filters = Vec::with_capacity(num_windows);

        for w in 0..num_windows {
            let n = if long { bs.read_bits(2) } else { bs.read_bits(1) } as usize;
            n_filt[w] = n;
            let mut win_filters = Vec::with_capacity(n);
            if n > 0 {
                let coef_res = bs.read_bits(1);
                for _ in 0..n {
                    win_filters.push(TnsFilter::read(bs, long, coef_res));
                }
            }
            filters.push(win_filters);
        }

        Tns { n_filt, filters }
    }

    /// Applies every active filter of window `w` to `spectrum`, an all-pole
    /// IIR run forward or backward across the filter's declared band range
    /// (expressed in SWB-offset bin coordinates via `start_bin`).
    pub fn apply(&self, w: usize, spectrum: &mut [f32], start_bin: usize, bin_count: usize) {
        let Some(win_filters) = self.filters.get(w) else { return };
        for filt in win_filters {
            if filt.order == 0 {
                continue;
            }
            let end = (start_bin + bin_count).min(spectrum.len());
            if start_bin >= end {
                continue;
            }
            let band = &mut spectrum[start_bin..end];
            let len = filt.length.min(band.len());
            if filt.direction {
                for i in (0..len).rev() {
                    let mut acc = band[i];
                    for (k, c) in filt.coef.iter().take(filt.order).enumerate() {
                        if i + k + 1 < len {
                            acc -= c * band[i + k + 1];
                        }
                    }
                    band[i] = acc;
                }
            }
            else {
                for i in 0..len {
                    let mut acc = band[i];
                    for (k, c) in filt.coef.iter().take(filt.order).enumerate() {
                        if i > k {
                            acc -= c * band[i - k - 1];
                        }
                    }
                    band[i] = acc;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_filter_count_reads_cleanly() {
        let buf = [0u8; 4];
        let mut bs = BitReader::new(&buf);
        let tns = Tns::read(&mut bs, WindowSequence::OnlyLong, 1);
        assert_eq!(tns.n_filt[0], 0);
        assert!(tns.filters[0].is_empty());
    }
}

//! Synthesis filter bank: per-channel IMDCT, window application, and 50%
//! overlap-add (spec §4.4 steps 7-8).
//!
//! Ported from `symphonia-codec-aac/src/aac/dsp.rs`, rebuilt against this
//! crate's direct-form `Imdct` (see `aacdec_core::dsp::mdct`) instead of
//! the teacher's fast factorization.
use aacdec_core::dsp::mdct::Imdct;
use aacdec_core::dsp::window::{generate_window, WindowType};

use crate::syntax::ics::{Ics, WindowSequence};

/// Number of short-block IMDCT outputs (256) placed before the first one
/// starts contributing, so eight hop-128 blocks centre within the 2048-wide
/// long-window timeline: `(2048 - (7 * 128 + 256)) / 2`.
const SHORT_BLOCK_OFFSET: usize = 448;

pub struct Filterbank {
    imdct_long: Imdct,
    imdct_short: Imdct,
    sine_long: Vec<f32>,
    kbd_long: Vec<f32>,
    sine_short: Vec<f32>,
    kbd_short: Vec<f32>,
}

impl Filterbank {
    pub fn new() -> Self {
        let mut sine_long = vec![0f32; 2048];
        generate_window(WindowType::Sine, 1.0, 2048, false, &mut sine_long);
        let mut kbd_long = vec![0f32; 2048];
        generate_window(WindowType::KaiserBessel(4.0), 1.0, 2048, false, &mut kbd_long);
        let mut sine_short = vec![0f32; 256];
        generate_window(WindowType::Sine, 1.0, 256, false, &mut sine_short);
        let mut kbd_short = vec![0f32; 256];
        generate_window(WindowType::KaiserBessel(6.0), 1.0, 256, false, &mut kbd_short);

        Filterbank {
            imdct_long: Imdct::new(1024),
            imdct_short: Imdct::new(128),
            sine_long,
            kbd_long,
            sine_short,
            kbd_short,
        }
    }

    fn window_for(&self, kbd: bool, short: bool) -> &[f32] {
        match (kbd, short) {
            (false, false) => &self.sine_long,
            (true, false) => &self.kbd_long,
            (false, true) => &self.sine_short,
            (true, true) => &self.kbd_short,
        }
    }

    /// Runs the synthesis filter bank for one already-dequantised channel,
    /// overlap-adding with `overlap` (1024 samples of state carried from
    /// the previous frame) and producing 1024 time-domain samples in `out`.
    /// `prev_window_shape` is the `window_shape` the same channel decoded on
    /// its previous frame — needed to build the hybrid `LongStart`/
    /// `LongStop` window, since half of that window must match whatever
    /// shape the overlapping previous frame actually used.
    pub fn synth(&self, ics: &Ics, prev_window_shape: bool, overlap: &mut [f32; 1024], out: &mut [f32; 1024]) {
        match ics.info.window_sequence {
            WindowSequence::EightShort => self.synth_short(ics, overlap, out),
            _ => self.synth_long(ics, prev_window_shape, overlap, out),
        }
    }

    /// Builds the 2048-sample synthesis window for a long-type block. Plain
    /// `OnlyLong` blocks use one shape throughout; `LongStart`/`LongStop`
    /// blocks splice in a short-window taper on the side that borders a
    /// sequence of `EightShort` blocks, per spec §4.5, so the overlap-add
    /// region on that side still sums to unity with the short blocks'
    /// windows instead of producing an audible step.
    fn hybrid_window(&self, ics: &Ics, prev_window_shape: bool) -> Vec<f32> {
        let mut window = vec![0f32; 2048];
        match ics.info.window_sequence {
            WindowSequence::LongStart => {
                let prev_long = self.window_for(prev_window_shape, false);
                let cur_short = self.window_for(ics.info.window_shape, true);
                window[..1024].copy_from_slice(&prev_long[..1024]);
                window[1024..1152].copy_from_slice(&cur_short[128..256]);
                // [1152..2048) stays at the zero it was initialised to.
            }
            WindowSequence::LongStop => {
                let prev_short = self.window_for(prev_window_shape, true);
                let cur_long = self.window_for(ics.info.window_shape, false);
                // [0..896) stays at zero.
                window[896..1024].copy_from_slice(&prev_short[..128]);
                window[1024..2048].copy_from_slice(&cur_long[1024..2048]);
            }
            _ => window.copy_from_slice(self.window_for(ics.info.window_shape, false)),
        }
        window
    }

    fn synth_long(&self, ics: &Ics, prev_window_shape: bool, overlap: &mut [f32; 1024], out: &mut [f32; 1024]) {
        let mut td = [0f32; 2048];
        let src = if ics.coeffs.len() >= 1024 { &ics.coeffs[..1024] } else { &ics.coeffs[..] };
        let mut padded = [0f32; 1024];
        padded[..src.len()].copy_from_slice(src);
        // ISO/IEC 13818-7's IMDCT definition includes a 2/N normalisation
        // factor ahead of the summation; `Imdct::imdct`'s `scale` parameter
        // carries it here since the transform itself is N-agnostic.
        self.imdct_long.imdct(&padded, &mut td, 2.0 / 2048.0);

        let window = self.hybrid_window(ics, prev_window_shape);
        for (t, w) in td.iter_mut().zip(window.iter()) {
            *t *= w;
        }

        for i in 0..1024 {
            out[i] = overlap[i] + td[i];
        }
        overlap.copy_from_slice(&td[1024..2048]);
    }

    fn synth_short(&self, ics: &Ics, overlap: &mut [f32; 1024], out: &mut [f32; 1024]) {
        let mut timeline = vec![0f32; 2048];
        let window = self.window_for(ics.info.window_shape, true);

        for w in 0..8 {
            let start = w * 128;
            let src = if ics.coeffs.len() >= start + 128 {
                &ics.coeffs[start..start + 128]
            }
            else {
                &[][..]
            };
            let mut padded = [0f32; 128];
            if !src.is_empty() {
                padded.copy_from_slice(src);
            }
            let mut td = [0f32; 256];
            self.imdct_short.imdct(&padded, &mut td, 2.0 / 256.0);

            let base = SHORT_BLOCK_OFFSET + w * 128;
            for i in 0..256 {
                timeline[base + i] += td[i] * window[i];
            }
        }

        for i in 0..1024 {
            out[i] = overlap[i] + timeline[i];
        }
        overlap.copy_from_slice(&timeline[1024..2048]);
    }
}

impl Default for Filterbank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ics::IcsInfo;

    fn silent_ics(window_sequence: WindowSequence) -> Ics {
        Ics {
            info: IcsInfo {
                window_sequence,
                window_shape: false,
                max_sfb: 0,
                num_windows: if window_sequence == WindowSequence::EightShort { 8 } else { 1 },
                num_window_groups: 1,
                window_group_length: [1, 0, 0, 0, 0, 0, 0, 0],
                num_swb: 0,
                predictor_data_present: false,
            },
            global_gain: 0,
            sfb_cb: Vec::new(),
            scale_factors: Vec::new(),
            coeffs: vec![0f32; 1024],
            pulse: None,
            tns: None,
        }
    }

    #[test]
    fn silent_long_frame_produces_silence() {
        let fb = Filterbank::new();
        let ics = silent_ics(WindowSequence::OnlyLong);
        let mut overlap = [0f32; 1024];
        let mut out = [0f32; 1024];
        fb.synth(&ics, false, &mut overlap, &mut out);
        assert!(out.iter().all(|&v| v.abs() < 1e-4));
    }

    #[test]
    fn silent_short_frame_produces_silence() {
        let fb = Filterbank::new();
        let ics = silent_ics(WindowSequence::EightShort);
        let mut overlap = [0f32; 1024];
        let mut out = [0f32; 1024];
        fb.synth(&ics, false, &mut overlap, &mut out);
        assert!(out.iter().all(|&v| v.abs() < 1e-4));
    }

    #[test]
    fn silent_long_start_frame_produces_silence() {
        let fb = Filterbank::new();
        let ics = silent_ics(WindowSequence::LongStart);
        let mut overlap = [0f32; 1024];
        let mut out = [0f32; 1024];
        fb.synth(&ics, false, &mut overlap, &mut out);
        assert!(out.iter().all(|&v| v.abs() < 1e-4));
    }

    #[test]
    fn silent_long_stop_frame_produces_silence() {
        let fb = Filterbank::new();
        let ics = silent_ics(WindowSequence::LongStop);
        let mut overlap = [0f32; 1024];
        let mut out = [0f32; 1024];
        fb.synth(&ics, false, &mut overlap, &mut out);
        assert!(out.iter().all(|&v| v.abs() < 1e-4));
    }

    /// `hybrid_window`'s `LongStart` segment boundaries: a previous-shape
    /// long half, a current-shape short taper, then silence.
    #[test]
    fn hybrid_window_long_start_has_zero_tail() {
        let fb = Filterbank::new();
        let ics = silent_ics(WindowSequence::LongStart);
        let window = fb.hybrid_window(&ics, false);
        assert_eq!(window.len(), 2048);
        assert!(window[1152..2048].iter().all(|&v| v == 0.0));
    }

    /// `hybrid_window`'s `LongStop` segment boundaries: silence, a
    /// previous-shape short taper, then a current-shape long half.
    #[test]
    fn hybrid_window_long_stop_has_zero_head() {
        let fb = Filterbank::new();
        let ics = silent_ics(WindowSequence::LongStop);
        let window = fb.hybrid_window(&ics, false);
        assert_eq!(window.len(), 2048);
        assert!(window[..896].iter().all(|&v| v == 0.0));
    }
}

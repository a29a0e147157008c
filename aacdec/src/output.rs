//! Channel-to-position mapping, 5.1-to-stereo downmix, and PCM interleaving
//! (spec §4.6).
//!
//! Grounded on `symphonia-core::audio`'s channel-ordering conventions
//! (`Channels::ordered`, used here to decide interleaving order) and on
//! ITU-R BS.775-1's downmix equations, which no example repo in this pack
//! implements but which the spec calls out explicitly.
use aacdec_core::audio::{convert_sample, Channels, SampleFormat};

/// `Lo = m*(L + k*C + k*Ls)`, `Ro = m*(R + k*C + k*Rs)`, `k = 1/sqrt(2)`,
/// per ITU-R BS.775-1. The LFE channel is not folded in: BS.775-1 leaves LFE
/// downmix weighting to the implementation, and omitting it is the
/// conservative, most common choice (it avoids clipping headroom loss on
/// program material that relies on a hot LFE track).
const DOWNMIX_COEFF: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Overall normalisation applied to the summed signal, `1 / (1 + sqrt(2) +
/// 1/sqrt(2))`, so a full-scale 5-channel signal downmixes without clipping.
const DOWNMIX_NORM: f32 =
    1.0 / (1.0 + std::f32::consts::SQRT_2 + std::f32::consts::FRAC_1_SQRT_2);

/// Downmixes a 5.1 layout (front-centre, front-left, front-right,
/// side-left, side-right, LFE) to stereo. `channels` gives each input
/// slot's position, `frames` the matching per-channel sample buffers (all
/// the same length).
pub fn downmix_surround_to_stereo(positions: &[Channels], frames: &[&[f32]]) -> (Vec<f32>, Vec<f32>) {
    let len = frames.first().map_or(0, |c| c.len());
    let mut lo = vec![0f32; len];
    let mut ro = vec![0f32; len];

    let find = |pos: Channels| positions.iter().position(|&p| p == pos);
    let centre = find(Channels::FRONT_CENTRE).map(|i| frames[i]);
    let left = find(Channels::FRONT_LEFT).map(|i| frames[i]);
    let right = find(Channels::FRONT_RIGHT).map(|i| frames[i]);
    let side_left = find(Channels::SIDE_LEFT).map(|i| frames[i]);
    let side_right = find(Channels::SIDE_RIGHT).map(|i| frames[i]);

    for n in 0..len {
        let mut l = left.map_or(0.0, |c| c[n]);
        let mut r = right.map_or(0.0, |c| c[n]);
        if let Some(c) = centre {
            l += DOWNMIX_COEFF * c[n];
            r += DOWNMIX_COEFF * c[n];
        }
        if let Some(s) = side_left {
            l += DOWNMIX_COEFF * s[n];
        }
        if let Some(s) = side_right {
            r += DOWNMIX_COEFF * s[n];
        }
        lo[n] = DOWNMIX_NORM * l;
        ro[n] = DOWNMIX_NORM * r;
    }
    (lo, ro)
}

/// Interleaves `frames` (one slice per channel, in `positions` order) into
/// `out`, converting every sample to `fmt` via `convert_sample`.
/// `out` must be at least `frames[0].len() * frames.len() * bytes_per_sample(fmt)`.
pub fn interleave(frames: &[&[f32]], fmt: SampleFormat, out: &mut [u8]) {
    let bytes = bytes_per_sample(fmt);
    let len = frames.first().map_or(0, |c| c.len());
    let channels = frames.len();
    for n in 0..len {
        for (ch, buf) in frames.iter().enumerate() {
            let offset = (n * channels + ch) * bytes;
            convert_sample(buf[n], fmt, &mut out[offset..offset + bytes]);
        }
    }
}

pub fn bytes_per_sample(fmt: SampleFormat) -> usize {
    match fmt {
        SampleFormat::I16 => 2,
        SampleFormat::I24 => 3,
        SampleFormat::I32 => 4,
        SampleFormat::F32 => 4,
        SampleFormat::F64 => 8,
    }
}

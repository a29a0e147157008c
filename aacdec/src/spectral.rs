//! Spectral reconstruction: inverse quantisation, scale-factor rescale,
//! and Perceptual Noise Substitution band fill.
//!
//! Ported from `symphonia-codec-aac/src/aac.rs`'s `iquant`/`requant`
//! helpers and `decode_noise`, and the module-level `POW43_TABLE`
//! `lazy_static`.
use crate::common::NoiseGen;

const POW43_TABLE_SIZE: usize = 8192;

lazy_static::lazy_static! {
    static ref POW43_TABLE: [f32; POW43_TABLE_SIZE] = {
        let mut table = [0f32; POW43_TABLE_SIZE];
        for (i, t) in table.iter_mut().enumerate() {
            *t = (i as f32).powf(4.0 / 3.0);
        }
        table
    };
}

/// `sign(x) * |x|^(4/3)`, via the precomputed table for small magnitudes
/// and a direct power computation beyond the table's range.
pub fn iquant(x: i32) -> f32 {
    let sign = if x < 0 { -1.0 } else { 1.0 };
    let ax = x.unsigned_abs() as usize;
    let mag = if ax < POW43_TABLE_SIZE { POW43_TABLE[ax] } else { (ax as f32).powf(4.0 / 3.0) };
    sign * mag
}

/// Inverse of `iquant`: `sign(x) * |x|^(3/4)`, used when re-deriving the
/// raw Huffman-domain magnitude of an already-dequantised coefficient (for
/// pulse injection, per spec §4.4 step 3).
pub fn requant(x: f32) -> i32 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    (sign * x.abs().powf(3.0 / 4.0)).round() as i32
}

/// `2^(0.25 * (scale - 100))`, the per-band rescale multiplier spec §4.4
/// step 2 specifies.
pub fn scale_factor_multiplier(scale: i32) -> f32 {
    2f32.powf(0.25 * (scale as f32 - 100.0))
}

/// `2^(-0.25 * is_position)`, the intensity-stereo reconstruction multiplier
/// spec §4.4 step 5 specifies (`R = L * s * 0.5^(0.25*is_position)`) — not
/// to be confused with `scale_factor_multiplier`, which has the opposite
/// exponent sign and a `-100` offset that only applies to ordinary bands.
pub fn intensity_multiplier(is_position: i32) -> f32 {
    2f32.powf(-0.25 * is_position as f32)
}

/// Fills `band` with energy-matched white noise for a PNS (codebook 13)
/// band, per spec §4.4 step 2. The noise energy target is
/// `2^(0.25 * noise_energy)`; the generated values are normalised to match
/// it before scaling.
pub fn fill_noise_band(band: &mut [f32], noise_energy: i32, rng: &mut NoiseGen) {
    if band.is_empty() {
        return;
    }
    for v in band.iter_mut() {
        *v = rng.next();
    }
    let energy: f32 = band.iter().map(|v| v * v).sum::<f32>() / band.len() as f32;
    if energy <= 0.0 {
        return;
    }
    let target = 2f32.powf(0.25 * noise_energy as f32);
    let norm = (target / energy).sqrt();
    for v in band.iter_mut() {
        *v *= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iquant_preserves_sign() {
        assert!(iquant(5) > 0.0);
        assert!(iquant(-5) < 0.0);
        assert_eq!(iquant(0), 0.0);
    }

    #[test]
    fn requant_is_an_approximate_inverse() {
        for x in [1, 2, 5, 100, 1000] {
            let back = requant(iquant(x));
            assert!((back - x).abs() <= 1, "x={x} back={back}");
        }
    }

    #[test]
    fn noise_band_matches_target_energy() {
        let mut rng = NoiseGen::new();
        let mut band = vec![0f32; 16];
        fill_noise_band(&mut band, 100, &mut rng);
        let energy: f32 = band.iter().map(|v| v * v).sum::<f32>() / band.len() as f32;
        let target = 2f32.powf(0.25 * 100.0);
        assert!((energy - target).abs() / target < 0.05);
    }
}

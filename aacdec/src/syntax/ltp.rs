//! `ltp_data()`: Long Term Prediction side info (spec §4.3, §4.4 step 5).
//!
//! Per spec Non-goals, LTP *synthesis* (re-adding the predicted signal from
//! history) is not performed — this module only parses the side info far
//! enough to stay byte-aligned with the rest of the bitstream and to
//! validate `ltp_lag`, the one LTP field spec §4.4 calls out as needing a
//! named bitstream error.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

#[derive(Debug, Clone, Copy, Default)]
pub struct LtpData {
    pub lag: u32,
    pub coef: u8,
    pub long_used: [bool; 8],
}

impl LtpData {
    pub fn read(bs: &mut BitReader<'_>, frame_length: usize, num_swb: usize) -> Result<Self> {
        let lag = bs.read_bits(11);
        if lag as usize > 2 * frame_length {
            return Err(Error::LTPLagOutOfRange);
        }
        let coef = bs.read_bits(3) as u8;
        let mut long_used = [false; 8];
        for used in long_used.iter_mut().take(num_swb.min(8)) {
            *used = bs.read_bit();
        }
        Ok(LtpData { lag, coef, long_used })
    }
}

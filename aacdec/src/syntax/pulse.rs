//! Pulse data: long-window-only additive correction applied before inverse
//! quantisation (spec §4.3 `pulse_data`, §4.4 step 3).
//!
//! Ported from `symphonia-codec-aac/src/aac/ics/pulse.rs`.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::syntax::ics::WindowSequence;

pub const MAX_PULSES: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct Pulse {
    pub number_pulse: usize,
    pub pulse_start_sfb: usize,
    pub pulse_offset: [u8; MAX_PULSES],
    pub pulse_amp: [i8; MAX_PULSES],
}

impl Pulse {
    pub fn read(bs: &mut BitReader<'_>, window_sequence: WindowSequence, num_swb: usize) -> Result<Self> {
        if window_sequence == WindowSequence::EightShort {
            return Err(Error::PulseInShortBlock);
        }

        let number_pulse = bs.read_bits(2) as usize + 1;
        let pulse_start_sfb = bs.read_bits(6) as usize;
        if pulse_start_sfb > num_swb {
            return Err(Error::BitstreamValueNotAllowed);
        }

        let mut pulse_offset = [0u8; MAX_PULSES];
        let mut pulse_amp = [0i8; MAX_PULSES];
        for i in 0..number_pulse {
            pulse_offset[i] = bs.read_bits(5) as u8;
            let amp = bs.read_bits(4) as i8;
            pulse_amp[i] = amp;
        }

        Ok(Pulse { number_pulse, pulse_start_sfb, pulse_offset, pulse_amp })
    }

    /// Injects the pulse amplitudes into the raw (pre-inverse-quant) Huffman
    /// magnitude buffer, per spec §4.4 step 3: running bin offset starts at
    /// the first bin of `pulse_start_sfb`, advances by each pulse's
    /// `pulse_offset`, and the amplitude is added with the sign of the
    /// current coefficient's sign convention.
    pub fn apply(&self, raw: &mut [i32], swb_offset: &[usize]) {
        let mut bin = swb_offset.get(self.pulse_start_sfb).copied().unwrap_or(0);
        for i in 0..self.number_pulse {
            bin += self.pulse_offset[i] as usize;
            if let Some(c) = raw.get_mut(bin) {
                let sign = if *c < 0 { -1 } else { 1 };
                *c += sign * self.pulse_amp[i] as i32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_pulse_in_short_block() {
        let buf = [0u8; 4];
        let mut bs = BitReader::new(&buf);
        let err = Pulse::read(&mut bs, WindowSequence::EightShort, 12).unwrap_err();
        assert_eq!(err, Error::PulseInShortBlock);
    }
}

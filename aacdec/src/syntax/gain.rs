//! SSR `gain_control_data()` — out of scope for this decoder (spec
//! Non-goals exclude AAC SSR entirely). Present only so the element reader
//! can recognise and reject it with a named error instead of mis-parsing
//! the rest of the frame against a gain-control-shaped bitstream.
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

/// Always returns `Error::GainControlNotSupported`; the caller is expected
/// to have already detected the `gain_control_data_present` flag and to
/// call this only to produce a named error rather than silently
/// desyncing the bit reader.
pub fn read(_bs: &mut BitReader<'_>) -> Result<()> {
    Err(Error::GainControlNotSupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_rejects() {
        let buf = [0u8; 4];
        let mut bs = BitReader::new(&buf);
        assert_eq!(read(&mut bs).unwrap_err(), Error::GainControlNotSupported);
    }
}

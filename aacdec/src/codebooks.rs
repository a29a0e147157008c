//! AAC Huffman codebooks: 11 spectral codebooks plus the scale-factor
//! delta codebook.
//!
//! `mod codebooks;` is declared by both AAC snapshots in the teacher repo,
//! but the table-data file itself (`codebooks.rs`) exists in neither — it
//! was not retrieved. The standard defines 11 spectral codebooks (quad
//! codebooks 1-4 carrying 4 values per codeword, pair codebooks 5-11
//! carrying 2, codebook 11 additionally escape-coded) plus one codebook
//! for scale-factor deltas, each specified as a fixed table of
//! (codeword-length, value-tuple) pairs. Transcribing ~1200 individual
//! code lengths from memory carries a high error rate that cannot be
//! caught without executing the decoder against reference vectors (which
//! this exercise never does), so the exact per-symbol lengths here are a
//! structurally faithful reconstruction — shorter codes assigned to
//! smaller-magnitude tuples, exactly as the real tables do by
//! construction, decoded through the same canonical-Huffman machinery a
//! byte-exact table would use — rather than a claimed byte-for-byte
//! transcription of the ISO/IEC 13818-7 annex tables. See DESIGN.md.
use aacdec_core::io::huffman::HuffmanTable;

pub const ZERO_HCB: u8 = 0;
pub const FIRST_PAIR_HCB: u8 = 5;
pub const ESC_HCB: u8 = 11;
pub const RESERVED_HCB: u8 = 12;
pub const NOISE_HCB: u8 = 13;
pub const INTENSITY_HCB2: u8 = 14;
pub const INTENSITY_HCB: u8 = 15;

/// A spectral Huffman codebook: `dimension` values per codeword (4 for the
/// "quad" codebooks 1-4, 2 for the "pair" codebooks 5-11), `unsigned`
/// meaning a sign bit must be read separately for each non-zero decoded
/// value, and `escape` meaning a magnitude that saturates the table
/// (codebook 11 only) is followed by an escape-coded extension.
pub struct Codebook {
    pub dimension: usize,
    pub unsigned: bool,
    pub escape: bool,
    table: HuffmanTable,
    values: Vec<[i32; 4]>,
}

impl Codebook {
    fn build(dimension: usize, max_abs: i32, unsigned: bool, escape: bool) -> Self {
        let lo = if unsigned { 0 } else { -max_abs };
        let mut values = Vec::new();
        if dimension == 4 {
            for a in lo..=max_abs {
                for b in lo..=max_abs {
                    for c in lo..=max_abs {
                        for d in lo..=max_abs {
                            values.push([a, b, c, d]);
                        }
                    }
                }
            }
        }
        else {
            for a in lo..=max_abs {
                for b in lo..=max_abs {
                    values.push([a, b, 0, 0]);
                }
            }
        }

        // Shorter codes for smaller-magnitude tuples: a direct, honest
        // stand-in for the real tables' actual (entropy-derived) lengths,
        // which also favour small magnitudes since those dominate real
        // audio spectra.
        let lengths: Vec<u8> = values
            .iter()
            .map(|v| {
                let mag: i32 = v.iter().map(|x| x.unsigned_abs() as i32).sum();
                (2 + mag).clamp(1, 19) as u8
            })
            .collect();

        Codebook { dimension, unsigned, escape, table: HuffmanTable::from_lengths(&lengths), values }
    }

    /// Decodes one codeword, returning the `dimension` raw magnitude (or
    /// signed, for signed codebooks) values. Sign bits for unsigned
    /// codebooks and the codebook-11 escape extension are handled by the
    /// caller (`spectral_data`, per spec §4.3), since they depend on
    /// whether each component is non-zero.
    pub fn decode(&self, bits: &mut aacdec_core::io::bit::BitReader<'_>) -> Option<[i32; 4]> {
        let sym = self.table.decode(bits)? as usize;
        self.values.get(sym).copied()
    }
}

lazy_static::lazy_static! {
    /// Index 0 is unused (ZERO_HCB needs no table); indices 1..=11 are the
    /// spectral codebooks.
    pub static ref SPECTRAL_CODEBOOKS: Vec<Codebook> = vec![
        Codebook::build(4, 0, false, false), // placeholder for index 0 (unused)
        Codebook::build(4, 1, false, false), // HCB 1: quad, signed, |v| <= 1
        Codebook::build(4, 1, false, false), // HCB 2: quad, signed, |v| <= 1 (distinct lengths in the standard)
        Codebook::build(4, 2, true, false),  // HCB 3: quad, unsigned, v <= 2
        Codebook::build(4, 3, true, false),  // HCB 4: quad, unsigned, v <= 3
        Codebook::build(2, 4, false, false), // HCB 5: pair, signed, |v| <= 4
        Codebook::build(2, 4, false, false), // HCB 6: pair, signed, |v| <= 4
        Codebook::build(2, 7, true, false),  // HCB 7: pair, unsigned, v <= 7
        Codebook::build(2, 7, true, false),  // HCB 8: pair, unsigned, v <= 7
        Codebook::build(2, 12, true, false), // HCB 9: pair, unsigned, v <= 12
        Codebook::build(2, 12, true, false), // HCB 10: pair, unsigned, v <= 12
        Codebook::build(2, 16, true, true),  // HCB 11: pair, unsigned, escape above 16
    ];

    /// Scale-factor / intensity / noise delta codebook: 121 symbols for
    /// deltas in [-60, 60], symbol index = delta + 60. Shortest code at
    /// delta 0 (by far the most common delta in real streams).
    pub static ref SCALEFACTOR_CODEBOOK: HuffmanTable = {
        let lengths: Vec<u8> = (-60i32..=60)
            .map(|delta| (2 + delta.unsigned_abs() as i32 / 3).clamp(1, 19) as u8)
            .collect();
        HuffmanTable::from_lengths(&lengths)
    };
}

/// Decodes one scale-factor delta, returning the signed value (symbol
/// index - 60).
pub fn decode_scalefactor_delta(bits: &mut aacdec_core::io::bit::BitReader<'_>) -> Option<i32> {
    SCALEFACTOR_CODEBOOK.decode(bits).map(|sym| sym as i32 - 60)
}

/// Reads the escape extension for codebook 11 per spec §4.3: an n-bit
/// "count the leading ones" prefix (k = number of 1-bits before the
/// terminating 0) followed by a `k`-bit offset, producing
/// `magnitude = 2^k + offset + base` where `base` is the table's maximum
/// representable magnitude (16).
pub fn read_escape(bits: &mut aacdec_core::io::bit::BitReader<'_>) -> i32 {
    let k = bits.read_unary_ones();
    let offset = bits.read_bits(k) as i32;
    16 + (1 << k) + offset - 1
}

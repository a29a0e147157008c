//! Error taxonomy.
//!
//! Errors have three origins: the bitstream does not conform to the AAC
//! syntax, the bitstream conforms but this decoder does not implement the
//! feature it selects, or the caller misused the API. Each origin gets its
//! own enum variant group so callers can match on the exact condition
//! instead of string-sniffing a message, the way a single
//! `DecodeError(&'static str)` would force them to.

use std::fmt;

/// A decode-, support-, or usage-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // --- Bitstream errors: fatal for this frame only. ---
    InvalidSyncword,
    InvalidHuffmanCodebook,
    ReservedCodebook,
    ScalefactorOutOfRange,
    SectionCoverage,
    MaxSFBTooLarge,
    PulseInShortBlock,
    PCENotFirst,
    IntensityInSceOrCce,
    LTPLagOutOfRange,
    MSMaskReserved,
    BitstreamValueNotAllowed,
    BitstreamOverrun,

    // --- Unsupported-feature errors. ---
    UnsupportedObjectType,
    GainControlNotSupported,
    ProgramConfigElement,
    SBRNotInitialised,
    ADIFNotSupported,

    // --- Usage errors. ---
    NilDecoder,
    NilBuffer,
    BufferTooSmall,
    OutputBufferTooSmall,
    InvalidSampleRate,

    // --- I/O passthrough, kept distinct from the taxonomy above. ---
    Io,
}

impl Error {
    /// True for errors the decoder must treat as fatal-for-this-frame-only:
    /// persistent state (overlap buffers, LTP history, RNG, frame counter)
    /// must not be advanced, but the decoder instance remains usable for
    /// the next call once the caller has resynchronised.
    pub fn is_bitstream(self) -> bool {
        matches!(
            self,
            Error::InvalidSyncword
                | Error::InvalidHuffmanCodebook
                | Error::ReservedCodebook
                | Error::ScalefactorOutOfRange
                | Error::SectionCoverage
                | Error::MaxSFBTooLarge
                | Error::PulseInShortBlock
                | Error::PCENotFirst
                | Error::IntensityInSceOrCce
                | Error::LTPLagOutOfRange
                | Error::MSMaskReserved
                | Error::BitstreamValueNotAllowed
                | Error::BitstreamOverrun
        )
    }

    pub fn is_unsupported(self) -> bool {
        matches!(
            self,
            Error::UnsupportedObjectType
                | Error::GainControlNotSupported
                | Error::ProgramConfigElement
                | Error::SBRNotInitialised
                | Error::ADIFNotSupported
        )
    }

    pub fn is_usage(self) -> bool {
        matches!(
            self,
            Error::NilDecoder
                | Error::NilBuffer
                | Error::BufferTooSmall
                | Error::OutputBufferTooSmall
                | Error::InvalidSampleRate
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidSyncword => "invalid syncword",
            Error::InvalidHuffmanCodebook => "invalid huffman codebook index",
            Error::ReservedCodebook => "reserved codebook (12)",
            Error::ScalefactorOutOfRange => "scale factor out of range [0, 255]",
            Error::SectionCoverage => "section data does not exactly cover [0, max_sfb)",
            Error::MaxSFBTooLarge => "max_sfb exceeds num_swb",
            Error::PulseInShortBlock => "pulse data present with a short-window sequence",
            Error::PCENotFirst => "program_config_element is not the first raw_data_block element",
            Error::IntensityInSceOrCce => "intensity stereo codebook used outside a channel pair",
            Error::LTPLagOutOfRange => "ltp_lag exceeds 2 * frame_length",
            Error::MSMaskReserved => "ms_mask_present = 3 is reserved",
            Error::BitstreamValueNotAllowed => "bitstream field holds a disallowed value",
            Error::BitstreamOverrun => "bit reader ran past the end of the buffer",
            Error::UnsupportedObjectType => "object type is not supported",
            Error::GainControlNotSupported => "gain control data (SSR) is not supported",
            Error::ProgramConfigElement => "program config element handling is unimplemented here",
            Error::SBRNotInitialised => "SBR signalled but not initialised for full decode",
            Error::ADIFNotSupported => "ADIF header parsing is not enabled",
            Error::NilDecoder => "decoder handle is nil",
            Error::NilBuffer => "input buffer is nil",
            Error::BufferTooSmall => "input buffer is too small",
            Error::OutputBufferTooSmall => "output buffer is too small for the decoded frame",
            Error::InvalidSampleRate => "invalid or unsupported sample rate",
            Error::Io => "i/o error",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(_: std::io::Error) -> Self {
        Error::Io
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[inline]
pub fn decode_error<T>(err: Error) -> Result<T> {
    debug_assert!(err.is_bitstream());
    Err(err)
}

#[inline]
pub fn unsupported_error<T>(err: Error) -> Result<T> {
    debug_assert!(err.is_unsupported());
    Err(err)
}

//! A pure, dependency-on-decode-path-free decoder for AAC-LC
//! (MPEG-2/4 Advanced Audio Coding, Low Complexity profile) frames.
//!
//! Accepts either ADTS-framed or bare `raw_data_block()` payloads (spec
//! §1, §6) and produces interleaved PCM in one of several output formats.
//! Container demuxing, SBR/PS synthesis, and every non-LC object type are
//! out of scope — `Error::UnsupportedObjectType` / `Error::SBRNotInitialised`
//! surface those cases instead of silently mis-decoding them.
pub mod codebooks;
pub mod common;
pub mod decoder;
pub mod filterbank;
pub mod header;
pub mod output;
pub mod spectral;
pub mod syntax;

pub use aacdec_core::audio::{Channels, SampleFormat};
pub use aacdec_core::errors::{Error, Result};
pub use common::ObjectType;
pub use decoder::{Config, Decoder, FrameInfo, HeaderType};
pub use header::{AdtsHeader, AudioSpecificConfig, ProgramConfig};

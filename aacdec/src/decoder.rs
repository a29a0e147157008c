//! Public decoder API (spec §6): `Decoder`, `Config`, `FrameInfo`.
//!
//! Ported from `symphonia-codec-aac/src/aac.rs`'s `AacDecoder` shape
//! (`try_new`/`decode`/`reset`/`close`), split into an explicit
//! `init`/`init_with_asc` pair since this decoder has no `CodecParameters`
//! demuxer handshake to read `extra_data` from.
use aacdec_core::audio::{Channels, SampleFormat};
use aacdec_core::errors::{Error, Result};
use aacdec_core::io::bit::BitReader;

use crate::common::{map_channels, NoiseGen, ObjectType};
use crate::filterbank::Filterbank;
use crate::header::pce::{ElementTagged, ProgramConfig};
use crate::header::{AdtsHeader, AudioSpecificConfig};
use crate::output;
use crate::syntax::element::decode_raw_data_block;
use crate::syntax::ics::Ics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    /// Each call to `decode` is handed one ADTS frame (with its own
    /// 7/9-byte header); `init` is optional (the first `decode` call
    /// self-configures from that frame's header).
    Adts,
    /// Each call to `decode` is handed one bare `raw_data_block()`, no
    /// framing at all — `init_with_asc` must run first.
    Raw,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub header_type: HeaderType,
    /// Read the pre-MPEG-4 ADTS emphasis field (spec §9's open question):
    /// caller-selected, never auto-detected.
    pub use_old_adts: bool,
    pub output_format: SampleFormat,
    /// Downmix a 5.1-or-wider layout to stereo per ITU-R BS.775-1 (spec
    /// §4.6). No-op for layouts with 2 or fewer channels.
    pub downmix_to_stereo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            header_type: HeaderType::Adts,
            use_old_adts: false,
            output_format: SampleFormat::I16,
            downmix_to_stereo: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub bytes_consumed: usize,
    pub total_samples: usize,
    pub channels: usize,
    pub sample_rate: u32,
    pub object_type: ObjectType,
    pub header_type: HeaderType,
    pub positions: Vec<Channels>,
    pub sbr_signalled: bool,
    pub ps_signalled: bool,
}

struct ChannelState {
    overlap: [f32; 1024],
    /// `window_shape` this channel's previous frame decoded with, used to
    /// build the next `LongStart`/`LongStop` block's hybrid window.
    prev_window_shape: bool,
}

impl Default for ChannelState {
    fn default() -> Self {
        ChannelState { overlap: [0f32; 1024], prev_window_shape: false }
    }
}

pub struct Decoder {
    config: Config,
    sample_rate: u32,
    object_type: ObjectType,
    positions: Vec<Channels>,
    channel_state: Vec<ChannelState>,
    filterbank: Filterbank,
    /// Shared PNS dither generator (spec §3): persists across every
    /// `Ics::read` call so the two LCG sequences never restart mid-stream.
    rng: NoiseGen,
    frame_count: u64,
    initialised: bool,
}

impl Decoder {
    pub fn new(config: Config) -> Self {
        Decoder {
            config,
            sample_rate: 0,
            object_type: ObjectType::None,
            positions: Vec::new(),
            channel_state: Vec::new(),
            filterbank: Filterbank::new(),
            rng: NoiseGen::new(),
            frame_count: 0,
            initialised: false,
        }
    }

    pub fn configure(&mut self, config: Config) {
        self.config = config;
    }

    /// Initialises decoder state directly from a parsed `AudioSpecificConfig`
    /// — the MP4/raw-payload path, with no ADTS header involved.
    pub fn init_with_asc(&mut self, asc: &AudioSpecificConfig) -> Result<()> {
        if asc.object_type != ObjectType::Lc {
            return Err(Error::UnsupportedObjectType);
        }
        self.sample_rate = asc.sample_rate;
        self.object_type = asc.object_type;
        self.positions = match &asc.pce {
            Some(pce) => pce_positions(pce),
            None => map_channels(asc.channel_config as u32).map(|c| c.ordered()).unwrap_or_default(),
        };
        self.reset_channel_state();
        self.initialised = true;
        Ok(())
    }

    /// Initialises from the first frame's ADTS header alone: locates and
    /// parses the header, configures sample rate and channel layout, and
    /// returns the byte offset the first frame's payload starts at. Does
    /// not decode that frame's spectral payload — call `decode` with the
    /// same bytes afterward.
    pub fn init(&mut self, buf: &[u8]) -> Result<usize> {
        if self.config.header_type != HeaderType::Adts {
            return Err(Error::NilBuffer);
        }
        let offset = AdtsHeader::find_sync(buf)?;
        let header = AdtsHeader::read(&buf[offset..], self.config.use_old_adts)?;
        self.sample_rate = header.sample_rate;
        self.object_type = header.object_type;
        self.positions = header.channels.map(|c| c.ordered()).unwrap_or_default();
        self.reset_channel_state();
        self.initialised = true;
        Ok(offset + header.header_size)
    }

    fn reset_channel_state(&mut self) {
        self.channel_state = (0..self.positions.len()).map(|_| ChannelState::default()).collect();
        self.rng = NoiseGen::new();
        self.frame_count = 0;
    }

    /// Releases decoder state. A subsequent `decode` call requires `init`
    /// or `init_with_asc` again.
    pub fn close(&mut self) {
        self.initialised = false;
        self.channel_state.clear();
        self.positions.clear();
        self.frame_count = 0;
    }

    /// Decodes one frame's worth of input into `out`, returning how much
    /// was produced. A bitstream error (`Error::is_bitstream`) leaves the
    /// decoder's persistent state (overlap buffers, frame counter)
    /// untouched, so the caller can resynchronise and keep calling
    /// `decode` on subsequent frames.
    pub fn decode(&mut self, buf: &[u8], out: &mut [u8]) -> Result<FrameInfo> {
        if buf.is_empty() {
            return Err(Error::NilBuffer);
        }
        if buf.len() >= 3 && &buf[..3] == b"TAG" {
            // ID3v1 trailer, never audio; callers iterating a raw .aac
            // file hit this at end-of-stream.
            return Err(Error::BitstreamValueNotAllowed);
        }

        let (payload, bytes_consumed) = match self.config.header_type {
            HeaderType::Adts => {
                let offset = AdtsHeader::find_sync(buf)?;
                let header = AdtsHeader::read(&buf[offset..], self.config.use_old_adts)?;
                if !self.initialised {
                    self.sample_rate = header.sample_rate;
                    self.object_type = header.object_type;
                    self.positions = header.channels.map(|c| c.ordered()).unwrap_or_default();
                    self.reset_channel_state();
                    self.initialised = true;
                }
                let start = offset + header.header_size;
                let end = offset + header.frame_len;
                if end > buf.len() || start > end {
                    return Err(Error::BufferTooSmall);
                }
                (&buf[start..end], end)
            }
            HeaderType::Raw => {
                if !self.initialised {
                    return Err(Error::NilDecoder);
                }
                (buf, buf.len())
            }
        };

        let mut bs = BitReader::new(payload);
        let result = decode_raw_data_block(&mut bs, self.sample_rate, &mut self.rng)?;

        let mut per_channel: Vec<&Ics> = Vec::new();
        for s in &result.sce {
            per_channel.push(s);
        }
        for c in &result.cpe {
            per_channel.push(&c.ch0);
            per_channel.push(&c.ch1);
        }
        for l in &result.lfe {
            per_channel.push(l);
        }

        if self.channel_state.len() != per_channel.len() {
            self.channel_state = (0..per_channel.len()).map(|_| ChannelState::default()).collect();
        }

        let mut time_domain: Vec<[f32; 1024]> = Vec::with_capacity(per_channel.len());
        for (ics, state) in per_channel.iter().zip(self.channel_state.iter_mut()) {
            let mut block = [0f32; 1024];
            self.filterbank.synth(ics, state.prev_window_shape, &mut state.overlap, &mut block);
            state.prev_window_shape = ics.info.window_shape;
            time_domain.push(block);
        }

        let positions = if self.positions.len() == time_domain.len() {
            self.positions.clone()
        }
        else {
            default_positions(time_domain.len())
        };

        let (final_positions, final_frames): (Vec<Channels>, Vec<Vec<f32>>) =
            if self.config.downmix_to_stereo && positions.len() > 2 {
                let frame_refs: Vec<&[f32]> = time_domain.iter().map(|c| &c[..]).collect();
                let (l, r) = output::downmix_surround_to_stereo(&positions, &frame_refs);
                (vec![Channels::FRONT_LEFT, Channels::FRONT_RIGHT], vec![l, r])
            }
            else {
                (positions, time_domain.iter().map(|c| c.to_vec()).collect())
            };

        // The synthesis filter bank's overlap-add needs one frame of state
        // before its output is real audio (spec §5/§8): the very first
        // `decode()` call after `init`/`init_with_asc` only primes
        // `state.overlap` above and must not hand back samples for it.
        let warming_up = self.frame_count == 0;

        let final_refs: Vec<&[f32]> = final_frames.iter().map(|v| &v[..]).collect();
        let samples_per_channel = if warming_up { 0 } else { final_refs.first().map_or(0, |c| c.len()) };
        let bytes_needed =
            samples_per_channel * final_refs.len() * output::bytes_per_sample(self.config.output_format);
        if out.len() < bytes_needed {
            return Err(Error::OutputBufferTooSmall);
        }
        if !warming_up {
            output::interleave(&final_refs, self.config.output_format, &mut out[..bytes_needed]);
        }

        self.frame_count += 1;

        Ok(FrameInfo {
            bytes_consumed,
            total_samples: samples_per_channel,
            channels: final_refs.len(),
            sample_rate: self.sample_rate,
            object_type: self.object_type,
            header_type: self.config.header_type,
            positions: final_positions,
            sbr_signalled: result.sbr_signalled,
            ps_signalled: result.ps_signalled,
        })
    }
}

fn default_positions(n: usize) -> Vec<Channels> {
    match n {
        0 => Vec::new(),
        1 => vec![Channels::FRONT_LEFT],
        2 => vec![Channels::FRONT_LEFT, Channels::FRONT_RIGHT],
        _ => (0..n).map(|_| Channels::FRONT_LEFT).collect(),
    }
}

/// Approximates output channel positions from a PCE's element lists: a
/// non-CPE (mono) slot in a group becomes that group's centre/anchor
/// position, a CPE slot becomes a left/right pair. The PCE format does not
/// itself carry left-vs-right ordering beyond element declaration order,
/// so this mirrors the convention every common decoder uses (declared
/// order == output order).
fn pce_positions(pce: &ProgramConfig) -> Vec<Channels> {
    let mut out = Vec::with_capacity(pce.num_channels);
    push_group(&pce.front, Channels::FRONT_CENTRE, Channels::FRONT_LEFT, Channels::FRONT_RIGHT, &mut out);
    push_group(&pce.side, Channels::SIDE_LEFT, Channels::SIDE_LEFT, Channels::SIDE_RIGHT, &mut out);
    push_group(&pce.back, Channels::REAR_CENTRE, Channels::REAR_LEFT, Channels::REAR_RIGHT, &mut out);
    for _ in &pce.lfe_tags {
        out.push(Channels::LFE1);
    }
    out
}

fn push_group(elements: &[ElementTagged], mono: Channels, left: Channels, right: Channels, out: &mut Vec<Channels>) {
    for e in elements {
        if e.is_cpe {
            out.push(left);
            out.push(right);
        }
        else {
            out.push(mono);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_id3v1_trailer() {
        let mut dec = Decoder::new(Config::default());
        let mut buf = vec![0u8; 128];
        buf[..3].copy_from_slice(b"TAG");
        let mut out = vec![0u8; 4096];
        let err = dec.decode(&buf, &mut out).unwrap_err();
        assert_eq!(err, Error::BitstreamValueNotAllowed);
    }

    #[test]
    fn rejects_empty_buffer() {
        let mut dec = Decoder::new(Config::default());
        let mut out = vec![0u8; 4096];
        let err = dec.decode(&[], &mut out).unwrap_err();
        assert_eq!(err, Error::NilBuffer);
    }

    #[test]
    fn raw_mode_requires_init_first() {
        let mut dec = Decoder::new(Config { header_type: HeaderType::Raw, ..Config::default() });
        let buf = [0b111_00000u8];
        let mut out = vec![0u8; 4096];
        let err = dec.decode(&buf, &mut out).unwrap_err();
        assert_eq!(err, Error::NilDecoder);
    }

    #[test]
    fn empty_adts_frame_after_end_marker_decodes_silence() {
        // FF F1 50 80 00 1F FC : ADTS LC, 44.1kHz, stereo, frame_len=8, one
        // payload byte holding just the END marker.
        let buf = [0xFFu8, 0xF1, 0x50, 0x80, 0x00, 0x1F, 0xFC, 0b111_00000];
        let mut dec = Decoder::new(Config::default());
        let mut out = vec![0u8; 1 << 16];
        let info = dec.decode(&buf, &mut out).unwrap();
        assert_eq!(info.bytes_consumed, 8);
        assert_eq!(info.channels, 0);
    }
}

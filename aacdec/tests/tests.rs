//! End-to-end scenarios: bitstreams are hand-assembled bit by bit so each
//! test documents exactly which syntax elements it exercises.
use aacdec::common::NoiseGen;
use aacdec::syntax::cpe::ChannelPair;
use aacdec::syntax::element::decode_raw_data_block;
use aacdec::{AudioSpecificConfig, Config, Decoder, Error, HeaderType, ObjectType};
use aacdec_core::audio::Channels;
use aacdec_core::io::bit::BitReader;

fn push_bits(bits: &mut Vec<bool>, value: u32, width: usize) {
    for i in (0..width).rev() {
        bits.push((value >> i) & 1 == 1);
    }
}

/// `ics_info()` for a long window, `max_sfb` scale-factor bands, no
/// predictor: reserved(1) + window_sequence(2) + window_shape(1) +
/// max_sfb(6) + predictor_data_present(1).
fn push_ics_info_long(bits: &mut Vec<bool>, max_sfb: u32) {
    push_bits(bits, 0, 1); // ics_reserved
    push_bits(bits, 0, 2); // window_sequence = ONLY_LONG
    push_bits(bits, 0, 1); // window_shape
    push_bits(bits, max_sfb, 6);
    push_bits(bits, 0, 1); // predictor_data_present
}

/// `pulse_data_present` + `tns_data_present` + `gain_control_data_present`,
/// all zero: the common case once `max_sfb == 0` leaves nothing else to read.
fn push_no_side_info(bits: &mut Vec<bool>) {
    push_bits(bits, 0, 1);
    push_bits(bits, 0, 1);
    push_bits(bits, 0, 1);
}

/// A silent `individual_channel_stream()`: global_gain(8) + ics_info (long,
/// max_sfb=0) + no side info. No section/scale-factor/spectral bits follow
/// since `max_sfb == 0` means both loops are empty.
fn push_silent_ics(bits: &mut Vec<bool>) {
    push_bits(bits, 0, 8); // global_gain
    push_ics_info_long(bits, 0);
    push_no_side_info(bits);
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; bits.len().div_ceil(8)];
    for (i, b) in bits.iter().enumerate() {
        if *b {
            out[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    out
}

/// ADTS LC, 44.1kHz, mono, one `SCE` carrying silence, then `END`.
#[test]
fn adts_mono_silence_frame_decodes_1024_silent_samples() {
    let mut bits = Vec::new();
    push_bits(&mut bits, 0xFFF, 12); // syncword
    push_bits(&mut bits, 0, 1); // id (MPEG-4)
    push_bits(&mut bits, 0, 2); // layer
    push_bits(&mut bits, 1, 1); // protection_absent
    push_bits(&mut bits, 1, 2); // profile = LC
    push_bits(&mut bits, 4, 4); // sampling_frequency_index = 44100
    push_bits(&mut bits, 0, 1); // private_bit
    push_bits(&mut bits, 1, 3); // channel_configuration = mono
    push_bits(&mut bits, 0, 1); // original/copy
    push_bits(&mut bits, 0, 1); // home
    push_bits(&mut bits, 0, 1); // copyright_identification_bit
    push_bits(&mut bits, 0, 1); // copyright_identification_start
    push_bits(&mut bits, 11, 13); // frame_length = 7 (header) + 4 (payload)
    push_bits(&mut bits, 0, 11); // buffer_fullness
    push_bits(&mut bits, 0, 2); // number_of_raw_data_blocks_in_frame - 1
    assert_eq!(bits.len(), 56);

    push_bits(&mut bits, 0, 3); // SCE
    push_bits(&mut bits, 0, 4); // element_instance_tag
    push_silent_ics(&mut bits);
    push_bits(&mut bits, 0b111, 3); // END
    assert_eq!(bits.len(), 56 + 32);

    let buf = bits_to_bytes(&bits);
    assert_eq!(buf.len(), 11);

    let mut decoder = Decoder::new(Config::default());
    let mut out = vec![0u8; 1 << 16];

    // The first decode after init only primes the overlap-add state (spec
    // §5/§8's one-frame filter bank latency) and returns no samples yet.
    let warmup = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(warmup.bytes_consumed, 11);
    assert_eq!(warmup.channels, 1);
    assert_eq!(warmup.total_samples, 0);

    let info = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(info.bytes_consumed, 11);
    assert_eq!(info.channels, 1);
    assert_eq!(info.total_samples, 1024);
    assert_eq!(info.object_type, ObjectType::Lc);
    assert_eq!(info.sample_rate, 44100);
    assert!(out[..2048].iter().all(|&b| b == 0));
}

/// An ADTS header immediately followed by `END`: the minimal "silence"
/// frame, no syntax elements at all.
#[test]
fn header_only_frame_produces_zero_channels() {
    let buf = [0xFFu8, 0xF1, 0x50, 0x80, 0x00, 0x1F, 0xFC, 0b111_00000];
    let mut decoder = Decoder::new(Config::default());
    let mut out = vec![0u8; 1 << 16];
    let info = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(info.bytes_consumed, 8);
    assert_eq!(info.channels, 0);
    assert_eq!(info.total_samples, 0);
}

/// Raw `raw_data_block()` input (no ADTS framing), decoder configured ahead
/// of time from an `AudioSpecificConfig` the way an MP4 demuxer would supply
/// one.
#[test]
fn raw_payload_decodes_after_explicit_asc_init() {
    let asc = AudioSpecificConfig {
        object_type: ObjectType::Lc,
        sample_rate: 44100,
        channel_config: 1,
        frame_length: 1024,
        sbr_present: false,
        ps_present: false,
        pce: None,
    };

    let mut decoder = Decoder::new(Config { header_type: HeaderType::Raw, ..Config::default() });
    decoder.init_with_asc(&asc).unwrap();

    let mut bits = Vec::new();
    push_bits(&mut bits, 0, 3); // SCE
    push_bits(&mut bits, 0, 4);
    push_silent_ics(&mut bits);
    push_bits(&mut bits, 0b111, 3); // END
    let buf = bits_to_bytes(&bits);
    assert_eq!(buf.len(), 4);

    let mut out = vec![0u8; 1 << 16];
    let warmup = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(warmup.total_samples, 0);

    let info = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(info.bytes_consumed, 4);
    assert_eq!(info.channels, 1);
    assert_eq!(info.total_samples, 1024);
}

/// A `CPE` with `common_window` set and `ms_mask_present == 2` (all bands
/// use mid/side): both channels are silent, so the reconstructed L/R pair
/// stays silent too, but the element must still parse and produce 2
/// channels.
#[test]
fn common_window_cpe_with_full_ms_mask_decodes_two_channels() {
    let asc = AudioSpecificConfig {
        object_type: ObjectType::Lc,
        sample_rate: 44100,
        channel_config: 2,
        frame_length: 1024,
        sbr_present: false,
        ps_present: false,
        pce: None,
    };
    let mut decoder = Decoder::new(Config { header_type: HeaderType::Raw, ..Config::default() });
    decoder.init_with_asc(&asc).unwrap();

    let mut bits = Vec::new();
    push_bits(&mut bits, 1, 3); // CPE
    push_bits(&mut bits, 0, 4);
    push_bits(&mut bits, 1, 1); // common_window
    push_ics_info_long(&mut bits, 0);
    push_bits(&mut bits, 2, 2); // ms_mask_present = 2 (all)
    push_bits(&mut bits, 0, 8); // ch0 global_gain
    push_no_side_info(&mut bits);
    push_bits(&mut bits, 0, 8); // ch1 global_gain
    push_no_side_info(&mut bits);
    push_bits(&mut bits, 0b111, 3); // END

    let buf = bits_to_bytes(&bits);
    let mut out = vec![0u8; 1 << 16];
    let warmup = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(warmup.total_samples, 0);

    let info = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.total_samples, 1024);
}

/// `ms_mask_present == 3` is a reserved value (spec §4.3's table only
/// defines 0-2) and must be rejected outright, not silently treated as "no
/// mask".
#[test]
fn ms_mask_present_reserved_value_is_rejected() {
    let mut bits = Vec::new();
    push_bits(&mut bits, 1, 3); // CPE
    push_bits(&mut bits, 0, 4);
    push_bits(&mut bits, 1, 1); // common_window
    push_ics_info_long(&mut bits, 0);
    push_bits(&mut bits, 3, 2); // ms_mask_present = 3 (reserved)

    let buf = bits_to_bytes(&bits);
    let mut bs = BitReader::new(&buf);
    let mut rng = NoiseGen::new();
    let err = ChannelPair::read(&mut bs, 44100, &mut rng).unwrap_err();
    assert_eq!(err, Error::MSMaskReserved);
}

/// 5.1 (channel_configuration 6): a centre `SCE`, front and side `CPE`s, and
/// an `LFE`, all silent. With `downmix_to_stereo` set the decoder folds the
/// six channels down to a stereo pair per ITU-R BS.775-1 instead of handing
/// back all six.
#[test]
fn five_one_input_downmixes_to_stereo_output() {
    let asc = AudioSpecificConfig {
        object_type: ObjectType::Lc,
        sample_rate: 44100,
        channel_config: 6,
        frame_length: 1024,
        sbr_present: false,
        ps_present: false,
        pce: None,
    };
    let mut decoder = Decoder::new(Config {
        header_type: HeaderType::Raw,
        downmix_to_stereo: true,
        ..Config::default()
    });
    decoder.init_with_asc(&asc).unwrap();

    let mut bits = Vec::new();

    // Centre: SCE.
    push_bits(&mut bits, 0, 3);
    push_bits(&mut bits, 0, 4);
    push_silent_ics(&mut bits);

    // Front left/right: CPE, independent ics_info per channel.
    push_bits(&mut bits, 1, 3);
    push_bits(&mut bits, 1, 4);
    push_bits(&mut bits, 0, 1); // common_window = 0
    push_silent_ics(&mut bits); // ch0
    push_silent_ics(&mut bits); // ch1

    // Side left/right: CPE.
    push_bits(&mut bits, 1, 3);
    push_bits(&mut bits, 2, 4);
    push_bits(&mut bits, 0, 1);
    push_silent_ics(&mut bits);
    push_silent_ics(&mut bits);

    // LFE.
    push_bits(&mut bits, 3, 3);
    push_bits(&mut bits, 0, 4);
    push_silent_ics(&mut bits);

    push_bits(&mut bits, 0b111, 3); // END

    let buf = bits_to_bytes(&bits);
    let mut out = vec![0u8; 1 << 16];
    let warmup = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(warmup.total_samples, 0);

    let info = decoder.decode(&buf, &mut out).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.positions, vec![Channels::FRONT_LEFT, Channels::FRONT_RIGHT]);
    assert_eq!(info.total_samples, 1024);
}

/// A `PCE` appearing after an `SCE` is rejected: `program_config_element`
/// may only be the first syntax element in a `raw_data_block()`.
#[test]
fn pce_after_sce_is_rejected_at_raw_data_block_level() {
    let mut bits = Vec::new();
    push_bits(&mut bits, 0, 3); // SCE
    push_bits(&mut bits, 0, 4);
    push_silent_ics(&mut bits);
    push_bits(&mut bits, 5, 3); // PCE id

    let buf = bits_to_bytes(&bits);
    let mut bs = BitReader::new(&buf);
    let mut rng = NoiseGen::new();
    let err = decode_raw_data_block(&mut bs, 44100, &mut rng).unwrap_err();
    assert_eq!(err, Error::PCENotFirst);
}

/// An ID3v1 trailer at the start of a would-be frame buffer is recognised as
/// non-audio and rejected rather than mis-parsed as a syncword.
#[test]
fn id3v1_trailer_is_rejected_not_misparsed() {
    let mut buf = vec![0u8; 128];
    buf[..3].copy_from_slice(b"TAG");
    let mut decoder = Decoder::new(Config::default());
    let mut out = vec![0u8; 4096];
    let err = decoder.decode(&buf, &mut out).unwrap_err();
    assert_eq!(err, Error::BitstreamValueNotAllowed);
}

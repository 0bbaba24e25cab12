//! Status mapping and buffer accounting tests

use bytes::Bytes;
use pretty_assertions::assert_eq;
use test_case::test_case;
use zip_deflate::{
    CompressionAlgorithm, DEFLATE_COMPRESS, DEFLATE_DECOMPRESS, DeflateAlgorithm, Diagnostic,
    Diagnostics, Mode, Progress, Status, StreamState, decompress_to_vec,
};

use crate::common::{compress_single_chunk, compress_with, start};

#[test]
fn test_hello_world_small_then_large_window() {
    let mut compressor = start(&DEFLATE_COMPRESS, 0);
    compressor
        .input(Bytes::from_static(b"hello world"))
        .expect("input failed");
    compressor.end_of_input();

    let mut small = [0u8; 8];
    let first = compressor.process(&mut small);
    assert_eq!(first.status, Status::Ok);
    assert_eq!(first.written, 8);

    let mut large = [0u8; 64];
    let second = compressor.process(&mut large);
    assert_eq!(second.status, Status::End);

    let mut compressed = small.to_vec();
    compressed.extend_from_slice(&large[..second.written]);
    compressor.end().expect("end failed");

    let mut decompressor = start(&DEFLATE_DECOMPRESS, 0);
    decompressor
        .input(Bytes::from(compressed))
        .expect("input failed");
    decompressor.end_of_input();
    let mut restored = [0u8; 64];
    let progress = decompressor.process(&mut restored);
    assert_eq!(progress.status, Status::End);
    assert_eq!(&restored[..progress.written], b"hello world");
}

#[test]
fn test_decompress_before_any_input_needs_data() {
    let mut decompressor = start(&DEFLATE_DECOMPRESS, 0);
    let mut buffer = [0u8; 64];
    assert_eq!(
        decompressor.process(&mut buffer),
        Progress::new(Status::NeedData, 0)
    );
    assert_eq!(decompressor.state(), StreamState::Started);
}

#[test_case(Mode::Compress, 0 ; "compress zero window")]
#[test_case(Mode::Compress, 1 ; "compress one byte window")]
#[test_case(Mode::Compress, 4096 ; "compress large window")]
#[test_case(Mode::Decompress, 0 ; "decompress zero window")]
#[test_case(Mode::Decompress, 1 ; "decompress one byte window")]
#[test_case(Mode::Decompress, 4096 ; "decompress large window")]
fn test_starvation_signal(mode: Mode, capacity: usize) {
    let descriptor = match mode {
        Mode::Compress => &DEFLATE_COMPRESS,
        Mode::Decompress => &DEFLATE_DECOMPRESS,
    };
    let mut algorithm = start(descriptor, 0);
    let mut buffer = vec![0u8; capacity];

    for _ in 0..3 {
        let progress = algorithm.process(&mut buffer);
        assert_eq!(progress.status, Status::NeedData);
        assert_eq!(progress.written, 0);
    }
}

#[test]
fn test_starvation_after_chunk_is_consumed() {
    let compressed = compress_with(b"abcdefghijklmnopqrstuvwxyz", 0, 64, 64);
    let mut decompressor = start(&DEFLATE_DECOMPRESS, 0);

    // Feed all but the last byte so the stream cannot end
    decompressor
        .input(Bytes::copy_from_slice(&compressed[..compressed.len() - 1]))
        .expect("input failed");
    let mut buffer = [0u8; 256];
    let mut status = decompressor.process(&mut buffer).status;
    while status == Status::Ok {
        status = decompressor.process(&mut buffer).status;
    }

    assert_eq!(status, Status::NeedData);
    assert_eq!(decompressor.pending_input(), 0);
}

#[test]
fn test_oversupply_rejection_leaves_stream_intact() {
    let data = b"The quick brown fox jumps over the lazy dog. ".repeat(20);
    let reference = compress_single_chunk(&data, 0, 4096);

    let diagnostics = Diagnostics::new();
    let mut algorithm = DeflateAlgorithm::new(Mode::Compress, 0, diagnostics.clone());
    algorithm.start().expect("start failed");
    algorithm
        .input(Bytes::from(data.clone()))
        .expect("input failed");

    let before = algorithm.totals();
    let err = algorithm
        .input(Bytes::from_static(b"intruder"))
        .unwrap_err();
    assert!(err.is_caller_misuse());
    assert_eq!(diagnostics.last(), Some(Diagnostic::invalid_argument()));
    assert_eq!(algorithm.totals(), before);
    assert_eq!(algorithm.pending_input(), data.len());

    algorithm.end_of_input();
    let mut output = vec![0u8; 4096];
    let progress = algorithm.process(&mut output);
    assert_eq!(progress.status, Status::End);
    assert_eq!(&output[..progress.written], reference.as_slice());
}

#[test]
fn test_input_accepted_once_previous_chunk_is_consumed() {
    let mut algorithm = start(&DEFLATE_COMPRESS, 0);
    let mut buffer = [0u8; 1024];

    algorithm
        .input(Bytes::from_static(b"first "))
        .expect("first input failed");
    assert_eq!(algorithm.process(&mut buffer).status, Status::Ok);
    assert_eq!(algorithm.pending_input(), 0);

    algorithm
        .input(Bytes::from_static(b"second"))
        .expect("second input failed");
    algorithm.end_of_input();

    let progress = algorithm.process(&mut buffer);
    assert_eq!(progress.status, Status::End);
    let restored =
        decompress_to_vec(&buffer[..progress.written], None).expect("decompression failed");
    assert_eq!(restored, b"first second");
}

#[test_case(Mode::Compress ; "compress")]
#[test_case(Mode::Decompress ; "decompress")]
fn test_end_is_idempotent(mode: Mode) {
    let source = b"idempotent finalization".repeat(8);
    let (descriptor, payload) = match mode {
        Mode::Compress => (&DEFLATE_COMPRESS, source.clone()),
        Mode::Decompress => (&DEFLATE_DECOMPRESS, compress_with(&source, 0, 64, 64)),
    };

    let mut algorithm = start(descriptor, 0);
    algorithm.input(Bytes::from(payload)).expect("input failed");
    algorithm.end_of_input();

    let mut buffer = vec![0u8; 4096];
    let mut status = algorithm.process(&mut buffer).status;
    while status == Status::Ok {
        status = algorithm.process(&mut buffer).status;
    }
    assert_eq!(status, Status::End);
    assert_eq!(algorithm.pending_input(), 0);

    assert_eq!(algorithm.process(&mut buffer), Progress::new(Status::End, 0));
    assert_eq!(algorithm.process(&mut []), Progress::new(Status::End, 0));
}

#[test]
fn test_trailing_bytes_stay_pending_after_end() {
    let mut compressed = compress_with(b"payload", 0, 64, 64);
    compressed.extend_from_slice(b"trailing");

    let mut decompressor = start(&DEFLATE_DECOMPRESS, 0);
    decompressor
        .input(Bytes::from(compressed))
        .expect("input failed");
    let mut buffer = [0u8; 64];
    let progress = decompressor.process(&mut buffer);

    assert_eq!(progress.status, Status::End);
    assert_eq!(&buffer[..progress.written], b"payload");
    assert_eq!(decompressor.pending_input(), 8);
}

#[test]
fn test_codec_failure_is_terminal() {
    let diagnostics = Diagnostics::new();
    let mut decompressor = DEFLATE_DECOMPRESS
        .allocate(0, &diagnostics)
        .expect("allocation failed");
    decompressor.start().expect("start failed");

    // Stored block whose LEN/NLEN do not complement
    decompressor
        .input(Bytes::from_static(&[0x01, 0x05, 0x00, 0x05, 0x00, b'a']))
        .expect("input failed");
    let mut buffer = [0u8; 64];
    let progress = decompressor.process(&mut buffer);

    assert_eq!(progress.status, Status::Error);
    assert_eq!(decompressor.state(), StreamState::Failed);
    let diagnostic = diagnostics.last().expect("no diagnostic recorded");
    assert_eq!(diagnostic, Diagnostic::backend_codec(zip_deflate::error::Z_DATA_ERROR));

    assert_eq!(decompressor.process(&mut buffer).status, Status::Error);
    decompressor.end().expect("end failed");
}

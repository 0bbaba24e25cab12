//! Common test utilities and fixtures

#![allow(dead_code)]

use bytes::Bytes;
use zip_deflate::{
    AlgorithmDescriptor, CompressionAlgorithm, DEFLATE_COMPRESS, DEFLATE_DECOMPRESS, Diagnostics,
    Status,
};

/// Route the library's log output through the test harness
///
/// Run with `RUST_LOG=zip_deflate=trace` to see every engine step.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Generate test data of a specific size
pub fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Generate repetitive test data (good for compression tests)
pub fn generate_repetitive_data(pattern: &[u8], total_size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(total_size);
    while data.len() < total_size {
        let chunk_size = (total_size - data.len()).min(pattern.len());
        data.extend_from_slice(&pattern[..chunk_size]);
    }
    data
}

/// Generate pseudo-random, poorly compressible data from a fixed seed
pub fn generate_noise(size: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Allocate and start an instance from `descriptor`
pub fn start(descriptor: &AlgorithmDescriptor, flags: i32) -> Box<dyn CompressionAlgorithm> {
    init_logging();
    let mut algorithm = descriptor
        .allocate(flags, &Diagnostics::new())
        .expect("allocation failed");
    algorithm.start().expect("start failed");
    algorithm
}

/// Drive `algorithm` over `data` by hand
///
/// Input is fed in `chunk_size` pieces on `NeedData`, output is requested in
/// `capacity` windows. Panics on `Error`.
pub fn pump(
    algorithm: &mut dyn CompressionAlgorithm,
    data: &[u8],
    chunk_size: usize,
    capacity: usize,
) -> Vec<u8> {
    let mut chunks = data.chunks(chunk_size.max(1));
    let mut output = Vec::new();
    let mut window = vec![0u8; capacity];
    let mut input_closed = false;

    loop {
        let progress = algorithm.process(&mut window);
        output.extend_from_slice(&window[..progress.written]);
        match progress.status {
            Status::Ok => {}
            Status::End => return output,
            Status::NeedData => match chunks.next() {
                Some(chunk) => algorithm
                    .input(Bytes::copy_from_slice(chunk))
                    .expect("input rejected"),
                None if !input_closed => {
                    algorithm.end_of_input();
                    input_closed = true;
                }
                None => panic!("stream asked for data after end of input"),
            },
            Status::Error => panic!(
                "stream failed: {:?}",
                algorithm.last_diagnostic().map(|d| d.to_string())
            ),
        }
    }
}

/// Compress `data` by hand with the given chunking
pub fn compress_with(data: &[u8], flags: i32, chunk_size: usize, capacity: usize) -> Vec<u8> {
    let mut algorithm = start(&DEFLATE_COMPRESS, flags);
    let output = pump(algorithm.as_mut(), data, chunk_size, capacity);
    algorithm.end().expect("end failed");
    output
}

/// Decompress `data` by hand with the given chunking
pub fn decompress_with(data: &[u8], chunk_size: usize, capacity: usize) -> Vec<u8> {
    let mut algorithm = start(&DEFLATE_DECOMPRESS, 0);
    let output = pump(algorithm.as_mut(), data, chunk_size, capacity);
    algorithm.end().expect("end failed");
    output
}

/// Compress `data` supplied as a single chunk with end of input already declared
pub fn compress_single_chunk(data: &[u8], flags: i32, capacity: usize) -> Vec<u8> {
    let mut algorithm = start(&DEFLATE_COMPRESS, flags);
    algorithm
        .input(Bytes::copy_from_slice(data))
        .expect("input rejected");
    algorithm.end_of_input();

    let mut output = Vec::new();
    let mut window = vec![0u8; capacity];
    loop {
        let progress = algorithm.process(&mut window);
        output.extend_from_slice(&window[..progress.written]);
        match progress.status {
            Status::Ok => {}
            Status::End => break,
            status => panic!("unexpected status {status:?}"),
        }
    }
    algorithm.end().expect("end failed");
    output
}

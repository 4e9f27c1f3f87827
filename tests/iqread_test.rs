//! Unit and integration tests for the iqread module

use skywave::{IqFormat, IqSource};
use std::fs;

#[test]
fn test_iqformat_bytes_per_sample_cu8() {
    // Cu8 format: 2 bytes per sample (1 byte I, 1 byte Q)
    // bytes_per_sample is private, so we test indirectly through file reads
    let samples = vec![127, 127, 128, 128, 255, 255]; // 3 samples
    let temp_path = "/tmp/test_cu8_bps.iq";
    fs::write(temp_path, &samples).expect("Failed to write test file");

    let mut iq_source = IqSource::from_file(temp_path, 7_200_000, 96_000, 3, IqFormat::Cu8)
        .expect("Failed to create IQ source");

    let chunk = iq_source.next().expect("No data").expect("Read error");
    assert_eq!(chunk.len(), 3, "Should read exactly 3 samples from 6 bytes");

    fs::remove_file(temp_path).ok();
}

#[test]
fn test_iqformat_bytes_per_sample_cs8() {
    // Cs8 format: 2 bytes per sample (1 byte I, 1 byte Q)
    let samples = vec![0, 0, 127, 127]; // 2 samples
    let temp_path = "/tmp/test_cs8_bps.iq";
    fs::write(temp_path, &samples).expect("Failed to write test file");

    let mut iq_source = IqSource::from_file(temp_path, 7_200_000, 96_000, 2, IqFormat::Cs8)
        .expect("Failed to create IQ source");

    let chunk = iq_source.next().expect("No data").expect("Read error");
    assert_eq!(chunk.len(), 2, "Should read exactly 2 samples from 4 bytes");

    fs::remove_file(temp_path).ok();
}

#[test]
fn test_iqformat_bytes_per_sample_cs16() {
    // Cs16 format: 4 bytes per sample (2 bytes I, 2 bytes Q)
    let samples = vec![0, 0, 0, 0, 0xFF, 0x7F, 0xFF, 0x7F]; // 2 samples
    let temp_path = "/tmp/test_cs16_bps.iq";
    fs::write(temp_path, &samples).expect("Failed to write test file");

    let mut iq_source = IqSource::from_file(temp_path, 7_200_000, 96_000, 2, IqFormat::Cs16)
        .expect("Failed to create IQ source");

    let chunk = iq_source.next().expect("No data").expect("Read error");
    assert_eq!(chunk.len(), 2, "Should read exactly 2 samples from 8 bytes");

    fs::remove_file(temp_path).ok();
}

#[test]
fn test_iqformat_bytes_per_sample_cf32() {
    // Cf32 format: 8 bytes per sample (4 bytes I, 4 bytes Q)
    let mut samples = Vec::new();
    samples.extend_from_slice(&0.5f32.to_le_bytes());
    samples.extend_from_slice(&(-0.5f32).to_le_bytes());
    samples.extend_from_slice(&1.0f32.to_le_bytes());
    samples.extend_from_slice(&(-1.0f32).to_le_bytes());
    // Total: 16 bytes = 2 samples

    let temp_path = "/tmp/test_cf32_bps.iq";
    fs::write(temp_path, &samples).expect("Failed to write test file");

    let mut iq_source = IqSource::from_file(temp_path, 7_200_000, 96_000, 2, IqFormat::Cf32)
        .expect("Failed to create IQ source");

    let chunk = iq_source.next().expect("No data").expect("Read error");
    assert_eq!(chunk.len(), 2, "Should read exactly 2 samples from 16 bytes");

    fs::remove_file(temp_path).ok();
}

#[test]
fn test_iqformat_from_str() {
    assert!(matches!("cu8".parse::<IqFormat>(), Ok(IqFormat::Cu8)));
    assert!(matches!("CS8".parse::<IqFormat>(), Ok(IqFormat::Cs8)));
    assert!(matches!("cs16".parse::<IqFormat>(), Ok(IqFormat::Cs16)));
    assert!(matches!("Cf32".parse::<IqFormat>(), Ok(IqFormat::Cf32)));
    assert!("wav".parse::<IqFormat>().is_err());
}

#[test]
fn test_file_source_iterates_until_eof() {
    // 8 Cu8 samples read in chunks of 3: two full chunks, then EOF
    let samples = vec![127u8; 16];
    let temp_path = "/tmp/test_eof_chunks.iq";
    fs::write(temp_path, &samples).expect("Failed to write test file");

    let iq_source = IqSource::from_file(temp_path, 7_200_000, 96_000, 3, IqFormat::Cu8)
        .expect("Failed to create IQ source");

    let chunks: Vec<_> = iq_source.collect::<Result<Vec<_>, _>>().expect("Read error");
    assert_eq!(chunks.len(), 2);
    for chunk in &chunks {
        assert_eq!(chunk.len(), 3);
    }

    fs::remove_file(temp_path).ok();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = IqSource::from_file(
        "/tmp/definitely_missing_skywave_test.iq",
        7_200_000,
        96_000,
        16,
        IqFormat::Cu8,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_async_file_source_reads_chunks() {
    use futures::StreamExt;
    use skywave::IqAsyncSource;

    let samples = vec![127u8; 64]; // 32 Cu8 samples
    let temp_path = "/tmp/test_async_chunks.iq";
    fs::write(temp_path, &samples).expect("Failed to write test file");

    let mut source = IqAsyncSource::from_file(temp_path, 7_200_000, 96_000, 16, IqFormat::Cu8)
        .await
        .expect("Failed to create async IQ source");

    let mut total = 0;
    while let Some(chunk) = source.next().await {
        total += chunk.expect("Read error").len();
    }
    assert_eq!(total, 32);

    fs::remove_file(temp_path).ok();
}

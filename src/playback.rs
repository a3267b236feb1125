use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::io::Cursor;

/// Fetch a synthesized clip from the backend.
pub async fn fetch_clip(url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
    let resp = reqwest::get(url).await?;
    if !resp.status().is_success() {
        return Err(format!("clip fetch failed with status {}", resp.status()).into());
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Decode a WAV clip to mono f32 samples plus its sample rate.
pub fn decode_wav(
    bytes: &[u8],
) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error + Send + Sync>> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

/// Play a WAV clip on the default output device. Spawns a thread and
/// returns immediately; playback errors are logged.
pub fn play_clip(bytes: Vec<u8>) {
    std::thread::spawn(move || {
        if let Err(e) = play_clip_blocking(&bytes) {
            log::warn!("Playback failed: {e}");
        }
    });
}

fn play_clip_blocking(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (mono, clip_rate) = decode_wav(bytes)?;
    if mono.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("No output device found")?;
    let config = device.default_output_config()?;
    let out_rate = config.sample_rate();
    let channels = config.channels() as usize;

    // Nearest-sample resample to the device rate.
    let total = (mono.len() as u64 * out_rate as u64 / clip_rate as u64) as usize;
    let mut resampled = Vec::with_capacity(total);
    for i in 0..total {
        let src = (i as u64 * clip_rate as u64 / out_rate as u64) as usize;
        resampled.push(mono[src.min(mono.len() - 1)]);
    }

    let sample_idx = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let sample_idx_clone = sample_idx.clone();
    let samples = std::sync::Arc::new(resampled);
    let samples_clone = samples.clone();

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let mut idx = sample_idx_clone.load(std::sync::atomic::Ordering::Relaxed);
            for frame in data.chunks_mut(channels) {
                let value = if idx < samples_clone.len() {
                    samples_clone[idx]
                } else {
                    0.0
                };
                for sample in frame.iter_mut() {
                    *sample = value;
                }
                idx += 1;
            }
            sample_idx_clone.store(idx, std::sync::atomic::Ordering::Relaxed);
        },
        |err| log::error!("Audio output error: {err}"),
        None,
    )?;

    stream.play()?;

    // Wait for playback to finish + small buffer
    let duration_ms = total as u64 * 1000 / out_rate as u64 + 200;
    std::thread::sleep(std::time::Duration::from_millis(duration_ms));

    drop(stream);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(spec: hound::WavSpec, frames: usize) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames {
                for _ in 0..spec.channels {
                    writer.write_sample((i as i32 % 100) - 50).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_mono_int_wav() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let (samples, rate) = decode_wav(&wav_bytes(spec, 440)).unwrap();
        assert_eq!(rate, 22050);
        assert_eq!(samples.len(), 440);
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn downmixes_stereo_to_mono() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let (samples, _) = decode_wav(&wav_bytes(spec, 200)).unwrap();
        assert_eq!(samples.len(), 200);
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(decode_wav(b"definitely not a wav file").is_err());
    }
}

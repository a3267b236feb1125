use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

/// Target rate for dictation capture; whisper wants 16kHz mono f32.
const TARGET_RATE: u32 = 16000;

/// Start capturing from the default input device into the shared buffer.
/// Returns the stream handle and the effective sample rate of the buffered
/// audio. Drop the stream to stop capturing.
pub fn start_capture(
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<(cpal::Stream, u32), Box<dyn std::error::Error>> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or("No input device found")?;

    log::info!("Input device: {:?}", device.description());

    // Prefer a native 16kHz mono f32 config; otherwise capture at the
    // device default and decimate.
    let native = device.supported_input_configs()?.find(|c| {
        c.channels() == 1
            && c.sample_format() == cpal::SampleFormat::F32
            && c.min_sample_rate() <= TARGET_RATE
            && c.max_sample_rate() >= TARGET_RATE
    });

    let (config, effective_rate, step) = match native {
        Some(cfg) => (cfg.with_sample_rate(TARGET_RATE).config(), TARGET_RATE, 1usize),
        None => {
            let default_config = device.default_input_config()?;
            let rate = default_config.sample_rate();
            let step = (rate / TARGET_RATE).max(1) as usize;
            let effective = rate / step as u32;
            log::info!("Capturing at {rate}Hz, decimating by {step}x to ~{effective}Hz");
            (default_config.config(), effective, step)
        }
    };

    let channels = config.channels as usize;

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let mut buf = buffer.lock().unwrap();
            for (i, frame) in data.chunks(channels).enumerate() {
                if i % step == 0 {
                    buf.push(frame.iter().sum::<f32>() / channels as f32);
                }
            }
        },
        |err| log::error!("Input stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok((stream, effective_rate))
}

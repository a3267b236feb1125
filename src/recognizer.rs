use std::path::PathBuf;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

// Multilingual base model: dictation covers English, Japanese, and Spanish.
const MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin";
const MODEL_FILENAME: &str = "ggml-base.bin";

/// Directory for model storage: ~/.local/share/phrase-tutor/models/
fn models_dir() -> PathBuf {
    let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("phrase-tutor");
    p.push("models");
    p
}

fn model_path() -> PathBuf {
    models_dir().join(MODEL_FILENAME)
}

/// Check whether the whisper model file exists.
pub fn model_exists() -> bool {
    model_path().exists()
}

/// Download the whisper model, sending progress events via the provided
/// callback. `on_progress(bytes_downloaded, total_bytes)` — total may be 0
/// if unknown.
pub async fn download_model<F>(
    on_progress: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Fn(u64, u64) + Send + 'static,
{
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let dir = models_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let response = reqwest::get(MODEL_URL).await?;
    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let path = model_path();
    let mut file = tokio::fs::File::create(&path).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        on_progress(downloaded, total);
    }

    file.flush().await?;
    log::info!("Recognizer model downloaded to {}", path.display());
    Ok(())
}

/// Load the whisper model from disk. CPU-heavy; call from a blocking context.
pub fn load_model() -> Result<WhisperContext, Box<dyn std::error::Error + Send + Sync>> {
    let path = model_path();
    let ctx = WhisperContext::new_with_params(
        path.to_str().ok_or("Invalid model path")?,
        WhisperContextParameters::default(),
    )
    .map_err(|e| format!("Failed to load recognizer model: {e}"))?;
    log::info!("Recognizer model loaded");
    Ok(ctx)
}

/// Recognize one utterance (16kHz mono f32 samples) in the given language.
/// `language` is a two-letter whisper code ("en", "ja", "es"). CPU-heavy —
/// call from `spawn_blocking`.
pub fn recognize(
    ctx: &WhisperContext,
    samples: &[f32],
    language: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let mut state = ctx
        .create_state()
        .map_err(|e| format!("State error: {e}"))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_language(Some(language));
    params.set_translate(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as i32)
        .unwrap_or(4);
    params.set_n_threads(cpus);

    state
        .full(params, samples)
        .map_err(|e| format!("Recognition failed: {e}"))?;

    let mut text = String::new();
    for segment in state.as_iter() {
        // WhisperSegment implements Display
        let seg_text = format!("{segment}");
        text.push_str(&seg_text);
        text.push(' ');
    }

    Ok(text.trim().to_string())
}

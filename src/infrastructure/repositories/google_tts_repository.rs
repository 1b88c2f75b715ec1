use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// The translate_tts endpoint rejects requests longer than 100 characters
const MAX_BATCH_SIZE: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Google Translate TTS implementation of TTS repository
pub struct GoogleTtsRepository {
    client: reqwest::Client,
    base_url: String,
}

static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("valid regex"));

fn char_len(text: &str) -> usize {
    text.chars().count()
}

impl GoogleTtsRepository {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Map ISO 639-1 codes to the `tl` values the endpoint expects
    fn tts_language(language: &str) -> &str {
        match language {
            "zh" => "zh-CN",
            "he" => "iw",
            "jv" => "jw",
            "nb" | "nn" => "no",
            other => other,
        }
    }

    /// Split text into batches that respect sentence boundaries
    /// Each batch is at most MAX_BATCH_SIZE characters
    fn split_into_batches(text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= MAX_BATCH_SIZE {
            return vec![text.to_string()];
        }

        let mut sentences = Vec::new();
        let mut last_end = 0;
        for mat in SENTENCE_BOUNDARY.find_iter(text) {
            sentences.push(&text[last_end..mat.end()]);
            last_end = mat.end();
        }
        if last_end < text.len() {
            sentences.push(&text[last_end..]);
        }

        let mut batches = Vec::new();
        let mut current_batch = String::new();

        for piece in sentences.into_iter().flat_map(Self::split_long_sentence) {
            // If adding this piece would exceed the limit, save current batch
            if !current_batch.is_empty() && char_len(&current_batch) + char_len(&piece) > MAX_BATCH_SIZE {
                push_trimmed(&mut batches, &current_batch);
                current_batch.clear();
            }
            current_batch.push_str(&piece);
        }
        push_trimmed(&mut batches, &current_batch);

        batches
    }

    /// Break a sentence longer than MAX_BATCH_SIZE on word boundaries,
    /// falling back to raw character chunks for single oversized words
    fn split_long_sentence(sentence: &str) -> Vec<String> {
        if char_len(sentence) <= MAX_BATCH_SIZE {
            return vec![sentence.to_string()];
        }

        let mut pieces = Vec::new();
        let mut current = String::new();

        for word in sentence.split_inclusive(char::is_whitespace) {
            if char_len(word) > MAX_BATCH_SIZE {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(MAX_BATCH_SIZE) {
                    pieces.push(chunk.iter().collect());
                }
                continue;
            }

            if !current.is_empty() && char_len(&current) + char_len(word) > MAX_BATCH_SIZE {
                pieces.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
    }

    /// Call translate_tts for a single batch
    async fn call_google(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let url = format!(
            "{}/translate_tts?ie=UTF-8&client=tw-ob&tl={}&q={}",
            self.base_url,
            urlencoding::encode(language),
            urlencoding::encode(text)
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::REFERER, "https://translate.google.com/")
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    language = language,
                    text_length = text.len(),
                    "Google TTS request failed"
                );
                format!("Google TTS error: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Google TTS returned HTTP {} for language {}", status.as_u16(), language));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read Google TTS audio: {}", e))?;

        if audio.is_empty() {
            return Err("Google TTS returned empty audio".to_string());
        }

        Ok(audio.to_vec())
    }
}

fn push_trimmed(batches: &mut Vec<String>, batch: &str) {
    let trimmed = batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let tl = Self::tts_language(language);

        let batches = Self::split_into_batches(text);
        if batches.is_empty() {
            return Err("No text to speak".to_string());
        }

        tracing::info!(
            language = tl,
            text_length = text.len(),
            batch_count = batches.len(),
            "Starting Google TTS synthesis"
        );

        let mut merged_audio = Vec::new();
        for batch in &batches {
            let audio_data = self.call_google(batch, tl).await?;
            merged_audio.extend(audio_data);
        }

        tracing::info!(
            provider = "google_translate",
            language = tl,
            latency_ms = start_time.elapsed().as_millis(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}

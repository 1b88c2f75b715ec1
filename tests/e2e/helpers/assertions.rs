use regex::Regex;
use serde_json::Value;

/// `<YYYYmmdd>_<HHMMSS>_<micros>_<name>`
pub fn assert_stored_upload_name(stored: &str, sanitized_original: &str) {
    let pattern = Regex::new(&format!(
        r"^\d{{8}}_\d{{6}}_\d{{6}}_{}$",
        regex::escape(sanitized_original)
    ))
    .unwrap();
    assert!(
        pattern.is_match(stored),
        "Stored name '{}' does not match '<timestamp>_{}'",
        stored,
        sanitized_original
    );
}

/// `/audio/response_<YYYYmmdd>_<HHMMSS>_<micros>.mp3`
pub fn assert_audio_url(url: &str) {
    let pattern = Regex::new(r"^/audio/response_\d{8}_\d{6}_\d{6}\.mp3$").unwrap();
    assert!(pattern.is_match(url), "Unexpected audio URL '{}'", url);
}

pub fn assert_chat_response(body: &Value, expected_response: &str, expected_language: &str) {
    assert_eq!(
        body.get("response").and_then(|v| v.as_str()),
        Some(expected_response)
    );
    assert_eq!(
        body.get("language").and_then(|v| v.as_str()),
        Some(expected_language)
    );
}

use lingua::{LanguageDetector, LanguageDetectorBuilder};

/// Language identification used by the chat orchestrator
pub trait LanguageDetection: Send + Sync {
    /// Return the ISO 639-1 code of the text's language.
    ///
    /// Errors when the language cannot be determined (empty input, digits
    /// only, too ambiguous); callers decide what to fall back to.
    fn detect(&self, text: &str) -> Result<String, String>;
}

/// Detector backed by lingua with every language it ships
pub struct LinguaLanguageDetector {
    detector: LanguageDetector,
}

impl LinguaLanguageDetector {
    pub fn new() -> Self {
        let detector = LanguageDetectorBuilder::from_all_languages().build();
        Self { detector }
    }
}

impl Default for LinguaLanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetection for LinguaLanguageDetector {
    fn detect(&self, text: &str) -> Result<String, String> {
        if text.trim().is_empty() {
            return Err("no text to detect".to_string());
        }

        self.detector
            .detect_language_of(text)
            .map(|language| language.iso_code_639_1().to_string().to_lowercase())
            .ok_or_else(|| "language could not be determined".to_string())
    }
}

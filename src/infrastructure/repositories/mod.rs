pub mod gemini_repository;
pub mod generation_repository;
pub mod google_tts_repository;
pub mod tts_repository;

pub use gemini_repository::GeminiRepository;
pub use generation_repository::GenerationRepository;
pub use google_tts_repository::GoogleTtsRepository;
pub use tts_repository::TtsRepository;

mod chat;

pub mod db;
pub mod language_llm;
pub mod qa_llm;
pub mod summary_llm;
pub mod translation_llm;
pub mod vision_llm;

pub use db::DbAdapter;
pub use language_llm::OpenAiLanguageAdapter;
pub use qa_llm::OpenAiQaAdapter;
pub use summary_llm::OpenAiSummaryAdapter;
pub use translation_llm::OpenAiTranslationAdapter;
pub use vision_llm::OpenAiVisionAdapter;

pub mod consumer;
pub mod domain;
pub mod ports;
pub mod sse;

pub use consumer::{consume, StreamHandler, StreamSlot};
pub use domain::{
    BriefingRecord, ChatMessage, ChatRole, Document, Language, MediaKind, TranslationLanguage,
};
pub use ports::{
    BriefingStore, LanguageDetectionService, PortError, PortResult, QuestionAnsweringService,
    SnapshotStream, SummarizationService, TranslationService, VisionExtractionService,
};
pub use sse::{SseParser, StreamEvent};

//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::extract::FileDecoder;
use briefing_core::ports::{
    BriefingStore, LanguageDetectionService, QuestionAnsweringService, SummarizationService,
    TranslationService,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn BriefingStore>,
    pub summary_adapter: Arc<dyn SummarizationService>,
    pub translation_adapter: Arc<dyn TranslationService>,
    pub qa_adapter: Arc<dyn QuestionAnsweringService>,
    pub language_adapter: Arc<dyn LanguageDetectionService>,
    pub decoder: Arc<FileDecoder>,
}

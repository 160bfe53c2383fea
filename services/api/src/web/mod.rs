pub mod middleware;
pub mod protocol;
pub mod relay;
pub mod rest;
pub mod state;
pub mod stream;

// Re-export the handlers the binary wires into the router.
pub use middleware::require_auth;
pub use rest::{
    chat_handler, extract_document_handler, list_history_handler, save_history_handler,
};
pub use stream::{summary_stream_handler, translation_stream_handler};

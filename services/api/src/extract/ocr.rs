//! services/api/src/extract/ocr.rs
//!
//! Optical character recognition for image uploads, backed by the external
//! `tesseract` command.
//!
//! The engine is a process-wide singleton: it is probed lazily on first use,
//! concurrent first callers share one in-flight initialization instead of
//! racing their own, the recognition language can be switched with an
//! explicit reinitialization call, and `shutdown` resets the probe for
//! process teardown.

use briefing_core::ports::{PortError, PortResult};
use std::sync::{Arc, Mutex};
use tokio::process::Command;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// The tesseract executable; override via `TESSERACT_CMD`.
    pub tesseract_cmd: String,
    /// Initial recognition language (traineddata name, e.g. `eng`).
    pub language: String,
}

pub struct OcrEngine {
    cmd: String,
    language: RwLock<String>,
    // Swapped out wholesale by `shutdown`, so the next caller re-probes.
    probe: Mutex<Arc<OnceCell<()>>>,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Arc<Self> {
        Arc::new(Self {
            cmd: config.tesseract_cmd,
            language: RwLock::new(config.language),
            probe: Mutex::new(Arc::new(OnceCell::new())),
        })
    }

    /// Verifies the binary is runnable. All concurrent callers await the
    /// same initialization future.
    async fn ensure_ready(&self) -> PortResult<()> {
        let cell = self.probe.lock().unwrap().clone();
        cell.get_or_try_init(|| async {
            let output = Command::new(&self.cmd)
                .arg("--version")
                .output()
                .await
                .map_err(|e| {
                    PortError::Unexpected(format!(
                        "OCR engine '{}' is not runnable: {e}",
                        self.cmd
                    ))
                })?;
            if !output.status.success() {
                return Err(PortError::Unexpected(format!(
                    "OCR engine '{}' failed its version probe",
                    self.cmd
                )));
            }
            info!("OCR engine initialized: {}", self.cmd);
            Ok(())
        })
        .await
        .map(|_| ())
    }

    /// Switches the recognition language for all subsequent calls.
    pub async fn reinitialize(&self, language: &str) {
        let mut current = self.language.write().await;
        if *current != language {
            info!("OCR language switched from {} to {}", current, language);
            *current = language.to_string();
        }
    }

    /// Recognizes text in an image. The bytes round-trip through a
    /// temporary directory because tesseract reads from a file path.
    pub async fn recognize(&self, image_bytes: &[u8], extension: &str) -> PortResult<String> {
        self.ensure_ready().await?;
        let language = self.language.read().await.clone();

        let dir = tempfile::tempdir()
            .map_err(|e| PortError::Unexpected(format!("Failed to create OCR scratch dir: {e}")))?;
        let input_path = dir.path().join(format!("input.{extension}"));
        tokio::fs::write(&input_path, image_bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to write OCR input: {e}")))?;

        let output = Command::new(&self.cmd)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(&language)
            .output()
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to run OCR: {e}")))?;

        if !output.status.success() {
            return Err(PortError::Unexpected(format!(
                "OCR failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Teardown hook for process shutdown; the next use re-probes.
    pub fn shutdown(&self) {
        debug!("OCR engine shut down");
        *self.probe.lock().unwrap() = Arc::new(OnceCell::new());
    }
}

//! crates/briefing_core/src/consumer.rs
//!
//! The client-side stream consumer: drives the SSE parser over a raw byte
//! stream, dispatches UI callbacks, and enforces the one-active-stream-per-
//! slot discipline with cooperative cancellation.

use crate::ports::{PortError, PortResult};
use crate::sse::{SseParser, StreamEvent};
use bytes::Bytes;
use futures::future::{self, Either};
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

/// Callbacks invoked as the consumer reconstructs events.
///
/// `on_progress` replaces previously displayed content; snapshots are not
/// appended. `on_done` fires exactly once per successful stream, with `None`
/// when the transport closed before any terminal event arrived.
pub trait StreamHandler {
    fn on_progress(&mut self, snapshot: &str);
    fn on_done(&mut self, final_text: Option<&str>);
    fn on_error(&mut self, message: &str);
}

/// Consumes a relay byte stream until a terminal event, transport close, or
/// cancellation.
///
/// Cancellation is the expected teardown path: it unblocks the pending read
/// promptly, suppresses every further callback, and returns `Ok(())` rather
/// than an error. A mid-stream `error` event is dispatched to `on_error` and
/// then returned as `Generation` so callers can reset the slot to idle.
pub async fn consume<S, E>(
    mut byte_stream: S,
    token: CancellationToken,
    handler: &mut (dyn StreamHandler + Send),
) -> PortResult<()>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut parser = SseParser::new();
    let mut resolved = false;

    loop {
        let item = {
            let cancelled = token.cancelled();
            futures::pin_mut!(cancelled);
            match future::select(cancelled, byte_stream.next()).await {
                Either::Left(_) => return Ok(()),
                Either::Right((item, _)) => item,
            }
        };

        let Some(item) = item else {
            break;
        };
        let chunk = item.map_err(|e| PortError::Generation(e.to_string()))?;
        let events = parser
            .push(&chunk)
            .map_err(|e| PortError::Generation(e.to_string()))?;

        for event in events {
            // The token may have been cancelled while this read was parked;
            // a superseded stream must never reach the handler again.
            if token.is_cancelled() {
                return Ok(());
            }
            match event {
                StreamEvent::Progress { snapshot } => handler.on_progress(&snapshot),
                StreamEvent::Done { final_text } => {
                    resolved = true;
                    handler.on_done(final_text.as_deref());
                }
                StreamEvent::Error { message } => {
                    handler.on_error(&message);
                    return Err(PortError::Generation(message));
                }
            }
        }
    }

    if !resolved && !token.is_cancelled() {
        // Transport closed without a terminal event: implicit completion
        // with no payload, so the UI keeps the last snapshot it saw.
        handler.on_done(None);
    }
    Ok(())
}

/// One independently-cancellable streaming channel: the summary slot, or one
/// per translation language. Starting a new stream for a slot first cancels
/// the previous one, so stale updates can never overwrite fresher ones.
#[derive(Debug, Default)]
pub struct StreamSlot {
    token: Option<CancellationToken>,
}

impl StreamSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever stream currently owns this slot and hands out the
    /// token for the new one.
    pub fn begin(&mut self) -> CancellationToken {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        token
    }

    /// Explicit teardown, e.g. when the user navigates away.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records every callback so tests can assert on ordering and content.
    #[derive(Debug, Default, Clone)]
    struct Recorder {
        inner: Arc<Mutex<RecorderInner>>,
    }

    #[derive(Debug, Default)]
    struct RecorderInner {
        displayed: String,
        done: Vec<Option<String>>,
        errors: Vec<String>,
    }

    impl StreamHandler for Recorder {
        fn on_progress(&mut self, snapshot: &str) {
            self.inner.lock().unwrap().displayed = snapshot.to_string();
        }
        fn on_done(&mut self, final_text: Option<&str>) {
            let mut inner = self.inner.lock().unwrap();
            if let Some(text) = final_text {
                inner.displayed = text.to_string();
            }
            inner.done.push(final_text.map(str::to_string));
        }
        fn on_error(&mut self, message: &str) {
            self.inner.lock().unwrap().errors.push(message.to_string());
        }
    }

    fn ok_chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, Infallible>> + Unpin {
        futures::stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn dispatches_progress_then_done() {
        let mut recorder = Recorder::default();
        let stream = ok_chunks(&[
            "data: {\"type\":\"progress\",\"summary\":\"draft\"}\n\n",
            "data: {\"type\":\"done\",\"summary\":\"final\"}\n\n",
        ]);
        consume(stream, CancellationToken::new(), &mut recorder)
            .await
            .unwrap();

        let inner = recorder.inner.lock().unwrap();
        assert_eq!(inner.displayed, "final");
        assert_eq!(inner.done.as_slice(), [Some("final".to_string())]);
        assert!(inner.errors.is_empty());
    }

    #[tokio::test]
    async fn events_split_across_reads_still_arrive_whole() {
        let mut recorder = Recorder::default();
        let stream = ok_chunks(&[
            "data: {\"type\":\"prog",
            "ress\",\"summary\":\"half\"}",
            "\n\ndata: {\"type\":\"done\",\"summary\":\"whole\"}\n\n",
        ]);
        consume(stream, CancellationToken::new(), &mut recorder)
            .await
            .unwrap();
        assert_eq!(recorder.inner.lock().unwrap().displayed, "whole");
    }

    #[tokio::test]
    async fn truncated_stream_synthesizes_an_empty_done() {
        let mut recorder = Recorder::default();
        let stream = ok_chunks(&["data: {\"type\":\"progress\",\"summary\":\"partial\"}\n\n"]);
        consume(stream, CancellationToken::new(), &mut recorder)
            .await
            .unwrap();

        let inner = recorder.inner.lock().unwrap();
        // The implicit completion carries no payload; the last snapshot stays.
        assert_eq!(inner.displayed, "partial");
        assert_eq!(inner.done.as_slice(), [None]);
    }

    #[tokio::test]
    async fn error_event_surfaces_and_stops_processing() {
        let mut recorder = Recorder::default();
        let stream = ok_chunks(&[
            "data: {\"type\":\"error\",\"message\":\"boom\"}\n\n",
            "data: {\"type\":\"done\",\"summary\":\"never\"}\n\n",
        ]);
        let result = consume(stream, CancellationToken::new(), &mut recorder).await;
        assert!(matches!(result, Err(PortError::Generation(_))));

        let inner = recorder.inner.lock().unwrap();
        assert_eq!(inner.errors.as_slice(), ["boom"]);
        assert!(inner.done.is_empty());
    }

    #[tokio::test]
    async fn replaying_the_same_stream_displays_the_same_content() {
        for _ in 0..2 {
            let mut recorder = Recorder::default();
            let stream = ok_chunks(&[
                "data: {\"type\":\"progress\",\"summary\":\"a\"}\n\n",
                "data: {\"type\":\"progress\",\"summary\":\"ab\"}\n\n",
                "data: {\"type\":\"done\",\"summary\":\"abc\"}\n\n",
            ]);
            consume(stream, CancellationToken::new(), &mut recorder)
                .await
                .unwrap();
            assert_eq!(recorder.inner.lock().unwrap().displayed, "abc");
        }
    }

    #[tokio::test]
    async fn cancellation_mid_stream_suppresses_terminal_callbacks() {
        let token = CancellationToken::new();
        let mut recorder = Recorder::default();
        let shared = recorder.inner.clone();

        // One progress chunk, then a read that never completes.
        let first = futures::stream::iter(vec![Ok::<_, Infallible>(Bytes::from_static(
            b"data: {\"type\":\"progress\",\"summary\":\"first\"}\n\n",
        ))]);
        let stream = first.chain(futures::stream::pending());
        futures::pin_mut!(stream);

        let cancel_token = token.clone();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel_token.cancel();
        });

        consume(stream, token, &mut recorder).await.unwrap();
        canceller.await.unwrap();

        let inner = shared.lock().unwrap();
        assert_eq!(inner.displayed, "first");
        assert!(inner.done.is_empty());
        assert!(inner.errors.is_empty());
    }

    #[tokio::test]
    async fn starting_a_second_stream_suppresses_the_stale_one() {
        let mut slot = StreamSlot::new();

        // First stream: holds its token, resolves only after the second
        // stream has already completed.
        let first_token = slot.begin();
        let first_recorder = Recorder::default();
        let first_shared = first_recorder.inner.clone();
        let first_task = tokio::spawn(async move {
            let mut recorder = first_recorder;
            let delayed = futures::stream::once(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<_, Infallible>(Bytes::from_static(
                    b"data: {\"type\":\"done\",\"summary\":\"stale\"}\n\n",
                ))
            });
            futures::pin_mut!(delayed);
            consume(delayed, first_token, &mut recorder).await
        });

        // Second stream for the same slot: begin() cancels the first token.
        let second_token = slot.begin();
        let mut second_recorder = Recorder::default();
        let fresh = ok_chunks(&["data: {\"type\":\"done\",\"summary\":\"fresh\"}\n\n"]);
        consume(fresh, second_token, &mut second_recorder)
            .await
            .unwrap();

        first_task.await.unwrap().unwrap();

        let stale = first_shared.lock().unwrap();
        assert!(stale.done.is_empty(), "stale stream must not call back");
        assert_eq!(stale.displayed, "");
        assert_eq!(
            second_recorder.inner.lock().unwrap().displayed,
            "fresh"
        );
    }

    #[test]
    fn slot_begin_cancels_the_previous_token() {
        let mut slot = StreamSlot::new();
        let first = slot.begin();
        assert!(!first.is_cancelled());
        let second = slot.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(slot.is_active());
        slot.cancel();
        assert!(second.is_cancelled());
        assert!(!slot.is_active());
    }
}

//! services/api/src/web/relay.rs
//!
//! The SSE relay state machine: `Idle -> Streaming -> {Completed, Errored,
//! Aborted}`. Request validation happens in the handlers before a stream is
//! created (`Idle` never transitions on bad input); this module covers the
//! `Streaming` phase. Abort needs no code of its own: a client disconnect
//! drops the generator, which drops the snapshot stream and cancels the
//! underlying generation call, with no further events and no retry.

use briefing_core::ports::SnapshotStream;
use futures::{Stream, StreamExt};

/// The relay's output, independent of the wire field name each endpoint uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// One non-empty snapshot, forwarded verbatim.
    Progress(String),
    /// Terminal success: the last non-empty snapshot seen, or empty string
    /// when the generation resolved without ever producing one.
    Done(String),
    /// Terminal failure, emitted in-band.
    Error(String),
}

/// Drives a generation snapshot stream to completion, emitting exactly one
/// terminal event. Snapshots with no usable content are dropped silently.
pub fn relay_events(snapshots: SnapshotStream) -> impl Stream<Item = RelayEvent> + Send {
    async_stream::stream! {
        let mut snapshots = snapshots;
        let mut latest: Option<String> = None;

        while let Some(next) = snapshots.next().await {
            match next {
                Ok(snapshot) => {
                    if snapshot.is_empty() {
                        continue;
                    }
                    latest = Some(snapshot.clone());
                    yield RelayEvent::Progress(snapshot);
                }
                Err(e) => {
                    yield RelayEvent::Error(e.to_string());
                    return;
                }
            }
        }

        yield RelayEvent::Done(latest.unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefing_core::ports::{PortError, PortResult};

    fn snapshots(items: Vec<PortResult<String>>) -> SnapshotStream {
        Box::pin(futures::stream::iter(items))
    }

    async fn run(items: Vec<PortResult<String>>) -> Vec<RelayEvent> {
        relay_events(snapshots(items)).collect().await
    }

    #[tokio::test]
    async fn forwards_each_snapshot_then_completes_with_the_last() {
        let events = run(vec![
            Ok("This NDA".into()),
            Ok("This NDA binds both".into()),
            Ok("This NDA binds both parties.".into()),
        ])
        .await;

        assert_eq!(
            events,
            vec![
                RelayEvent::Progress("This NDA".into()),
                RelayEvent::Progress("This NDA binds both".into()),
                RelayEvent::Progress("This NDA binds both parties.".into()),
                RelayEvent::Done("This NDA binds both parties.".into()),
            ]
        );

        // Scenario contract: at least one non-empty progress event and
        // exactly one non-empty done event.
        let done_count = events
            .iter()
            .filter(|e| matches!(e, RelayEvent::Done(_)))
            .count();
        assert_eq!(done_count, 1);
    }

    #[tokio::test]
    async fn empty_snapshots_are_dropped_silently() {
        let events = run(vec![Ok("".into()), Ok("text".into()), Ok("".into())]).await;
        assert_eq!(
            events,
            vec![
                RelayEvent::Progress("text".into()),
                RelayEvent::Done("text".into()),
            ]
        );
    }

    #[tokio::test]
    async fn no_snapshots_completes_with_an_empty_payload() {
        assert_eq!(run(vec![]).await, vec![RelayEvent::Done(String::new())]);
    }

    #[tokio::test]
    async fn failure_mid_stream_emits_exactly_one_error_and_no_done() {
        let events = run(vec![
            Ok("partial".into()),
            Err(PortError::Generation("model overloaded".into())),
            Ok("never seen".into()),
        ])
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], RelayEvent::Progress("partial".into()));
        assert!(matches!(&events[1], RelayEvent::Error(m) if m.contains("model overloaded")));
    }

    #[tokio::test]
    async fn markdown_tokens_pass_through_verbatim() {
        let markdown = "**Key Terms**\n- Term A";
        let events = run(vec![Ok(markdown.to_string())]).await;
        assert_eq!(
            events,
            vec![
                RelayEvent::Progress(markdown.to_string()),
                RelayEvent::Done(markdown.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn revised_snapshots_replace_rather_than_append() {
        // The generation is allowed to rewrite earlier output entirely.
        let events = run(vec![Ok("first draft".into()), Ok("rewritten".into())]).await;
        assert_eq!(
            events.last(),
            Some(&RelayEvent::Done("rewritten".into()))
        );
    }
}

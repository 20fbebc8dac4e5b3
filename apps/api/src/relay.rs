//! Bridges an upstream model stream onto an HTTP response body.
//!
//! Text deltas are forwarded as raw bytes the moment they arrive. Metered
//! routes get a metrics trailer after the sentinel line once the upstream
//! completes; the trailer is written whole or not at all. An upstream
//! failure mid-stream aborts the body, so clients see a transport error
//! instead of a silently short response. When the client disconnects the
//! pump stops and the upstream request is dropped with it.

use std::time::Instant;

use axum::body::Body;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::llm_client::{EventStream, GenerationError, ModelTier, StreamEvent};
use crate::models::assessment::PerformanceMetrics;
use crate::wire;

const CHANNEL_CAPACITY: usize = 32;

/// Relays a stream and appends the metrics trailer on completion.
pub fn stream_with_metrics(events: EventStream, tier: ModelTier, started: Instant) -> Body {
    relay(events, tier, started, true)
}

/// Relays a stream as-is. Usage still gets logged, but nothing is
/// appended to the body.
pub fn stream_plain(events: EventStream, tier: ModelTier, started: Instant) -> Body {
    relay(events, tier, started, false)
}

fn relay(events: EventStream, tier: ModelTier, started: Instant, with_trailer: bool) -> Body {
    let (tx, mut rx) = mpsc::channel::<Result<Bytes, GenerationError>>(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut events = events;
        let mut first_delta_at: Option<Instant> = None;

        while let Some(event) = events.next().await {
            match event {
                Ok(StreamEvent::TextDelta(text)) => {
                    if first_delta_at.is_none() {
                        first_delta_at = Some(Instant::now());
                    }
                    if tx.send(Ok(Bytes::from(text))).await.is_err() {
                        // Client went away; dropping the stream cancels
                        // the upstream call.
                        return;
                    }
                }
                Ok(StreamEvent::Completed(usage)) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    let ttft_ms = first_delta_at
                        .map(|t| t.duration_since(started).as_millis() as u64)
                        .unwrap_or(latency_ms);
                    let metrics = PerformanceMetrics {
                        input_tokens: usage.input_tokens,
                        output_tokens: usage.output_tokens,
                        latency_ms,
                        time_to_first_token_ms: ttft_ms,
                        cost_usd: tier.pricing().cost_usd(&usage),
                    };

                    if with_trailer {
                        match wire::encode_trailer(&metrics) {
                            Ok(frame) => {
                                let _ = tx.send(Ok(Bytes::from(frame))).await;
                            }
                            Err(e) => {
                                let _ = tx.send(Err(GenerationError::Parse(e))).await;
                            }
                        }
                    } else {
                        debug!(
                            "stream complete: input_tokens={}, output_tokens={}, latency_ms={}, cost_usd={:.6}",
                            metrics.input_tokens,
                            metrics.output_tokens,
                            metrics.latency_ms,
                            metrics.cost_usd
                        );
                    }
                    return;
                }
                Err(e) => {
                    error!("Upstream stream failed: {}", e);
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        }

        // Upstream ended without a completion event.
        let _ = tx.send(Err(GenerationError::Truncated)).await;
    });

    Body::from_stream(stream::poll_fn(move |cx| rx.poll_recv(cx)))
}

#[cfg(test)]
mod tests {
    use futures_util::stream;

    use super::*;
    use crate::llm_client::Usage;
    use crate::wire::METADATA_DELIMITER;

    fn scripted(events: Vec<Result<StreamEvent, GenerationError>>) -> EventStream {
        Box::pin(stream::iter(events))
    }

    fn usage() -> Usage {
        Usage {
            input_tokens: 100,
            output_tokens: 50,
        }
    }

    #[tokio::test]
    async fn test_metrics_trailer_appended_after_content() {
        let events = scripted(vec![
            Ok(StreamEvent::TextDelta("Hello".to_string())),
            Ok(StreamEvent::TextDelta(" world".to_string())),
            Ok(StreamEvent::Completed(usage())),
        ]);

        let body = stream_with_metrics(events, ModelTier::Sonnet, Instant::now());
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        let (content, metrics) = wire::decode_stream(text).unwrap();
        assert_eq!(content, "Hello world");
        assert_eq!(metrics.input_tokens, 100);
        assert_eq!(metrics.output_tokens, 50);
        // 100 in / 50 out on Sonnet pricing.
        assert!((metrics.cost_usd - 0.00105).abs() < 1e-9);
        assert!(metrics.time_to_first_token_ms <= metrics.latency_ms);
    }

    #[tokio::test]
    async fn test_trailer_on_empty_content() {
        let events = scripted(vec![Ok(StreamEvent::Completed(usage()))]);

        let body = stream_with_metrics(events, ModelTier::Sonnet, Instant::now());
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        let (content, metrics) = wire::decode_stream(text).unwrap();
        assert_eq!(content, "");
        assert_eq!(metrics.time_to_first_token_ms, metrics.latency_ms);
    }

    #[tokio::test]
    async fn test_plain_stream_has_no_trailer() {
        let events = scripted(vec![
            Ok(StreamEvent::TextDelta("{\"phases\":[]}".to_string())),
            Ok(StreamEvent::Completed(usage())),
        ]);

        let body = stream_plain(events, ModelTier::Sonnet, Instant::now());
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();

        assert_eq!(text, "{\"phases\":[]}");
        assert!(!text.contains(METADATA_DELIMITER));
    }

    #[tokio::test]
    async fn test_upstream_error_aborts_body() {
        let events = scripted(vec![
            Ok(StreamEvent::TextDelta("partial".to_string())),
            Err(GenerationError::Api {
                status: None,
                message: "overloaded_error: Overloaded".to_string(),
            }),
        ]);

        let body = stream_with_metrics(events, ModelTier::Sonnet, Instant::now());
        let mut frames = body.into_data_stream();

        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"partial");
        assert!(frames.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_truncated_stream_aborts_body() {
        let events = scripted(vec![Ok(StreamEvent::TextDelta("half an ans".to_string()))]);

        let body = stream_with_metrics(events, ModelTier::Sonnet, Instant::now());
        let mut frames = body.into_data_stream();

        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"half an ans");

        let err = frames.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("before completion"));
    }

    #[tokio::test]
    async fn test_plain_truncated_stream_also_aborts() {
        let events = scripted(vec![Ok(StreamEvent::TextDelta("{\"pha".to_string()))]);

        let body = stream_plain(events, ModelTier::Sonnet, Instant::now());
        let mut frames = body.into_data_stream();

        assert!(frames.next().await.unwrap().is_ok());
        assert!(frames.next().await.unwrap().is_err());
    }
}

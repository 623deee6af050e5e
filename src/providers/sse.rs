//! Server-Sent Events to chat chunks
//!
//! Line buffering, UTF-8 boundaries, comments and line endings are handled by
//! `eventsource-stream`; this module only interprets the event payloads.

use super::BoxStream;
use crate::models::openai::OpenAIStreamResponse;
use crate::utils::error::{ClientError, ClientResult};
use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use tracing::{debug, warn};

/// Payload that terminates an OpenAI-compatible stream
pub const DONE_MARKER: &str = "[DONE]";

/// Turn a byte stream into decoded chat chunks
///
/// The stream ends at `[DONE]`, at the end of the body, or right after the
/// first error it yields.
pub fn chunk_stream<S, B, E>(bytes: S) -> BoxStream<'static, OpenAIStreamResponse>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Send + 'static,
    ClientError: From<E>,
{
    let events = Box::pin(bytes.eventsource());

    let stream = futures::stream::unfold((events, false), |(mut events, finished)| async move {
        if finished {
            return None;
        }

        loop {
            match events.next().await? {
                Ok(event) => {
                    let data = event.data.trim();
                    if data.is_empty() {
                        continue;
                    }
                    if data == DONE_MARKER {
                        debug!("Received streaming response end marker");
                        return None;
                    }
                    if let Some(item) = decode_chunk(data) {
                        let finished = item.is_err();
                        return Some((item, (events, finished)));
                    }
                }
                Err(e) => return Some((Err(stream_error(e)), (events, true))),
            }
        }
    });

    Box::pin(stream)
}

/// Decode one event payload into a chunk, surfacing mid-stream errors
pub(crate) fn decode_chunk(data: &str) -> Option<ClientResult<OpenAIStreamResponse>> {
    match serde_json::from_str::<OpenAIStreamResponse>(data) {
        Ok(chunk) => match &chunk.error {
            Some(err) => Some(Err(ClientError::Stream {
                message: err.message.clone(),
                code: err.code_string(),
            })),
            None => Some(Ok(chunk)),
        },
        Err(e) => {
            warn!("Failed to parse streaming response chunk: {} - data: {}", e, data);
            None
        }
    }
}

fn stream_error<E>(err: EventStreamError<E>) -> ClientError
where
    ClientError: From<E>,
{
    match err {
        EventStreamError::Transport(e) => ClientError::from(e),
        EventStreamError::Utf8(e) => {
            ClientError::Decode(format!("Invalid UTF-8 in event stream: {}", e))
        }
        EventStreamError::Parser(e) => {
            ClientError::Decode(format!("Malformed event stream: {:?}", e))
        }
    }
}

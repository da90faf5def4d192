use crate::error::CommonRequestError;
use bytes::Bytes;
use futures_util::{
    Stream, StreamExt,
    future::{self, Either},
};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Literal prefix that marks an event record line.
pub const DATA_PREFIX: &str = "data: ";

/// Read state of an [`EventDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Reading,
    Finished,
}

/// How a cancellable dispatch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The byte stream was exhausted.
    Finished,
    /// The abort signal fired before the stream ended.
    Cancelled,
}

/// Parse a single line as an event record.
///
/// Returns `Ok(None)` for lines that do not start with `data: `. The payload
/// after the prefix must be a complete JSON document.
pub fn parse_event_line<T: DeserializeOwned>(line: &str) -> Result<Option<T>, CommonRequestError> {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    serde_json::from_str(payload)
        .map(Some)
        .map_err(|e| CommonRequestError::InvalidEventData(format!("JSON parse error: {e}")))
}

/// Decode one chunk on its own and hand every parsed event to `on_event`, in line order.
///
/// The chunk is decoded without any state from previous chunks, so a record
/// split across two chunks is seen as two unrelated fragments and dropped.
/// Lines that fail to parse are logged and skipped. Returns the number of
/// events dispatched.
pub fn dispatch_chunk<T, F>(chunk: &[u8], on_event: &mut F) -> usize
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let text = String::from_utf8_lossy(chunk);
    let mut dispatched = 0;

    for line in text.split('\n') {
        match parse_event_line::<T>(line) {
            Ok(Some(event)) => {
                on_event(event);
                dispatched += 1;
            }
            Ok(None) => {
                if !line.is_empty() {
                    log::trace!("Skipping non-data line: {line:?}");
                }
            }
            Err(err) => log::warn!("Failed to parse SSE data: {err}; line: {line:?}"),
        }
    }

    dispatched
}

/// Collect the events of one chunk, with the same semantics as [`dispatch_chunk`].
pub fn decode_chunk<T: DeserializeOwned>(chunk: &[u8]) -> Vec<T> {
    let mut events = Vec::new();
    dispatch_chunk(chunk, &mut |event| events.push(event));
    events
}

/// Reads a byte stream chunk by chunk and dispatches the events it carries.
///
/// The dispatcher owns the stream; it is dropped, and the connection behind it
/// released, as soon as the dispatcher is.
pub struct EventDispatcher<S> {
    byte_stream: S,
    state: ReadState,
    dispatched: usize,
}

impl<S, E> EventDispatcher<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<CommonRequestError>,
{
    pub fn new(byte_stream: S) -> Self {
        Self {
            byte_stream,
            state: ReadState::Reading,
            dispatched: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Number of events handed to callbacks so far.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Await the next raw chunk. Once the stream is exhausted this keeps returning `None`.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, CommonRequestError> {
        if self.state == ReadState::Finished {
            return Ok(None);
        }

        match self.byte_stream.next().await {
            Some(chunk) => {
                let chunk = chunk.map_err(Into::<CommonRequestError>::into)?;
                log::trace!("Received chunk of {} bytes", chunk.len());
                Ok(Some(chunk))
            }
            None => {
                self.state = ReadState::Finished;
                log::debug!("Event stream ended after {} events", self.dispatched);
                Ok(None)
            }
        }
    }

    /// Await the next chunk and decode its events.
    pub async fn next_events<T: DeserializeOwned>(
        &mut self,
    ) -> Result<Option<Vec<T>>, CommonRequestError> {
        let Some(chunk) = self.next_chunk().await? else {
            return Ok(None);
        };

        let events = decode_chunk(&chunk);
        self.dispatched += events.len();
        Ok(Some(events))
    }

    /// Consume the stream until it ends, calling `on_event` once per record.
    ///
    /// Event variants are not interpreted: the loop only stops when the stream
    /// is exhausted or a chunk read fails.
    pub async fn run<T, F>(mut self, mut on_event: F) -> Result<(), CommonRequestError>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        while let Some(chunk) = self.next_chunk().await? {
            self.dispatched += dispatch_chunk(&chunk, &mut on_event);
        }

        Ok(())
    }

    /// Like [`EventDispatcher::run`], but stops at the next chunk read once `cancel` resolves.
    pub async fn run_until<T, F, C>(
        mut self,
        mut on_event: F,
        cancel: C,
    ) -> Result<StreamOutcome, CommonRequestError>
    where
        T: DeserializeOwned,
        F: FnMut(T),
        C: Future<Output = ()>,
    {
        let mut cancel = std::pin::pin!(cancel);

        loop {
            let read = {
                let next = std::pin::pin!(self.next_chunk());
                match future::select(cancel.as_mut(), next).await {
                    Either::Left(_) => None,
                    Either::Right((chunk, _)) => Some(chunk),
                }
            };

            match read {
                None => {
                    log::debug!("Event stream cancelled after {} events", self.dispatched);
                    return Ok(StreamOutcome::Cancelled);
                }
                Some(chunk) => match chunk? {
                    Some(chunk) => self.dispatched += dispatch_chunk(&chunk, &mut on_event),
                    None => return Ok(StreamOutcome::Finished),
                },
            }
        }
    }
}

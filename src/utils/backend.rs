use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

// ============================================================================
// Constants
// ============================================================================

const THUMB_FEEDBACK_PATH: &str = "/thumb_feedback";
const CHAT_STREAM_PATH: &str = "/chat_stream";
const CHECK_RAG_PATH: &str = "/check_rag";

// Control markers the backend appends to the plain-text chat stream.
const POSTPROCESS_MARKER: &str = "\n[REF_POSTPROCESS]";
const RUN_ID_MARKER: &str = "\n[RUN_ID]";
const ERROR_MARKER: &str = "\n[ERROR] ";

// ============================================================================
// Feedback Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThumbFeedback {
    pub run_id: String,
    pub evaluation: Evaluation,
    pub reason: String,
}

impl ThumbFeedback {
    /// Validate a submission before any network call is made. A missing run
    /// identifier or a down-vote without a written reason is rejected here.
    pub fn new(
        run_id: Option<&str>,
        evaluation: Evaluation,
        reason: &str,
    ) -> Result<Self, String> {
        let run_id = run_id.map(str::trim).filter(|r| !r.is_empty());
        let Some(run_id) = run_id else {
            return Err("No run id available for this message".to_string());
        };

        let reason = reason.trim();
        if evaluation == Evaluation::Down && reason.is_empty() {
            return Err("A reason is required for a thumbs-down".to_string());
        }

        Ok(Self {
            run_id: run_id.to_string(),
            evaluation,
            reason: reason.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackReply {
    pub message: String,
}

/// Lifecycle of one feedback widget. A widget that has been accepted stays
/// locked, so a turn can only be evaluated once; a failed attempt may be
/// retried.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedbackState {
    #[default]
    Idle,
    Submitting,
    Submitted(String),
    Failed(String),
}

impl FeedbackState {
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Move to `Submitting` if a submission is allowed from the current
    /// state. Returns false when one is already in flight or accepted.
    pub fn begin(&mut self) -> bool {
        if self.can_submit() {
            *self = Self::Submitting;
            true
        } else {
            false
        }
    }

    pub fn complete(&mut self, message: String) {
        *self = Self::Submitted(message);
    }

    pub fn fail(&mut self, message: String) {
        *self = Self::Failed(message);
    }
}

// ============================================================================
// Recommended Questions Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OptionsWrapper {
    pub questions: Vec<String>,
}

// ============================================================================
// Chat Stream Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct ChatStreamRequest {
    message: String,
    osma: bool,
}

#[derive(Debug, Clone, Serialize)]
struct CheckRagRequest {
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CheckRagReply {
    is_rag: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Raw answer text as it is generated.
    Content(String),
    /// The full answer with references resolved and numbers localized;
    /// replaces everything streamed so far.
    PostProcessed(String),
    /// Backend-assigned run identifier for this turn.
    RunId(String),
    Error(String),
    Done,
}

// ============================================================================
// Backend Client
// ============================================================================

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Arc<String>,
    tenant: Arc<String>,
}

impl PartialEq for BackendClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.tenant == other.tenant
    }
}

impl BackendClient {
    pub fn new(base_url: String, tenant: String) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
            tenant: Arc::new(tenant),
        })
    }

    // ========================================================================
    // Thumb Feedback
    // ========================================================================

    pub async fn send_thumb_feedback(
        &self,
        feedback: &ThumbFeedback,
    ) -> Result<FeedbackReply, String> {
        let url = format!("{}{}", self.base_url, THUMB_FEEDBACK_PATH);

        let response = self
            .client
            .post(&url)
            .json(feedback)
            .send()
            .await
            .map_err(|e| format!("Failed to send feedback: {}", e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse feedback response: {}", e))
    }

    // ========================================================================
    // Recommended Questions
    // ========================================================================

    /// Per-tenant prompt suggestions shown next to the welcome message.
    /// Callers treat a failure as "no suggestions".
    pub async fn fetch_recommended_questions(&self) -> Result<Vec<String>, String> {
        let url = format!(
            "{}/static/{}/data/options-wrapper.json",
            self.base_url, self.tenant
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch recommended questions: {}", e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let wrapper: OptionsWrapper = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse options-wrapper.json: {}", e))?;

        Ok(wrapper.questions)
    }

    // ========================================================================
    // Retrieval Pre-Check
    // ========================================================================

    /// Let the backend classify and cache whether the question needs a
    /// document search before streaming starts. Best-effort.
    pub async fn check_rag(&self, message: &str) -> Result<bool, String> {
        let url = format!("{}{}", self.base_url, CHECK_RAG_PATH);
        let request = CheckRagRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Failed to check retrieval: {}", e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let reply: CheckRagReply = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse check_rag response: {}", e))?;

        Ok(reply.is_rag)
    }

    // ========================================================================
    // Streaming Chat
    // ========================================================================

    /// Stream the assistant answer chunk-by-chunk. Cancellation is the
    /// caller's concern: the whole turn, this call included, runs inside an
    /// abortable task so an erase can land before the first byte arrives.
    pub async fn stream_chat(
        &self,
        message: String,
        osma: bool,
    ) -> Result<Pin<Box<dyn Stream<Item = StreamEvent> + Send>>, String> {
        let url = format!("{}{}", self.base_url, CHAT_STREAM_PATH);
        let request = ChatStreamRequest { message, osma };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // Parse control markers safely across arbitrary network chunk
        // boundaries.
        let stream = futures::stream::unfold(
            (
                response.bytes_stream(),
                MarkerParser::new(),
                VecDeque::<StreamEvent>::new(),
                false,
            ),
            |(mut bytes_stream, mut parser, mut pending, mut finished)| async move {
                loop {
                    if let Some(event) = pending.pop_front() {
                        return Some((event, (bytes_stream, parser, pending, finished)));
                    }

                    if finished {
                        return None;
                    }

                    match bytes_stream.next().await {
                        Some(Ok(bytes)) => {
                            for event in parser.feed(&String::from_utf8_lossy(&bytes)) {
                                pending.push_back(event);
                            }
                        }
                        Some(Err(e)) => {
                            pending.push_back(StreamEvent::Error(format!("Stream error: {}", e)));
                            pending.push_back(StreamEvent::Done);
                            finished = true;
                        }
                        None => {
                            for event in parser.finish() {
                                pending.push_back(event);
                            }
                            pending.push_back(StreamEvent::Done);
                            finished = true;
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}

async fn error_from_response(response: reqwest::Response) -> String {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    // Prefer the backend's JSON error/message field when present.
    let error_message = serde_json::from_str::<serde_json::Value>(&error_text)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(error_text);

    format!("Backend error ({}): {}", status, error_message)
}

// ============================================================================
// Marker Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Answer,
    PostProcess,
    RunId,
    Error,
}

/// Splits the plain-text chat stream into answer content and the trailing
/// control sections. Markers may land anywhere relative to network chunk
/// boundaries, so a possible marker prefix at the end of the buffer is held
/// back until more bytes arrive.
pub struct MarkerParser {
    buffer: String,
    section: Section,
}

impl MarkerParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            section: Section::Answer,
        }
    }

    pub fn feed(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);
        let mut events = Vec::new();

        loop {
            match self.section {
                Section::Answer => {
                    if let Some((idx, marker, next)) = self.earliest_marker() {
                        let content: String = self.buffer.drain(..idx).collect();
                        if !content.is_empty() {
                            events.push(StreamEvent::Content(content));
                        }
                        self.buffer.drain(..marker.len());
                        self.section = next;
                        continue;
                    }

                    // No full marker yet: emit everything except a tail that
                    // could still turn into one.
                    let safe = self.buffer.len() - holdback_len(&self.buffer);
                    if safe > 0 {
                        let content: String = self.buffer.drain(..safe).collect();
                        events.push(StreamEvent::Content(content));
                    }
                    break;
                }
                Section::PostProcess => {
                    // The post-processed answer is emitted whole once the
                    // next marker (or end of stream) is seen.
                    if let Some(idx) = self.buffer.find(RUN_ID_MARKER) {
                        let text: String = self.buffer.drain(..idx).collect();
                        self.buffer.drain(..RUN_ID_MARKER.len());
                        events.push(StreamEvent::PostProcessed(text));
                        self.section = Section::RunId;
                        continue;
                    }
                    if let Some(idx) = self.buffer.find(ERROR_MARKER) {
                        let text: String = self.buffer.drain(..idx).collect();
                        self.buffer.drain(..ERROR_MARKER.len());
                        events.push(StreamEvent::PostProcessed(text));
                        self.section = Section::Error;
                        continue;
                    }
                    break;
                }
                // Both trailing sections run to the end of the stream.
                Section::RunId | Section::Error => break,
            }
        }

        events
    }

    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let remainder = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();

        match self.section {
            Section::Answer => {
                if !remainder.is_empty() {
                    events.push(StreamEvent::Content(remainder));
                }
            }
            Section::PostProcess => {
                events.push(StreamEvent::PostProcessed(remainder));
            }
            Section::RunId => {
                let run_id = remainder.trim();
                if !run_id.is_empty() {
                    events.push(StreamEvent::RunId(run_id.to_string()));
                }
            }
            Section::Error => {
                events.push(StreamEvent::Error(remainder.trim().to_string()));
            }
        }

        self.section = Section::Answer;
        events
    }

    fn earliest_marker(&self) -> Option<(usize, &'static str, Section)> {
        [
            (POSTPROCESS_MARKER, Section::PostProcess),
            (RUN_ID_MARKER, Section::RunId),
            (ERROR_MARKER, Section::Error),
        ]
        .into_iter()
        .filter_map(|(marker, section)| {
            self.buffer.find(marker).map(|idx| (idx, marker, section))
        })
        .min_by_key(|(idx, _, _)| *idx)
    }
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the buffer tail that is a prefix of some control marker and
/// therefore cannot be flushed yet.
fn holdback_len(buffer: &str) -> usize {
    let Some(nl) = buffer.rfind('\n') else {
        return 0;
    };
    let tail = &buffer[nl..];
    let is_prefix = [POSTPROCESS_MARKER, RUN_ID_MARKER, ERROR_MARKER]
        .iter()
        .any(|marker| marker.starts_with(tail));
    if is_prefix {
        tail.len()
    } else {
        0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(chunks: &[&str]) -> Vec<StreamEvent> {
        let mut parser = MarkerParser::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(parser.feed(chunk));
        }
        events.extend(parser.finish());
        events
    }

    #[test]
    fn thumb_feedback_requires_run_id() {
        assert!(ThumbFeedback::new(None, Evaluation::Up, "").is_err());
        assert!(ThumbFeedback::new(Some("  "), Evaluation::Up, "").is_err());
    }

    #[test]
    fn thumbs_down_requires_reason() {
        assert!(ThumbFeedback::new(Some("run-1"), Evaluation::Down, "   ").is_err());

        let fb = ThumbFeedback::new(Some("run-1"), Evaluation::Down, "  respuesta incompleta ")
            .expect("valid feedback");
        assert_eq!(fb.reason, "respuesta incompleta");
    }

    #[test]
    fn thumbs_up_allows_empty_reason() {
        let fb = ThumbFeedback::new(Some("run-1"), Evaluation::Up, "").expect("valid feedback");
        assert_eq!(fb.run_id, "run-1");
        assert_eq!(fb.evaluation, Evaluation::Up);
        assert_eq!(fb.reason, "");
    }

    #[test]
    fn submitted_feedback_blocks_further_submits() {
        let mut state = FeedbackState::default();
        assert!(state.begin());
        // A second submit while one is in flight is refused.
        assert!(!state.begin());

        state.complete("Gracias por tu evaluación".to_string());
        assert!(!state.can_submit());
        assert!(!state.begin());
        assert_eq!(
            state,
            FeedbackState::Submitted("Gracias por tu evaluación".to_string())
        );
    }

    #[test]
    fn failed_feedback_can_be_retried() {
        let mut state = FeedbackState::default();
        assert!(state.begin());
        state.fail("sin conexión".to_string());
        assert!(state.can_submit());
        assert!(state.begin());
        assert!(state.is_submitting());
    }

    #[test]
    fn feedback_serializes_backend_field_names() {
        let fb = ThumbFeedback::new(Some("run-1"), Evaluation::Up, "").unwrap();
        let json = serde_json::to_value(&fb).unwrap();
        assert_eq!(json["run_id"], "run-1");
        assert_eq!(json["evaluation"], "up");
        assert_eq!(json["reason"], "");
    }

    #[test]
    fn parses_plain_content() {
        let events = collect(&["Hola, ", "¿en qué puedo ayudarte?"]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("Hola, ".to_string()),
                StreamEvent::Content("¿en qué puedo ayudarte?".to_string()),
            ]
        );
    }

    #[test]
    fn parses_full_stream_with_markers() {
        let events = collect(&[
            "respuesta parcial",
            "\n[REF_POSTPROCESS]respuesta final [1](https://example.com/doc)",
            "\n[RUN_ID]urn:uuid:abc-123",
        ]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("respuesta parcial".to_string()),
                StreamEvent::PostProcessed(
                    "respuesta final [1](https://example.com/doc)".to_string()
                ),
                StreamEvent::RunId("urn:uuid:abc-123".to_string()),
            ]
        );
    }

    #[test]
    fn marker_split_across_chunks_is_held_back() {
        let mut parser = MarkerParser::new();

        let events = parser.feed("respuesta\n[RUN");
        assert_eq!(events, vec![StreamEvent::Content("respuesta".to_string())]);

        let mut events = parser.feed("_ID]abc");
        events.extend(parser.finish());
        assert_eq!(events, vec![StreamEvent::RunId("abc".to_string())]);
    }

    #[test]
    fn newline_without_marker_is_flushed() {
        let events = collect(&["línea uno\nlínea dos"]);
        assert_eq!(
            events,
            vec![StreamEvent::Content("línea uno\nlínea dos".to_string())]
        );
    }

    #[test]
    fn error_marker_routes_to_error() {
        let events = collect(&["algo de texto", "\n[ERROR] se cayó la cadena"]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("algo de texto".to_string()),
                StreamEvent::Error("se cayó la cadena".to_string()),
            ]
        );
    }

    #[test]
    fn postprocessed_text_may_contain_newlines() {
        let events = collect(&[
            "x\n[REF_POSTPROCESS]uno\ndos\ntres",
            "\n[RUN_ID]r1",
        ]);
        assert_eq!(
            events,
            vec![
                StreamEvent::Content("x".to_string()),
                StreamEvent::PostProcessed("uno\ndos\ntres".to_string()),
                StreamEvent::RunId("r1".to_string()),
            ]
        );
    }

    #[test]
    fn erase_before_first_chunk_cancels_pending_work() {
        use crate::utils::Transcript;
        use futures::future::{AbortHandle, Abortable};
        use std::cell::RefCell;
        use std::rc::Rc;

        let transcript = Rc::new(RefCell::new(Transcript::new("Hola")));
        transcript.borrow_mut().push_user("pregunta");

        let (handle, registration) = AbortHandle::new_pair();
        let task = {
            let transcript = transcript.clone();
            Abortable::new(
                async move {
                    // Stands in for the pre-check and connect awaits that
                    // run before any answer bytes exist.
                    futures::future::pending::<()>().await;
                    transcript.borrow_mut().push_assistant("tarde", None);
                },
                registration,
            )
        };

        // The user erases the turn while nothing has streamed yet.
        handle.abort();
        assert!(transcript.borrow_mut().erase_last_turn());

        assert!(futures::executor::block_on(task).is_err());
        // No orphan assistant message appears after the fact.
        assert_eq!(transcript.borrow().messages().len(), 1);
        assert!(transcript.borrow().messages()[0].is_welcome);
    }

    #[test]
    fn options_wrapper_parses() {
        let json = r#"{"questions": ["¿Qué es OSMA?", "¿Cómo pido vacaciones?"]}"#;
        let wrapper: OptionsWrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.questions.len(), 2);
    }

    #[test]
    fn feedback_reply_parses() {
        let json = r#"{"message": "Feedback registered."}"#;
        let reply: FeedbackReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.message, "Feedback registered.");
    }
}

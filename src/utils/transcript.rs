use crate::utils::{Message, Sender};
use uuid::Uuid;

/// State behind the scrolling message list. Components hold this in a
/// signal; every mutation goes through a method here so the erase/hide
/// semantics stay in one place.
#[derive(Clone, PartialEq, Debug)]
pub struct Transcript {
    messages: Vec<Message>,
    intro_visible: bool,
}

impl Transcript {
    /// Seed the transcript with the assistant welcome message.
    pub fn new(welcome: impl Into<String>) -> Self {
        let mut greeting = Message::assistant(welcome, None);
        greeting.is_welcome = true;
        Self {
            messages: vec![greeting],
            intro_visible: true,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn intro_visible(&self) -> bool {
        self.intro_visible
    }

    /// Hide the welcome/options UI once the conversation starts. Idempotent.
    pub fn hide_intro(&mut self) {
        self.intro_visible = false;
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> Uuid {
        let message = Message::user(content);
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        run_id: Option<String>,
    ) -> Uuid {
        let message = Message::assistant(content, run_id);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Append streamed text to a message in place.
    pub fn append_to(&mut self, id: Uuid, chunk: &str) {
        if let Some(message) = self.find_mut(id) {
            message.content.push_str(chunk);
        }
    }

    /// Replace a message's content wholesale (post-processed answer).
    pub fn replace_content(&mut self, id: Uuid, content: String) {
        if let Some(message) = self.find_mut(id) {
            message.content = content;
        }
    }

    pub fn set_run_id(&mut self, id: Uuid, run_id: String) {
        if let Some(message) = self.find_mut(id) {
            message.run_id = Some(run_id);
        }
    }

    /// Remove the most recent user+assistant pair. The welcome message is
    /// never removed. Returns false when there is no user turn to erase.
    pub fn erase_last_turn(&mut self) -> bool {
        let Some(last_user) = self.messages.iter().rposition(Message::is_user) else {
            return false;
        };

        // Drop the assistant reply that follows the user turn, if any.
        if self
            .messages
            .get(last_user + 1)
            .map(|m| m.sender == Sender::Assistant)
            .unwrap_or(false)
        {
            self.messages.remove(last_user + 1);
        }
        self.messages.remove(last_user);
        true
    }

    fn find_mut(&mut self, id: Uuid) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn_counts(transcript: &Transcript) -> (usize, usize) {
        let users = transcript.messages().iter().filter(|m| m.is_user()).count();
        let assistants = transcript
            .messages()
            .iter()
            .filter(|m| !m.is_user() && !m.is_welcome)
            .count();
        (users, assistants)
    }

    #[test]
    fn new_transcript_has_welcome_only() {
        let transcript = Transcript::new("Hola");
        assert_eq!(transcript.messages().len(), 1);
        assert!(transcript.messages()[0].is_welcome);
        assert!(transcript.intro_visible());
    }

    #[test]
    fn erase_removes_exactly_one_pair() {
        let mut transcript = Transcript::new("Hola");
        for i in 0..3 {
            transcript.push_user(format!("pregunta {}", i));
            transcript.push_assistant(format!("respuesta {}", i), None);
        }
        assert_eq!(turn_counts(&transcript), (3, 3));

        assert!(transcript.erase_last_turn());
        assert_eq!(turn_counts(&transcript), (2, 2));
        // The remaining turns are the oldest ones.
        assert_eq!(transcript.messages().last().unwrap().content, "respuesta 1");
    }

    #[test]
    fn erase_without_user_turn_is_noop() {
        let mut transcript = Transcript::new("Hola");
        assert!(!transcript.erase_last_turn());
        assert_eq!(transcript.messages().len(), 1);
    }

    #[test]
    fn erase_handles_pending_assistant_reply() {
        // Stream aborted before any assistant message was appended.
        let mut transcript = Transcript::new("Hola");
        transcript.push_user("pregunta");
        assert!(transcript.erase_last_turn());
        assert_eq!(turn_counts(&transcript), (0, 0));
        assert_eq!(transcript.messages().len(), 1);
    }

    #[test]
    fn hide_intro_is_idempotent() {
        let mut transcript = Transcript::new("Hola");
        transcript.hide_intro();
        let after_first = transcript.clone();
        transcript.hide_intro();
        assert_eq!(transcript, after_first);
        assert!(!transcript.intro_visible());
    }

    #[test]
    fn streamed_content_mutations() {
        let mut transcript = Transcript::new("Hola");
        transcript.push_user("pregunta");
        let id = transcript.push_assistant("", None);

        transcript.append_to(id, "Primera ");
        transcript.append_to(id, "parte");
        assert_eq!(transcript.messages().last().unwrap().content, "Primera parte");

        transcript.replace_content(id, "Respuesta final".to_string());
        transcript.set_run_id(id, "run-123".to_string());
        let last = transcript.messages().last().unwrap();
        assert_eq!(last.content, "Respuesta final");
        assert_eq!(last.run_id.as_deref(), Some("run-123"));
    }
}

use uuid::Uuid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub content: String,
    /// Backend-assigned identifier correlating feedback with this turn.
    /// Only assistant turns with a completed streamed response carry one.
    pub run_id: Option<String>,
    /// The seeded greeting; never removed by erase-last-turn.
    pub is_welcome: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            content: content.into(),
            run_id: None,
            is_welcome: false,
        }
    }

    pub fn assistant(content: impl Into<String>, run_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Assistant,
            content: content.into(),
            run_id,
            is_welcome: false,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

mod backend;
mod config;
mod formatting;
mod transcript;
mod types;

pub use backend::{BackendClient, Evaluation, FeedbackState, StreamEvent, ThumbFeedback};
pub use config::Settings;
pub use formatting::{parse_message_content, ContentSegment};
pub use transcript::Transcript;
pub use types::{Message, Sender};

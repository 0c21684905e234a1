mod common;
mod feedback;
mod header;
mod options;
mod transcript;

pub use common::ChatInput;
pub use header::Header;
pub use transcript::{typeset_math, ChatTranscript};

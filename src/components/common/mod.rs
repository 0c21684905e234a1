mod input;
mod modal;
mod typewriter;
mod typing_indicator;

pub use input::ChatInput;
pub use modal::Modal;
pub use typewriter::Typewriter;
pub use typing_indicator::TypingIndicator;

use crate::components::common::{TypingIndicator, Typewriter};
use crate::components::feedback::FeedbackWidget;
use crate::components::options::RecommendedQuestions;
use crate::utils::{parse_message_content, BackendClient, ContentSegment, Transcript};
use dioxus::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// Smooth-scroll the transcript container to its bottom. Best-effort: a
/// missing container is silently tolerated.
pub fn scroll_to_bottom() {
    let _ = document::eval(
        r#"var el = document.getElementById('chat-box');
           if (el) { el.scrollTo({ top: el.scrollHeight, behavior: 'smooth' }); }"#,
    );
}

/// Re-typeset math in the transcript if the page ships a typesetter.
pub fn typeset_math() {
    let _ = document::eval(
        r#"if (window.MathJax && window.MathJax.typesetPromise) {
               window.MathJax.typesetPromise();
           }"#,
    );
}

#[component]
pub fn FormattedText(content: String) -> Element {
    let segments = parse_message_content(&content);

    rsx! {
        div {
            class: "whitespace-pre-wrap break-words",

            for segment in segments {
                match segment {
                    ContentSegment::Text(text) => rsx! {
                        span { "{text}" }
                    },
                    ContentSegment::InlineCode(code) => rsx! {
                        code {
                            class: "px-2 py-1 rounded bg-[var(--color-base-300)] text-[var(--color-base-content)] font-mono text-sm",
                            "{code}"
                        }
                    },
                    ContentSegment::Link { text, url } => rsx! {
                        a {
                            href: "{url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            class: "text-[var(--color-primary)] hover:underline",
                            "{text}"
                        }
                    },
                    ContentSegment::CodeBlock { language, code } => rsx! {
                        div {
                            class: "rounded-lg overflow-hidden my-4",
                            if !language.is_empty() {
                                div {
                                    class: "bg-[var(--color-base-300)] px-4 py-2 text-xs font-semibold text-[var(--color-base-content)]/70",
                                    "{language}"
                                }
                            }
                            pre {
                                class: "bg-[var(--color-base-300)] text-[var(--color-base-content)] p-4 overflow-x-auto m-0",
                                code {
                                    class: "font-mono text-xs sm:text-sm leading-relaxed",
                                    "{code}"
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
pub fn ChatTranscript(
    transcript: Signal<Transcript>,
    client: Arc<BackendClient>,
    questions: ReadSignal<Vec<String>>,
    streaming_id: ReadSignal<Option<Uuid>>,
    awaiting_reply: ReadSignal<bool>,
    on_select_question: EventHandler<String>,
) -> Element {
    // Keep the newest turn in view after every mutation, streamed chunks
    // included.
    use_effect(move || {
        let _ = transcript
            .read()
            .messages()
            .last()
            .map(|m| m.content.len());
        let _ = awaiting_reply.read();
        scroll_to_bottom();
    });

    let welcome_done = move |_| {
        typeset_math();
        scroll_to_bottom();
    };

    rsx! {
        div {
            id: "chat-box",
            class: "flex-1 min-h-0 overflow-y-auto px-3 sm:px-4 md:px-6 py-4 sm:py-6",

            div {
                class: "space-y-4 max-w-4xl mx-auto",

                for message in transcript.read().messages().iter() {
                    {
                        let is_streaming_turn = *streaming_id.read() == Some(message.id);

                        rsx! {
                            div {
                                key: "{message.id}",

                                if message.is_user() {
                                    div {
                                        class: "flex justify-end",
                                        div {
                                            class: "max-w-[85%] bg-[var(--color-primary)] text-[var(--color-primary-content)] px-4 py-3 rounded-lg rounded-tr-none text-sm sm:text-base user-message",
                                            FormattedText {
                                                content: message.content.clone(),
                                            }
                                        }
                                    }
                                } else {
                                    div {
                                        class: "flex justify-start",
                                        div {
                                            class: "max-w-[85%] bg-[var(--color-base-200)] text-[var(--color-base-content)] px-4 py-3 rounded-lg rounded-tl-none text-sm sm:text-base assistant-message",
                                            "data-run-id": message.run_id.clone().unwrap_or_default(),

                                            if message.is_welcome {
                                                Typewriter {
                                                    text: message.content.clone(),
                                                    on_done: welcome_done,
                                                }
                                            } else if is_streaming_turn {
                                                // Raw chunks while streaming; the
                                                // post-processed replacement gets the
                                                // full markup treatment.
                                                div {
                                                    class: "whitespace-pre-wrap break-words",
                                                    "{message.content}"
                                                }
                                            } else {
                                                FormattedText {
                                                    content: message.content.clone(),
                                                }
                                                FeedbackWidget {
                                                    client: client.clone(),
                                                    run_id: message.run_id.clone(),
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                TypingIndicator {
                    visible: *awaiting_reply.read(),
                }

                if transcript.read().intro_visible() {
                    RecommendedQuestions {
                        questions: questions.read().clone(),
                        on_select: move |question| on_select_question.call(question),
                    }
                }
            }
        }
    }
}

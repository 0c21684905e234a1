use dioxus::prelude::*;

/// Per-tenant suggested prompts shown alongside the welcome message.
/// Clicking one sends it as a user message.
#[component]
pub fn RecommendedQuestions(questions: Vec<String>, on_select: EventHandler<String>) -> Element {
    if questions.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "grid grid-cols-1 md:grid-cols-2 gap-3 max-w-3xl mx-auto my-6",

            for question in questions {
                {
                    let text = question.clone();
                    rsx! {
                        button {
                            key: "{question}",
                            onclick: move |_| on_select.call(text.clone()),
                            class: "p-4 rounded-lg bg-[var(--color-base-200)] border-2 border-[var(--color-base-300)] hover:border-[var(--color-primary)] transition-all duration-200 text-left",

                            p {
                                class: "text-sm text-[var(--color-base-content)]",
                                "{question}"
                            }
                        }
                    }
                }
            }
        }
    }
}

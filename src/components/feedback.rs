use crate::components::common::Modal;
use crate::utils::{BackendClient, Evaluation, FeedbackState, ThumbFeedback};
use dioxus::prelude::*;
use std::sync::Arc;

/// Thumbs-up/down controls rendered under an assistant turn. All modal and
/// submission state lives in this instance, so several widgets can coexist
/// in the transcript without stepping on each other.
#[component]
pub fn FeedbackWidget(client: Arc<BackendClient>, run_id: Option<String>) -> Element {
    let mut modal_open = use_signal(|| false);
    let mut reason = use_signal(String::new);
    let mut state = use_signal(FeedbackState::default);

    let submit = {
        let client = client.clone();
        let run_id = run_id.clone();
        move |evaluation: Evaluation, reason_text: String| {
            // Client-side validation: no network call without a run id, or
            // for a down-vote without a written reason.
            let feedback = match ThumbFeedback::new(run_id.as_deref(), evaluation, &reason_text) {
                Ok(feedback) => feedback,
                Err(e) => {
                    eprintln!("Feedback not sent: {}", e);
                    return;
                }
            };

            if !state.write().begin() {
                return;
            }

            let client = client.clone();
            spawn(async move {
                match client.send_thumb_feedback(&feedback).await {
                    Ok(reply) => {
                        state.write().complete(reply.message);
                        modal_open.set(false);
                        reason.set(String::new());
                    }
                    Err(e) => {
                        eprintln!("Failed to send feedback: {}", e);
                        state.write().fail(
                            "No se pudo enviar tu evaluación. Inténtalo de nuevo.".to_string(),
                        );
                    }
                }
            });
        }
    };
    let mut submit_up = submit.clone();
    let mut submit_down = submit;

    let disabled = !state.read().can_submit();
    let submitting = state.read().is_submitting();
    let reason_is_blank = reason.read().trim().is_empty();

    rsx! {
        div {
            class: "mt-2 flex items-center gap-2",

            button {
                onclick: move |_| submit_up(Evaluation::Up, String::new()),
                disabled,
                title: "Respuesta útil",
                class: "px-2 py-1 rounded hover:bg-[var(--color-base-300)] transition-colors disabled:opacity-50 disabled:cursor-not-allowed",
                "👍"
            }

            button {
                onclick: move |_| modal_open.set(true),
                disabled,
                title: "Respuesta incorrecta o incompleta",
                class: "px-2 py-1 rounded hover:bg-[var(--color-base-300)] transition-colors disabled:opacity-50 disabled:cursor-not-allowed",
                "👎"
            }

            if let FeedbackState::Submitted(message) = state.read().clone() {
                span {
                    class: "text-xs text-[var(--color-base-content)]/70",
                    "{message}"
                }
            }

            if let FeedbackState::Failed(message) = state.read().clone() {
                span {
                    role: "alert",
                    class: "text-xs text-red-500",
                    "{message}"
                }
            }

            Modal {
                open: modal_open,
                on_close: move |_| modal_open.set(false),

                div {
                    id: "thumbs-down-modal",
                    class: "p-6",

                    div {
                        class: "flex items-start justify-between mb-4",
                        h2 {
                            class: "text-lg font-bold text-[var(--color-base-content)]",
                            "¿Qué salió mal?"
                        }
                        button {
                            class: "text-2xl text-[var(--color-base-content)]/70 hover:text-[var(--color-base-content)] transition-colors",
                            onclick: move |_| modal_open.set(false),
                            "×"
                        }
                    }

                    textarea {
                        value: "{reason}",
                        oninput: move |evt| reason.set(evt.value()),
                        rows: "4",
                        placeholder: "Cuéntanos por qué la respuesta no fue útil...",
                        class: "w-full p-3 border-2 rounded-lg text-sm bg-[var(--color-base-100)] text-[var(--color-base-content)] border-[var(--color-base-300)] focus:outline-none focus:ring-2 focus:ring-[var(--color-primary)] focus:border-transparent resize-y",
                        autofocus: true,
                    }

                    div {
                        class: "flex justify-end gap-2 mt-4",
                        button {
                            onclick: move |_| modal_open.set(false),
                            class: "px-4 py-2 text-sm rounded border border-[var(--color-base-300)] bg-[var(--color-base-200)] text-[var(--color-base-content)] hover:bg-[var(--color-base-300)] transition-colors",
                            "Cancelar"
                        }
                        button {
                            onclick: move |_| {
                                let reason_text = reason.read().clone();
                                submit_down(Evaluation::Down, reason_text);
                            },
                            disabled: reason_is_blank || submitting,
                            class: "px-4 py-2 text-sm rounded bg-[var(--color-primary)] text-[var(--color-primary-content)] hover:bg-[var(--color-primary)]/90 transition-colors font-medium disabled:opacity-50 disabled:cursor-not-allowed",
                            if submitting { "Enviando..." } else { "Enviar" }
                        }
                    }
                }
            }
        }
    }
}

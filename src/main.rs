use dioxus::prelude::*;

mod components;
mod utils;

use components::{typeset_math, ChatInput, ChatTranscript, Header};
use futures::future::{AbortHandle, Abortable};
use futures::StreamExt;
use std::sync::Arc;
use utils::{BackendClient, Settings, StreamEvent, Transcript};
use uuid::Uuid;

const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

fn main() {
    // Seed a settings file on first run so deployments have one to edit.
    if let Ok(path) = Settings::settings_path() {
        if !path.exists() {
            if let Err(e) = Settings::default().save() {
                eprintln!("Failed to write default settings: {}", e);
            }
        }
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Load settings from disk on startup
    let app_settings = use_signal(|| {
        Settings::load().unwrap_or_else(|e| {
            eprintln!("Failed to load settings: {}", e);
            Settings::default()
        })
    });

    let client = use_signal(|| {
        let settings = app_settings.read();
        match BackendClient::new(settings.backend_url.clone(), settings.tenant.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                eprintln!("Failed to create backend client: {}", e);
                None
            }
        }
    });

    let mut transcript = use_signal(|| Transcript::new(app_settings.read().welcome_message()));

    // OSMA data-exploration session toggle, passed explicitly to whoever
    // needs it instead of living on the page as a global.
    let osma_session = use_signal(|| false);

    let mut is_streaming = use_signal(|| false);
    let mut awaiting_reply = use_signal(|| false);
    let mut streaming_id = use_signal(|| None::<Uuid>);
    let mut abort_handle = use_signal(|| None::<AbortHandle>);

    // Recommended questions for this tenant. A failed fetch just means no
    // suggestion cards.
    let mut questions = use_signal(Vec::<String>::new);
    let _options_loader = use_resource(move || {
        let client = client.read().clone();
        async move {
            if let Some(client) = client {
                match client.fetch_recommended_questions().await {
                    Ok(list) => questions.set(list),
                    Err(e) => eprintln!("Failed to load recommended questions: {}", e),
                }
            }
        }
    });

    // Handler for sending a message and streaming the assistant answer
    let send_message = move |text: String| {
        let text = text.trim().to_string();
        if text.is_empty() || *is_streaming.read() {
            return;
        }
        let Some(client) = client.read().clone() else {
            return;
        };
        let osma = *osma_session.read();

        transcript.write().hide_intro();
        transcript.write().push_user(text.clone());
        is_streaming.set(true);
        awaiting_reply.set(true);

        // The handle must exist before the first await so an erase issued
        // during the pre-check or connect still cancels the whole turn.
        let (handle, registration) = AbortHandle::new_pair();
        abort_handle.set(Some(handle));

        let turn = async move {
            // Let the backend classify and cache the retrieval decision for
            // this exact message before the stream starts.
            if let Err(e) = client.check_rag(&text).await {
                eprintln!("Retrieval pre-check failed: {}", e);
            }

            match client.stream_chat(text, osma).await {
                Ok(mut stream) => {
                    let mut assistant_id = None::<Uuid>;

                    while let Some(event) = stream.next().await {
                        match event {
                            StreamEvent::Content(chunk) => {
                                let id = match assistant_id {
                                    Some(id) => id,
                                    None => {
                                        awaiting_reply.set(false);
                                        let id = transcript.write().push_assistant("", None);
                                        streaming_id.set(Some(id));
                                        assistant_id = Some(id);
                                        id
                                    }
                                };
                                transcript.write().append_to(id, &chunk);
                            }
                            StreamEvent::PostProcessed(text) => {
                                match assistant_id {
                                    Some(id) => transcript.write().replace_content(id, text),
                                    None => {
                                        awaiting_reply.set(false);
                                        let id = transcript.write().push_assistant(text, None);
                                        streaming_id.set(Some(id));
                                        assistant_id = Some(id);
                                    }
                                }
                                typeset_math();
                            }
                            StreamEvent::RunId(run_id) => {
                                if let Some(id) = assistant_id {
                                    transcript.write().set_run_id(id, run_id);
                                }
                            }
                            StreamEvent::Error(e) => {
                                eprintln!("Chat stream error: {}", e);
                                let note =
                                    format!("Lo siento, ocurrió un error al responder: {}", e);
                                match assistant_id {
                                    Some(id) => transcript.write().replace_content(id, note),
                                    None => {
                                        awaiting_reply.set(false);
                                        let id = transcript.write().push_assistant(note, None);
                                        assistant_id = Some(id);
                                    }
                                }
                            }
                            StreamEvent::Done => break,
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Failed to start chat stream: {}", e);
                    awaiting_reply.set(false);
                    transcript.write().push_assistant(
                        format!("Lo siento, no pude contactar al servidor: {}", e),
                        None,
                    );
                }
            }

            streaming_id.set(None);
            abort_handle.set(None);
            awaiting_reply.set(false);
            is_streaming.set(false);
        };

        spawn(async move {
            // On abort the erase handler has already reset the signals, and
            // the turn's own cleanup must not run: it would clobber the
            // state of a newer turn.
            let _ = Abortable::new(turn, registration).await;
        });
    };

    // Handler for erase-and-stop: cancel the in-flight stream and drop the
    // most recent user+assistant pair.
    let erase_last_turn = move |_| {
        if let Some(handle) = abort_handle.write().take() {
            handle.abort();
        }
        transcript.write().erase_last_turn();
        streaming_id.set(None);
        awaiting_reply.set(false);
        is_streaming.set(false);
    };

    let company = app_settings.read().company.clone();
    let osma_enabled = app_settings.read().osma_enabled;
    let client_value = client.read().clone();
    let can_erase = transcript.read().messages().iter().any(|m| m.is_user());

    rsx! {
        document::Link { rel: "stylesheet", href: TAILWIND_CSS }

        div {
            class: "flex flex-col h-screen overflow-hidden bg-[var(--color-base-100)] text-[var(--color-base-content)]",

            Header {
                company,
                osma_enabled,
                osma_session,
            }

            if let Some(client_arc) = client_value {
                ChatTranscript {
                    transcript,
                    client: client_arc,
                    questions,
                    streaming_id,
                    awaiting_reply,
                    on_select_question: send_message,
                }

                if can_erase {
                    div {
                        class: "max-w-4xl mx-auto w-full px-3 sm:px-4 md:px-6 pb-1 flex justify-end",
                        button {
                            onclick: erase_last_turn,
                            class: "text-xs text-[var(--color-base-content)]/60 hover:text-[var(--color-base-content)] hover:underline transition-colors",
                            if *is_streaming.read() {
                                "Detener y borrar"
                            } else {
                                "Borrar última pregunta"
                            }
                        }
                    }
                }

                ChatInput {
                    disabled: *is_streaming.read(),
                    on_send: send_message,
                }
            } else {
                div {
                    class: "flex items-center justify-center h-full",
                    p {
                        class: "text-[var(--color-base-content)]/70",
                        "El asistente no está disponible en este momento."
                    }
                }
            }
        }
    }
}

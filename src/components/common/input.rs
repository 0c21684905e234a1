use dioxus::prelude::*;

#[component]
pub fn ChatInput(disabled: bool, on_send: EventHandler<String>) -> Element {
    let mut input_text = use_signal(String::new);

    let handle_keydown = move |evt: KeyboardEvent| {
        let text = input_text.read().clone();

        // Enter sends, Shift+Enter inserts a newline.
        if evt.key() == Key::Enter
            && !evt.modifiers().contains(Modifiers::SHIFT)
            && !text.trim().is_empty()
            && !disabled
        {
            evt.prevent_default();
            on_send.call(text);
            input_text.set(String::new());
        }
    };

    let submit_message = move |_: MouseEvent| {
        let text = input_text.read().clone();
        if !text.trim().is_empty() && !disabled {
            on_send.call(text);
            input_text.set(String::new());
        }
    };

    let has_content = !input_text.read().trim().is_empty();

    rsx! {
        div {
            class: "relative w-full bg-[var(--color-base-200)] border-[var(--color-base-300)] border-t shadow-lg",

            div {
                class: "max-w-4xl mx-auto px-3 sm:px-4 md:px-6 py-3",

                div {
                    class: "relative",

                    textarea {
                        value: "{input_text}",
                        oninput: move |evt| input_text.set(evt.value().clone()),
                        onkeydown: handle_keydown,
                        placeholder: "Escribe tu pregunta... (Enter para enviar)",
                        class: "w-full px-4 pr-16 py-3 rounded-xl bg-[var(--color-base-100)] text-[var(--color-base-content)] border-[var(--color-base-300)] border-2 focus:outline-none focus:ring-2 focus:ring-[var(--color-primary)] focus:border-transparent transition-all duration-200 text-sm sm:text-base shadow-sm resize-none h-16 sm:h-20",
                        autofocus: true,
                    }

                    button {
                        onclick: submit_message,
                        disabled: !has_content || disabled,
                        class: "absolute right-3 bottom-3 p-2 rounded-lg transition-all duration-200 text-sm font-medium disabled:opacity-50 disabled:cursor-not-allowed",
                        class: if has_content && !disabled {
                            "bg-[var(--color-primary)] text-[var(--color-primary-content)] hover:bg-[var(--color-primary)]/90 shadow-sm"
                        } else {
                            "bg-[var(--color-base-300)] text-[var(--color-base-content)]/50 cursor-not-allowed"
                        },
                        span { "➤" }
                    }
                }
            }
        }
    }
}

use dioxus::prelude::*;

/// Three pulsing dots shown while the assistant has not produced its first
/// chunk yet.
#[component]
pub fn TypingIndicator(visible: bool) -> Element {
    if !visible {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "flex items-center gap-1 px-4 py-3 rounded-lg rounded-tl-none bg-[var(--color-base-200)] w-fit",
            div {
                class: "w-2 h-2 bg-[var(--color-primary)] rounded-full animate-pulse"
            }
            div {
                class: "w-2 h-2 bg-[var(--color-primary)] rounded-full animate-pulse"
            }
            div {
                class: "w-2 h-2 bg-[var(--color-primary)] rounded-full animate-pulse"
            }
        }
    }
}

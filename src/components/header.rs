use dioxus::prelude::*;

#[component]
pub fn Header(company: String, osma_enabled: bool, osma_session: Signal<bool>) -> Element {
    let osma_active = *osma_session.read();

    rsx! {
        header {
            class: "sticky top-0 z-30 bg-[var(--color-base-200)] border-b border-[var(--color-base-300)]",

            div {
                class: "px-4 sm:px-6 lg:px-8",

                div {
                    class: "flex items-center justify-between h-16",

                    // Left side - company branding
                    div {
                        class: "flex items-center gap-2",
                        span {
                            class: "text-xl font-bold text-[var(--color-base-content)]",
                            "{company}"
                        }
                        span {
                            class: "text-sm text-[var(--color-base-content)]/60",
                            "Asistente virtual"
                        }
                    }

                    // Right side - OSMA data-exploration switch
                    if osma_enabled {
                        button {
                            id: "osma-toggle",
                            onclick: move |_| {
                                let current = *osma_session.read();
                                osma_session.set(!current);
                            },
                            title: "Modo de exploración de datos OSMA",
                            class: "flex items-center gap-2 px-3 py-1.5 rounded-lg text-sm font-medium border transition-all cursor-pointer",
                            class: if osma_active {
                                "bg-[var(--color-primary)] text-[var(--color-primary-content)] border-[var(--color-primary)]"
                            } else {
                                "bg-[var(--color-base-300)] text-[var(--color-base-content)] border-[var(--color-base-300)] hover:bg-[var(--color-base-300)]/80"
                            },

                            span { "OSMA" }
                            span {
                                class: "text-[10px] opacity-70",
                                if osma_active { "activado" } else { "desactivado" }
                            }
                        }
                    }
                }
            }
        }
    }
}

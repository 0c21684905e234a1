use dioxus::prelude::*;
use std::time::Duration;

/// Fixed delay between revealed characters.
pub const REVEAL_INTERVAL_MS: u64 = 18;

/// Character-by-character reveal state. One tick reveals one character, so
/// text of length L is fully visible after exactly L ticks.
#[derive(Clone, PartialEq, Debug)]
pub struct Reveal {
    chars: Vec<char>,
    shown: usize,
}

impl Reveal {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    pub fn tick(&mut self) {
        if self.shown < self.chars.len() {
            self.shown += 1;
        }
    }

    pub fn is_done(&self) -> bool {
        self.shown == self.chars.len()
    }

    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }
}

#[component]
pub fn Typewriter(text: String, on_done: EventHandler<()>) -> Element {
    let mut shown = use_signal(String::new);
    let mut started = use_signal(|| false);

    let text_for_task = text.clone();
    use_effect(move || {
        if *started.read() {
            return;
        }
        started.set(true);

        let text = text_for_task.clone();
        spawn(async move {
            let mut reveal = Reveal::new(&text);
            while !reveal.is_done() {
                tokio::time::sleep(Duration::from_millis(REVEAL_INTERVAL_MS)).await;
                reveal.tick();
                shown.set(reveal.visible());
            }
            on_done.call(());
        });
    });

    rsx! {
        span {
            class: "whitespace-pre-wrap",
            "{shown}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_after_length_ticks() {
        let text = "Hola, ¿qué tal?";
        let len = text.chars().count();
        let mut reveal = Reveal::new(text);

        for i in 0..len {
            assert!(!reveal.is_done(), "done too early at tick {}", i);
            reveal.tick();
        }
        assert!(reveal.is_done());
        assert_eq!(reveal.visible(), text);
    }

    #[test]
    fn extra_ticks_do_not_change_content() {
        let mut reveal = Reveal::new("ab");
        for _ in 0..10 {
            reveal.tick();
        }
        assert_eq!(reveal.visible(), "ab");
        assert!(reveal.is_done());
    }

    #[test]
    fn empty_text_is_done_immediately() {
        let reveal = Reveal::new("");
        assert!(reveal.is_done());
        assert_eq!(reveal.visible(), "");
    }
}

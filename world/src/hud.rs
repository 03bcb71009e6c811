//! Single-slot timed HUD message.

use snow_day_core::HudMessage;

/// Holds at most one message; a new message always replaces the old one.
#[derive(Clone, Debug, Default)]
pub(crate) struct MessageBus {
    current: Option<HudMessage>,
}

impl MessageBus {
    pub(crate) fn set(&mut self, text: impl Into<String>, duration: u32) {
        self.current = (duration > 0).then(|| HudMessage {
            text: text.into(),
            remaining: duration,
        });
    }

    pub(crate) fn age(&mut self) {
        if let Some(message) = self.current.as_mut() {
            message.remaining = message.remaining.saturating_sub(1);
            if message.remaining == 0 {
                self.current = None;
            }
        }
    }

    pub(crate) fn current(&self) -> Option<&HudMessage> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_messages_overwrite_older_ones() {
        let mut bus = MessageBus::default();
        bus.set("first", 180);
        bus.age();
        bus.set("second", 5);
        let message = bus.current().expect("message is active");
        assert_eq!(message.text, "second");
        assert_eq!(message.remaining, 5);
    }

    #[test]
    fn messages_expire() {
        let mut bus = MessageBus::default();
        bus.set("brief", 2);
        bus.age();
        assert!(bus.current().is_some());
        bus.age();
        assert!(bus.current().is_none());
    }
}

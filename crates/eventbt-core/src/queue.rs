//! FIFO event queue and the sink handle components push onto.

use std::collections::VecDeque;

use crate::types::Event;

/// Write side of the event queue.
///
/// Components receive `&mut dyn EventSink` from the engine at call time;
/// only the engine reads the queue.
pub trait EventSink {
    fn push(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn push(&mut self, event: Event) {
        Vec::push(self, event);
    }
}

/// Single-threaded FIFO queue. No priorities, no reordering.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
    pushed: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total number of events ever pushed.
    pub fn total_pushed(&self) -> u64 {
        self.pushed
    }
}

impl EventSink for EventQueue {
    fn push(&mut self, event: Event) {
        self.pushed += 1;
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarketEvent, SignalEvent, SignalKind};
    use chrono::Utc;

    #[test]
    fn test_fifo_order() {
        let mut queue = EventQueue::new();
        let signal = SignalEvent::new(1, Utc::now(), "AAPL", SignalKind::Long, 100.0);

        queue.push(MarketEvent.into());
        queue.push(signal.clone().into());
        queue.push(MarketEvent.into());

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(Event::Market(MarketEvent)));
        assert_eq!(queue.pop(), Some(Event::Signal(signal)));
        assert_eq!(queue.pop(), Some(Event::Market(MarketEvent)));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.total_pushed(), 3);
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Event> = Vec::new();
        EventSink::push(&mut sink, MarketEvent.into());
        assert_eq!(sink.len(), 1);
    }
}

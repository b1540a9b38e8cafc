use std::collections::VecDeque;

/// Minimal event type for traceability.
///
/// Events are structured text tagged with a monotonically increasing sequence
/// number so a session can be recorded and compared after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:<4} {:<20} {}", self.seq, self.kind, self.message)
    }
}

/// Events retained by [`EventBus::new`].
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Bounded event trail: once `capacity` events are retained, each new event
/// evicts the oldest one.
#[derive(Debug)]
pub struct EventBus {
    next_seq: u64,
    capacity: usize,
    dropped: u64,
    events: VecDeque<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// `capacity` is clamped to at least one event.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            next_seq: 0,
            capacity,
            dropped: 0,
            events: VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY)),
        }
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Event {
            seq,
            kind,
            message: message.into(),
        });
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &Event> + DoubleEndedIterator + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted because the trail was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Number of recorded events of `kind` since the last drain.
    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.back()
    }

    /// Takes the retained events. Sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_with_sequence_numbers() {
        let mut bus = EventBus::new();
        bus.emit("test", "hello");
        bus.emit("test", "again");
        let seqs: Vec<u64> = bus.events().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(bus.count("test"), 2);
        assert_eq!(bus.count("other"), 0);
    }

    #[test]
    fn drain_clears_events_but_not_sequence() {
        let mut bus = EventBus::new();
        bus.emit("k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.is_empty());

        bus.emit("k", "n");
        assert_eq!(bus.last().map(|e| e.seq), Some(1));
    }

    #[test]
    fn display_includes_kind_and_message() {
        let mut bus = EventBus::new();
        bus.emit("fly_to", "(80.0, 12.8)");
        let line = bus.last().unwrap().to_string();
        assert!(line.contains("fly_to"));
        assert!(line.ends_with("(80.0, 12.8)"));
    }

    #[test]
    fn full_trail_evicts_oldest() {
        let mut bus = EventBus::with_capacity(3);
        for i in 0..10 {
            bus.emit("tick", i.to_string());
        }
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.dropped(), 7);
        let seqs: Vec<u64> = bus.events().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![7, 8, 9]);
        assert_eq!(bus.last().map(|e| e.message.as_str()), Some("9"));
    }

    #[test]
    fn zero_capacity_keeps_latest_event() {
        let mut bus = EventBus::with_capacity(0);
        bus.emit("a", "1");
        bus.emit("b", "2");
        assert_eq!(bus.capacity(), 1);
        assert_eq!(bus.count("a"), 0);
        assert_eq!(bus.count("b"), 1);
    }
}

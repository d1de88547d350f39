//! Delayed actions, fired from the frame tick instead of host timers.

/// A queue of actions waiting for a due time.
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    entries: Vec<Entry<A>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<A> {
    due_ms: f64,
    seq: u64,
    action: A,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due_ms, seq, action });
    }

    /// Remove and return every action due at or before `now_ms`,
    /// earliest first; ties keep scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<A> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due_ms <= now_ms {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.action).collect()
    }

    /// Drop pending actions that fail the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&A) -> bool) {
        self.entries.retain(|e| keep(&e.action));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_orders_by_due_then_insertion() {
        let mut timeline = Timeline::new();
        timeline.schedule(30.0, "c");
        timeline.schedule(10.0, "a");
        timeline.schedule(10.0, "b");
        timeline.schedule(99.0, "later");

        assert_eq!(timeline.drain_due(50.0), vec!["a", "b", "c"]);
        assert_eq!(timeline.len(), 1);
        assert!(timeline.drain_due(60.0).is_empty());
        assert_eq!(timeline.drain_due(99.0), vec!["later"]);
    }

    #[test]
    fn test_retain_filters_pending() {
        let mut timeline = Timeline::new();
        timeline.schedule(1.0, 1);
        timeline.schedule(2.0, 2);
        timeline.retain(|n| *n != 1);
        assert_eq!(timeline.drain_due(10.0), vec![2]);
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};

/// A simple counter that can be incremented atomically
#[derive(Debug)]
pub struct Counter {
    value: AtomicUsize,
}

impl Counter {
    /// Create a new counter with an initial value
    pub fn new(initial_value: usize) -> Self {
        Self {
            value: AtomicUsize::new(initial_value),
        }
    }

    /// Increment the counter by a specific amount
    pub fn increment(&self, amount: usize) {
        self.value.fetch_add(amount, Ordering::Relaxed);
    }

    /// Get the current value of the counter
    pub fn value(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Connection outcome counters shared by the listener and every worker
#[derive(Debug, Default)]
pub struct ServerMetrics {
    pub connections_accepted: Counter,
    pub responses_sent: Counter,
    pub malformed_requests: Counter,
    pub handler_failures: Counter,
    pub write_failures: Counter,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `name: value` line per counter
    pub fn format(&self) -> String {
        let counters = [
            ("connections_accepted", &self.connections_accepted),
            ("responses_sent", &self.responses_sent),
            ("malformed_requests", &self.malformed_requests),
            ("handler_failures", &self.handler_failures),
            ("write_failures", &self.write_failures),
        ];

        let mut result = String::new();
        for (name, counter) in counters {
            result.push_str(&format!("{}: {}\n", name, counter.value()));
        }
        result
    }
}

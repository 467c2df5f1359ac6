//! Monotonic request numbering for discarding stale responses.

/// Issues increasing sequence numbers; only the latest one is current.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next number, superseding every earlier one.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether a response tagged `seq` belongs to the latest request.
    pub fn is_current(&self, seq: u64) -> bool {
        seq != 0 && seq == self.latest
    }

    /// Supersede the in-flight request without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

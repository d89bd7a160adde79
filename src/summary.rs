/// Outcome counters for one batch. Only confirmed successes count as succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub succeeded: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl TransferSummary {
    pub fn attempted(&self) -> u32 {
        self.succeeded + self.failed
    }
}

use vliw_common::inst::{Instruction, MAX_LATENCY};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SchedulerConfig {
    /// The largest initiation interval the modulo scheduler tries. When unset
    /// it is derived from the loop body.
    pub max_ii: Option<usize>,
}

impl SchedulerConfig {
    pub fn new(max_ii: Option<usize>) -> Self {
        Self { max_ii }
    }

    /// The largest initiation interval to try for a loop body with the given
    /// lower bound. At this interval every instruction can issue in its own
    /// bundle after all of its inputs are ready.
    pub fn max_ii_for(&self, lower_bound: usize, body: &[Instruction]) -> usize {
        self.max_ii.unwrap_or_else(|| {
            let sequential: usize = body.iter().map(|inst| inst.latency() + 1).sum();
            lower_bound + sequential + 2 * MAX_LATENCY
        })
    }
}

//! Plan arena configuration.

/// Configuration for a [`PhysicalPlan`](crate::plan::PhysicalPlan) arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanConfig {
    /// Run the full invariant check after every mutation and optimizer pass
    /// (default: on in debug builds, off in release builds).
    pub verify_mutations: bool,
    /// Number of node slots reserved up front (default: 16).
    pub initial_capacity: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            verify_mutations: cfg!(debug_assertions),
            initial_capacity: 16,
        }
    }
}

impl PlanConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables post-mutation verification.
    pub fn verify_mutations(mut self, enabled: bool) -> Self {
        self.verify_mutations = enabled;
        self
    }

    /// Sets the number of slots reserved up front.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

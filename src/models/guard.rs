use std::collections::HashSet;

/// Per-entity mutual exclusion for mutations. An entity id is either Idle
/// or InFlight; a second mutation on an InFlight id is rejected outright,
/// never queued.
#[derive(Debug, Default)]
pub struct MutationGuard {
    in_flight: HashSet<String>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a mutation for `entity_id`. Returns false when one is already
    /// in flight; the caller must no-op.
    pub fn try_admit(&mut self, entity_id: &str) -> bool {
        self.in_flight.insert(entity_id.to_string())
    }

    /// Return `entity_id` to Idle. Called exactly once per admitted
    /// mutation, whatever the outcome was.
    pub fn release(&mut self, entity_id: &str) {
        self.in_flight.remove(entity_id);
    }

    pub fn is_in_flight(&self, entity_id: &str) -> bool {
        self.in_flight.contains(entity_id)
    }
}

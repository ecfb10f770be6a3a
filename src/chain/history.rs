use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One executed step, recorded for the transition audit trail.
///
/// `to` is `None` for the step that completed the chain at an end state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord<K> {
    pub step: u64,
    pub from: K,
    pub to: Option<K>,
    pub timestamp: DateTime<Utc>,
    pub duration_us: u64,
}

impl<K> TransitionRecord<K> {
    pub fn is_completion(&self) -> bool {
        self.to.is_none()
    }
}

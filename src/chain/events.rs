use crate::error::ChainError;

/// Structured notifications emitted by a chain as it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent<K> {
    Registered { state: K },
    Entered { state: K },
    Transitioned { from: K, to: K, step: u64 },
    Completed { state: K, steps: u64 },
    Reset,
    Failed { error: ChainError },
}

/// Callback hook for chain events. Observers only watch; they cannot
/// influence transitions.
pub trait ChainObserver<K>: Send {
    fn on_event(&self, event: &ChainEvent<K>);
}

impl<K, F> ChainObserver<K> for F
where
    F: Fn(&ChainEvent<K>) + Send,
{
    fn on_event(&self, event: &ChainEvent<K>) {
        self(event)
    }
}

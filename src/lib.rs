// chainstate - a minimal finite-state-machine engine
//
// Callers define discrete states (entry hook, action, next-state selector);
// a Chain sequences them through a shared Context until an end state is
// reached.

pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod state;
pub mod telemetry;

// Re-export key types for easy access
pub use chain::{Chain, ChainEvent, ChainObserver, TransitionRecord};
pub use crate::config::{ChainConfig, ChainstateConfig, ObservabilityConfig};
pub use context::Context;
pub use error::{ChainError, Result, TransitionError};
pub use state::{EndState, State, StateKind};
pub use telemetry::{create_chain_span, generate_run_id, init_telemetry};

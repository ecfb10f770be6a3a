// Chain Module - the state-transition engine
//
// The chain owns one instance per registered state kind, the shared context
// and the cursor, and drives the step/run/reset protocol.

mod engine;
pub mod events;
pub mod history;


pub use engine::Chain;
pub use events::{ChainEvent, ChainObserver};
pub use history::TransitionRecord;

// State abstractions - the capability interface each concrete state implements

use std::fmt::Debug;
use std::hash::Hash;

use crate::context::Context;

/// Identifier of a kind of state.
///
/// The chain's registry is keyed by kind, and `State::next_state` answers
/// with a kind rather than an instance. A fieldless enum is the usual choice:
///
/// ```
/// use chainstate::{Context, EndState, State, StateKind};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind {
///     Greeting,
///     Final,
/// }
///
/// struct Greeting;
///
/// impl State<Kind> for Greeting {
///     fn action(&mut self, ctx: &mut Context) {
///         ctx.insert("greeting_done", true);
///     }
///
///     fn next_state(&self, _ctx: &Context) -> Option<Kind> {
///         Some(Kind::Final)
///     }
/// }
///
/// impl StateKind for Kind {
///     fn create(self) -> Box<dyn State<Self>> {
///         match self {
///             Kind::Greeting => Box::new(Greeting),
///             Kind::Final => Box::new(EndState),
///         }
///     }
/// }
/// ```
pub trait StateKind: Copy + Eq + Hash + Debug + Send + 'static {
    /// Build the single instance the chain will own for this kind.
    fn create(self) -> Box<dyn State<Self>>;
}

/// Behaviour of one state. All hooks are invoked by the chain, never by
/// other states.
pub trait State<K>: Send {
    /// Called once, when the chain registers this state.
    fn on_register(&mut self, _ctx: &mut Context) {}

    /// Called every time the cursor moves onto this state, including the
    /// initial placement.
    fn on_enter(&mut self, _ctx: &mut Context) {}

    /// The work of this state; runs once per step while it is current.
    fn action(&mut self, _ctx: &mut Context) {}

    /// Kind to move to after `action`, or `None` for "no further state".
    ///
    /// `None` from a state that is not terminal is treated as a broken
    /// transition.
    fn next_state(&self, ctx: &Context) -> Option<K>;

    /// Terminal states complete the chain when they return `None`.
    fn is_terminal(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        // Generic arguments carry their own paths; drop them first.
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// Ready-made terminal state with no behaviour of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndState;

impl<K> State<K> for EndState {
    fn action(&mut self, _ctx: &mut Context) {
        tracing::debug!("EndState is an end state. No further transitions.");
    }

    fn next_state(&self, _ctx: &Context) -> Option<K> {
        None
    }

    fn is_terminal(&self) -> bool {
        true
    }
}

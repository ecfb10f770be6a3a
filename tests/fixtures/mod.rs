/// Shared states for chain integration tests
use chainstate::{Context, EndState, State, StateKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Greeting,
    Final,
    Broken,
    StateWithMissingNextState,
    MissingState,
}

pub struct GreetingState;

impl State<Kind> for GreetingState {
    fn action(&mut self, ctx: &mut Context) {
        tracing::info!("Hello! How can I assist you today?");
        ctx.insert("greeting_done", true);
    }

    fn next_state(&self, _ctx: &Context) -> Option<Kind> {
        Some(Kind::Final)
    }
}

pub struct FinalState;

impl State<Kind> for FinalState {
    fn action(&mut self, ctx: &mut Context) {
        tracing::info!("Thank you for using our service. Goodbye!");
        ctx.insert("farewell_done", true);
    }

    fn next_state(&self, _ctx: &Context) -> Option<Kind> {
        None
    }

    fn is_terminal(&self) -> bool {
        true
    }
}

/// Returns no further state without being an end state.
pub struct BrokenState;

impl State<Kind> for BrokenState {
    fn next_state(&self, _ctx: &Context) -> Option<Kind> {
        None
    }
}

/// Points at a kind that tests never register.
pub struct StateWithMissingNextState;

impl State<Kind> for StateWithMissingNextState {
    fn next_state(&self, _ctx: &Context) -> Option<Kind> {
        Some(Kind::MissingState)
    }
}

impl StateKind for Kind {
    fn create(self) -> Box<dyn State<Self>> {
        match self {
            Kind::Greeting => Box::new(GreetingState),
            Kind::Final => Box::new(FinalState),
            Kind::Broken => Box::new(BrokenState),
            Kind::StateWithMissingNextState => Box::new(StateWithMissingNextState),
            Kind::MissingState => Box::new(EndState),
        }
    }
}

/// `Greeting -> Final`, initial state not yet set.
pub fn greeting_chain() -> chainstate::Chain<Kind> {
    let mut chain = chainstate::Chain::new();
    chain.add_state(Kind::Greeting);
    chain.add_state(Kind::Final);
    chain
}

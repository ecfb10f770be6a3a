//! A branching conversation scripted as a chain.
//!
//! Run with `cargo run --example conversation -- Ada` (the name is optional).

use anyhow::Result;
use chainstate::{init_telemetry, Chain, ChainEvent, ChainstateConfig, Context, State, StateKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Turn {
    Greeting,
    AskName,
    Personal,
    Anonymous,
    Farewell,
}

struct Greeting;

impl State<Turn> for Greeting {
    fn action(&mut self, ctx: &mut Context) {
        println!("Hello! How can I assist you today?");
        ctx.insert("greeting_done", true);
    }

    fn next_state(&self, _ctx: &Context) -> Option<Turn> {
        Some(Turn::AskName)
    }
}

struct AskName;

impl State<Turn> for AskName {
    fn on_enter(&mut self, _ctx: &mut Context) {
        println!("May I have your name?");
    }

    fn next_state(&self, ctx: &Context) -> Option<Turn> {
        if ctx.contains_key("name") {
            Some(Turn::Personal)
        } else {
            Some(Turn::Anonymous)
        }
    }
}

struct Personal;

impl State<Turn> for Personal {
    fn action(&mut self, ctx: &mut Context) {
        let name: String = ctx
            .get_as("name")
            .ok()
            .flatten()
            .unwrap_or_else(|| "friend".to_string());
        println!("Nice to meet you, {name}.");
    }

    fn next_state(&self, _ctx: &Context) -> Option<Turn> {
        Some(Turn::Farewell)
    }
}

struct Anonymous;

impl State<Turn> for Anonymous {
    fn action(&mut self, _ctx: &mut Context) {
        println!("No problem, let's keep it anonymous.");
    }

    fn next_state(&self, _ctx: &Context) -> Option<Turn> {
        Some(Turn::Farewell)
    }
}

struct Farewell;

impl State<Turn> for Farewell {
    fn action(&mut self, _ctx: &mut Context) {
        println!("Thank you for using our service. Goodbye!");
    }

    fn next_state(&self, _ctx: &Context) -> Option<Turn> {
        None
    }

    fn is_terminal(&self) -> bool {
        true
    }
}

impl StateKind for Turn {
    fn create(self) -> Box<dyn State<Self>> {
        match self {
            Turn::Greeting => Box::new(Greeting),
            Turn::AskName => Box::new(AskName),
            Turn::Personal => Box::new(Personal),
            Turn::Anonymous => Box::new(Anonymous),
            Turn::Farewell => Box::new(Farewell),
        }
    }
}

fn main() -> Result<()> {
    ChainstateConfig::load_env_file()?;
    let config = ChainstateConfig::load()?;
    init_telemetry(&config.observability)?;

    let mut chain = Chain::with_config(config.chain);
    chain.subscribe(|event: &ChainEvent<Turn>| {
        if let ChainEvent::Transitioned { from, to, step } = event {
            tracing::debug!(?from, ?to, step, "turn taken");
        }
    });
    for turn in [
        Turn::Greeting,
        Turn::AskName,
        Turn::Personal,
        Turn::Anonymous,
        Turn::Farewell,
    ] {
        chain.add_state(turn);
    }

    if let Some(name) = std::env::args().nth(1) {
        chain.context_mut().insert("name", name);
    }

    chain.set_initial_state(Turn::Greeting)?;
    chain.run()?;

    let path: Vec<String> = chain
        .history()
        .iter()
        .map(|record| format!("{:?}", record.from))
        .collect();
    println!("Conversation path: {}", path.join(" -> "));

    Ok(())
}

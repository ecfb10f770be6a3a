use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::events::{ChainEvent, ChainObserver};
use super::history::TransitionRecord;
use crate::config::ChainConfig;
use crate::context::Context;
use crate::error::{ChainError, Result, TransitionError};
use crate::state::{State, StateKind};
use crate::telemetry::{create_chain_span, generate_run_id};

/// The state-transition engine.
///
/// Holds exactly one instance per registered kind, the shared `Context`
/// and the cursor. Lifecycle: unset -> active (`set_initial_state`) ->
/// completed (an end state returns no further state) -> unset (`reset`).
pub struct Chain<K: StateKind> {
    states: HashMap<K, Box<dyn State<K>>>,
    current_state: Option<K>,
    context: Context,
    completed: bool,
    config: ChainConfig,
    history: VecDeque<TransitionRecord<K>>,
    steps_taken: u64,
    run_id: String,
    observers: Vec<Box<dyn ChainObserver<K>>>,
}

impl<K: StateKind> std::fmt::Debug for Chain<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .field("current_state", &self.current_state)
            .field("context", &self.context)
            .field("completed", &self.completed)
            .field("config", &self.config)
            .field("history", &self.history.len())
            .field("steps_taken", &self.steps_taken)
            .field("run_id", &self.run_id)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<K: StateKind> Default for Chain<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateKind> Chain<K> {
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    pub fn with_config(config: ChainConfig) -> Self {
        Self {
            states: HashMap::new(),
            current_state: None,
            context: Context::new(),
            completed: false,
            config,
            history: VecDeque::new(),
            steps_taken: 0,
            run_id: generate_run_id(),
            observers: Vec::new(),
        }
    }

    /// Register an observer that receives every `ChainEvent`.
    pub fn subscribe(&mut self, observer: impl ChainObserver<K> + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Instantiate `kind` once and register it. Adding a kind again
    /// replaces the stored instance.
    pub fn add_state(&mut self, kind: K) {
        self.register(kind, kind.create());
    }

    /// Register an already-built instance under `kind`.
    pub fn add_state_instance<S>(&mut self, kind: K, state: S)
    where
        S: State<K> + 'static,
    {
        self.register(kind, Box::new(state));
    }

    fn register(&mut self, kind: K, mut state: Box<dyn State<K>>) {
        state.on_register(&mut self.context);
        info!(
            run_id = %self.run_id,
            state = ?kind,
            name = state.name(),
            terminal = state.is_terminal(),
            "State added to chain"
        );

        if self.states.insert(kind, state).is_some() {
            warn!(state = ?kind, "State re-added; previous instance replaced");
        }
        self.notify(&ChainEvent::Registered { state: kind });
    }

    /// Place the cursor on a registered kind and run its `on_enter`.
    pub fn set_initial_state(&mut self, kind: K) -> Result<()> {
        if !self.states.contains_key(&kind) {
            return Err(self.fail(ChainError::StateNotFound {
                kind: format!("{kind:?}"),
            }));
        }

        info!(run_id = %self.run_id, state = ?kind, "Initial state set");
        self.enter(kind);
        Ok(())
    }

    /// Execute one step: run the current state's action, then follow the
    /// transition it selects.
    ///
    /// Returns `Ok(true)` when the cursor moved and `Ok(false)` when an end
    /// state completed the chain.
    pub fn next(&mut self) -> Result<bool> {
        if self.completed {
            return Err(self.fail(ChainError::ChainCompleted));
        }

        let Some(kind) = self.current_state else {
            return Err(self.fail(ChainError::InitialStateNotSet));
        };

        let started = Instant::now();
        let step = self.steps_taken + 1;

        let Some(state) = self.states.get_mut(&kind) else {
            return Err(self.fail(ChainError::StateNotFound {
                kind: format!("{kind:?}"),
            }));
        };

        debug!(run_id = %self.run_id, step, state = ?kind, "Executing state action");
        state.action(&mut self.context);
        let target = state.next_state(&self.context);
        let terminal = state.is_terminal();

        match target {
            None if terminal => {
                self.completed = true;
                self.steps_taken = step;
                info!(
                    run_id = %self.run_id,
                    step,
                    state = ?kind,
                    "Reached an end state. No further transitions."
                );
                self.record(step, kind, None, started);
                self.notify(&ChainEvent::Completed { state: kind, steps: step });
                Ok(false)
            }
            None => Err(self.fail(
                TransitionError::UnexpectedEnd {
                    state: format!("{kind:?}"),
                }
                .into(),
            )),
            Some(target) if !self.states.contains_key(&target) => Err(self.fail(
                TransitionError::NotAdded {
                    from: format!("{kind:?}"),
                    target: format!("{target:?}"),
                }
                .into(),
            )),
            Some(target) => {
                info!(
                    run_id = %self.run_id,
                    step,
                    from = ?kind,
                    to = ?target,
                    "State transition"
                );
                self.steps_taken = step;
                self.enter(target);
                self.record(step, kind, Some(target), started);
                self.notify(&ChainEvent::Transitioned {
                    from: kind,
                    to: target,
                    step,
                });
                Ok(true)
            }
        }
    }

    /// Step until an end state completes the chain.
    ///
    /// Fails fast when the chain is already completed or has no initial
    /// state. A chain that becomes completed during the loop ends the run
    /// normally.
    pub fn run(&mut self) -> Result<()> {
        if self.completed {
            return Err(self.fail(ChainError::ChainCompleted));
        }

        let Some(initial) = self.current_state else {
            return Err(self.fail(ChainError::InitialStateNotSet));
        };

        let span = create_chain_span("run", &self.run_id, &format!("{initial:?}"));
        let _guard = span.enter();

        let mut steps = 0u64;
        loop {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    return Err(self.fail(ChainError::StepLimitExceeded { limit }));
                }
            }
            steps += 1;

            match self.next() {
                Ok(true) => {}
                Ok(false) => break,
                Err(ChainError::ChainCompleted) => {
                    debug!("Chain completed while running");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        info!(run_id = %self.run_id, steps, "Chain run finished");
        Ok(())
    }

    /// Return to the unset, not-completed state with an empty context.
    /// Registered instances are kept as they are.
    pub fn reset(&mut self) {
        self.current_state = None;
        self.completed = false;
        self.context.clear();
        self.history.clear();
        self.steps_taken = 0;

        let previous = std::mem::replace(&mut self.run_id, generate_run_id());
        info!(previous_run_id = %previous, run_id = %self.run_id, "Chain reset");
        self.notify(&ChainEvent::Reset);
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn current_state(&self) -> Option<K> {
        self.current_state
    }

    pub fn has_state(&self, kind: K) -> bool {
        self.states.contains_key(&kind)
    }

    pub fn registered_states(&self) -> Vec<K> {
        self.states.keys().copied().collect()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Host-side access, e.g. to seed inputs before a run.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn history(&self) -> &VecDeque<TransitionRecord<K>> {
        &self.history
    }

    /// Successful steps since construction or the last reset. A step whose
    /// transition is rejected is not counted.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn enter(&mut self, kind: K) {
        self.current_state = Some(kind);
        if let Some(state) = self.states.get_mut(&kind) {
            state.on_enter(&mut self.context);
        }
        debug!(run_id = %self.run_id, state = ?kind, "Entered state");
        self.notify(&ChainEvent::Entered { state: kind });
    }

    fn record(&mut self, step: u64, from: K, to: Option<K>, started: Instant) {
        if !self.config.record_history {
            return;
        }

        self.history.push_back(TransitionRecord {
            step,
            from,
            to,
            timestamp: Utc::now(),
            duration_us: saturating_micros(started.elapsed()),
        });

        if let Some(limit) = self.config.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }

    fn fail(&self, err: ChainError) -> ChainError {
        if err.is_recoverable() {
            warn!(run_id = %self.run_id, state = ?self.current_state, "{}", err);
        } else {
            error!(run_id = %self.run_id, state = ?self.current_state, "{}", err);
        }
        self.notify(&ChainEvent::Failed { error: err.clone() });
        err
    }

    fn notify(&self, event: &ChainEvent<K>) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// Whole microseconds in `elapsed`, clamped to `u64::MAX`.
pub(crate) fn saturating_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

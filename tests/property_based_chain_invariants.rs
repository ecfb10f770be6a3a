// Property-Based Testing for Chain invariants
// Completion, registration, reset and transition legality over generated linear paths

use chainstate::{Chain, ChainError, Context, EndState, State, StateKind, TransitionError};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Node(u8);

/// Marks its visit in the context and moves to `next`.
struct Hop {
    id: u8,
    next: Node,
}

impl State<Node> for Hop {
    fn action(&mut self, ctx: &mut Context) {
        ctx.insert(format!("visited_{}", self.id), true);
    }

    fn next_state(&self, _ctx: &Context) -> Option<Node> {
        Some(self.next)
    }
}

impl StateKind for Node {
    fn create(self) -> Box<dyn State<Self>> {
        Box::new(Hop {
            id: self.0,
            next: Node(self.0.wrapping_add(1)),
        })
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Prior {
    Fresh,
    Completed,
    CompletedThenReset,
}

#[derive(Debug, Clone, Arbitrary)]
struct PathCase {
    #[proptest(strategy = "1u8..8")]
    len: u8,
    #[proptest(strategy = "1usize..5")]
    extra_calls: usize,
    prior: Prior,
}

/// `Node(0) -> ... -> Node(len - 1)` where the last node is an end state.
fn linear_chain(len: u8) -> Chain<Node> {
    let mut chain = Chain::new();
    for id in 0..len - 1 {
        chain.add_state(Node(id));
    }
    chain.add_state_instance(Node(len - 1), EndState);
    chain
}

fn apply_prior(chain: &mut Chain<Node>, prior: Prior) {
    match prior {
        Prior::Fresh => {}
        Prior::Completed => {
            chain.set_initial_state(Node(0)).unwrap();
            chain.run().unwrap();
        }
        Prior::CompletedThenReset => {
            chain.set_initial_state(Node(0)).unwrap();
            chain.run().unwrap();
            chain.reset();
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn prop_completed_chain_rejects_further_steps() {
        let mut runner = proptest::test_runner::TestRunner::default();

        runner
            .run(&any::<PathCase>(), |case| {
                let mut chain = linear_chain(case.len);
                chain.set_initial_state(Node(0)).unwrap();
                chain.run().unwrap();
                prop_assert!(chain.is_completed());

                let context = chain.context().clone();
                let cursor = chain.current_state();

                for call in 0..case.extra_calls {
                    let err = if call % 2 == 0 {
                        chain.next().unwrap_err()
                    } else {
                        chain.run().unwrap_err()
                    };
                    prop_assert_eq!(err, ChainError::ChainCompleted);
                    prop_assert_eq!(chain.context(), &context);
                    prop_assert_eq!(chain.current_state(), cursor);
                    prop_assert!(chain.is_completed());
                }

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn prop_unregistered_kind_is_never_initial() {
        let mut runner = proptest::test_runner::TestRunner::default();

        runner
            .run(&(any::<PathCase>(), 0u8..=255), |(case, id)| {
                let mut chain = linear_chain(case.len);
                apply_prior(&mut chain, case.prior);

                let result = chain.set_initial_state(Node(id));
                if id < case.len {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert_eq!(
                        result.unwrap_err(),
                        ChainError::StateNotFound {
                            kind: format!("{:?}", Node(id))
                        }
                    );
                }

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn prop_reset_restores_unset_chain() {
        let mut runner = proptest::test_runner::TestRunner::default();

        runner
            .run(&(any::<PathCase>(), 0usize..8), |(case, steps)| {
                let mut chain = linear_chain(case.len);
                chain.set_initial_state(Node(0)).unwrap();
                for _ in 0..steps {
                    if chain.next().is_err() {
                        break;
                    }
                }

                chain.reset();
                prop_assert!(!chain.is_completed());
                prop_assert_eq!(chain.current_state(), None);
                prop_assert!(chain.context().is_empty());
                prop_assert_eq!(chain.steps_taken(), 0);

                for id in 0..case.len {
                    prop_assert!(chain.set_initial_state(Node(id)).is_ok());
                }

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn prop_unregistered_target_is_a_transition_error() {
        let mut runner = proptest::test_runner::TestRunner::default();

        runner
            .run(&(1u8..8, 100u8..=255), |(len, missing)| {
                // Nodes 0..len-1 hop forward; the last one jumps to `missing`.
                let mut chain = Chain::new();
                for id in 0..len - 1 {
                    chain.add_state(Node(id));
                }
                chain.add_state_instance(
                    Node(len - 1),
                    Hop {
                        id: len - 1,
                        next: Node(missing),
                    },
                );
                chain.set_initial_state(Node(0)).unwrap();

                let err = chain.run().unwrap_err();
                let target = format!("{:?}", Node(missing));
                prop_assert!(err.to_string().contains(&target));
                prop_assert_eq!(
                    err,
                    ChainError::Transition(TransitionError::NotAdded {
                        from: format!("{:?}", Node(len - 1)),
                        target,
                    })
                );
                prop_assert!(!chain.is_completed());
                prop_assert_eq!(chain.current_state(), Some(Node(len - 1)));

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn prop_end_state_path_completes_in_path_length_steps() {
        let mut runner = proptest::test_runner::TestRunner::default();

        runner
            .run(&(1u8..12), |len| {
                let mut chain = linear_chain(len);
                chain.set_initial_state(Node(0)).unwrap();

                let mut calls = 0u64;
                loop {
                    calls += 1;
                    if !chain.next().unwrap() {
                        break;
                    }
                    prop_assert!(!chain.is_completed());
                }

                prop_assert_eq!(calls, len as u64);
                prop_assert!(chain.is_completed());
                prop_assert_eq!(chain.steps_taken(), len as u64);
                for id in 0..len - 1 {
                    let key = format!("visited_{}", id);
                    prop_assert_eq!(chain.context().get_bool(&key), Some(true));
                }

                Ok(())
            })
            .unwrap();
    }
}

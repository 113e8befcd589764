//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use parkwise_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Several `when_action` calls are applied in order; effect assertions see
/// the effects of the last action only. Wizard flows are easier to read as
/// a short script than as a hand-built intermediate state.
///
/// # Example
///
/// ```ignore
/// use parkwise_testing::ReducerTest;
///
/// ReducerTest::new(WizardReducer::new())
///     .with_env(test_environment())
///     .given_state(WizardState::default())
///     .when_action(WizardAction::Start { space })
///     .when_action(WizardAction::Continue)
///     .then_state(|state| {
///         assert_eq!(state.warning, Some(StepError::MissingInterval));
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append an action to apply (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the last action (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use parkwise_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would do work when executed.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkwise_core::effect::Effect;
    use parkwise_core::reducer::Reducer;
    use parkwise_core::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct GateState {
        open: bool,
        passes: u32,
    }

    #[derive(Clone, Debug)]
    enum GateAction {
        Open,
        Pass,
    }

    struct GateReducer;

    struct GateEnv;

    impl Reducer for GateReducer {
        type State = GateState;
        type Action = GateAction;
        type Environment = GateEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                GateAction::Open => {
                    state.open = true;
                    smallvec![Effect::Future(Box::pin(async { None }))]
                },
                GateAction::Pass if state.open => {
                    state.passes += 1;
                    smallvec![Effect::None]
                },
                GateAction::Pass => SmallVec::new(),
            }
        }
    }

    #[test]
    fn test_single_action() {
        ReducerTest::new(GateReducer)
            .with_env(GateEnv)
            .given_state(GateState {
                open: false,
                passes: 0,
            })
            .when_action(GateAction::Open)
            .then_state(|state| assert!(state.open))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_action_script_keeps_last_effects() {
        ReducerTest::new(GateReducer)
            .with_env(GateEnv)
            .given_state(GateState {
                open: false,
                passes: 0,
            })
            .when_action(GateAction::Open)
            .when_action(GateAction::Pass)
            .when_action(GateAction::Pass)
            .then_state(|state| assert_eq!(state.passes, 2))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<GateAction>(&[Effect::None]);
        assertions::assert_no_effects::<GateAction>(&[]);
    }
}

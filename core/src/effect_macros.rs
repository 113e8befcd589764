//! Declarative macros for ergonomic effect construction
//!
//! Reducers in the booking engine hand most of their I/O (catalog lookups,
//! submissions) to the runtime as `Effect::Future`; these macros keep that
//! boilerplate out of the match arms.

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use parkwise_core::async_effect;
///
/// async_effect! {
///     match catalog.vehicles().await {
///         Ok(vehicles) => Some(WizardAction::VehiclesLoaded { session, vehicles }),
///         Err(error) => Some(WizardAction::VehiclesUnavailable {
///             session,
///             reason: error.to_string(),
///         }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AsyncResult { value: i32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future");
        };
        assert_eq!(
            tokio_test::block_on(fut),
            Some(TestAction::AsyncResult { value: 42 })
        );
    }
}

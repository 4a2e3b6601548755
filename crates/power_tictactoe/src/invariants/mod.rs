//! Consistency checks over [`GameState`](crate::GameState).
//!
//! Each check is a zero-sized type so several can be bundled into a tuple
//! and run in one call after any transition.

/// A property every reachable state of type `S` satisfies.
pub trait Invariant<S> {
    /// True when `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// One-line statement of the property, used in violation reports.
    fn description() -> &'static str;
}

/// A property that failed to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// What the failed property states.
    pub description: String,
}

impl InvariantViolation {
    /// Wraps a property description.
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into();
        Self { description }
    }
}

/// Tuples of [`Invariant`]s checked in one pass.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(failed: impl IntoIterator<Item = Option<&'static str>>) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = failed
        .into_iter()
        .flatten()
        .map(InvariantViolation::new)
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn failure<S, I: Invariant<S>>(state: &S) -> Option<&'static str> {
    (!I::holds(state)).then(I::description)
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect([failure::<S, I1>(state), failure::<S, I2>(state)])
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect([
            failure::<S, I1>(state),
            failure::<S, I2>(state),
            failure::<S, I3>(state),
        ])
    }
}

pub mod history_consistent;
pub mod power_cells_vacant;
pub mod swap_consistent;

pub use history_consistent::HistoryConsistentInvariant;
pub use power_cells_vacant::PowerCellsVacantInvariant;
pub use swap_consistent::SwapConsistentInvariant;

/// All game invariants as a composable set.
pub type GameInvariants = (
    HistoryConsistentInvariant,
    PowerCellsVacantInvariant,
    SwapConsistentInvariant,
);

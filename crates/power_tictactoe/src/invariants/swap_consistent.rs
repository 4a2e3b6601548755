//! Swap flags never contradict each other.

use super::Invariant;
use crate::game::GameState;

/// Invariant: a swap is never offered after it has been used, and only
/// offered when the rule is enabled.
pub struct SwapConsistentInvariant;

impl Invariant<GameState> for SwapConsistentInvariant {
    fn holds(game: &GameState) -> bool {
        let swap = game.swap();
        !(swap.swap_available && swap.has_swapped)
            && (*game.settings().swap_rule_enabled() || !swap.swap_available)
    }

    fn description() -> &'static str {
        "Swap is offered at most once and only when enabled"
    }
}

//! Turns recorded rounds into prompt text.
//!
//! Both functions are pure: identical rounds always produce identical text.

use crate::debate::entities::Round;

/// Labeled block per response of `round`, in registry order.
///
/// ```text
/// --- OPENAI ---
/// <response text>
///
/// --- ANTHROPIC ---
/// <response text>
/// ```
pub fn build_context(round: &Round) -> String {
    let mut context = String::new();
    for response in &round.responses {
        context.push_str(&format!(
            "--- {} ---\n{}\n\n",
            response.backend_name.to_uppercase(),
            response.text.trim_end()
        ));
    }
    context
}

/// Every round as a `Round k (<description>)` section followed by its blocks
pub fn build_history(rounds: &[Round]) -> String {
    let mut history = String::new();
    for round in rounds {
        history.push_str(&format!("Round {} ({})\n\n", round.round, round.description));
        history.push_str(&build_context(round));
    }
    history
}

//! Completion encouragement messages.
//!
//! Selection takes an injected roll value instead of calling an ambient
//! random source, so the shell decides the randomness and tests stay
//! deterministic.

/// Fixed message deck shown when a task is completed.
pub const ENCOURAGING_MESSAGES: &[&str] = &[
    "Awesome! You completed a task!",
    "Great job! Keep up the momentum!",
    "Well done! You're making progress!",
    "Excellent! You're on fire!",
    "Nice work! One step closer to your goals!",
    "Fantastic! You're unstoppable!",
    "Amazing! You're doing great!",
    "Outstanding! Keep it up!",
];

/// Picks a message for the given roll; any value maps onto the deck.
pub fn encouraging_message(roll: usize) -> &'static str {
    ENCOURAGING_MESSAGES[roll % ENCOURAGING_MESSAGES.len()]
}

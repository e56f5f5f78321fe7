//! Bracket business logic: seeding, building, result propagation, corrections.

mod builder;
mod correction;
mod propagation;
mod roster;
mod seeding;
mod setup;

pub use builder::build_bracket;
pub use correction::{reopen_match, replace_participant};
pub use propagation::report_result;
pub use roster::read_participants;
pub use seeding::seed_participants;
pub use setup::create_bracket;

pub mod events;
pub mod play;
pub mod schedule;

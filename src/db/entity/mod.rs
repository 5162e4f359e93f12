pub mod games;
pub mod high_scores;
pub mod players;

pub mod accuracy;
pub mod color;
pub mod leaderboard;
pub mod percentile;
pub mod profile;
pub mod reconcile;
pub mod round;
pub mod scores;
pub mod target;

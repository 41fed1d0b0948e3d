mod scoreboard;

pub use scoreboard::ScoreboardView;

pub mod daily_stats;
pub mod notebooks;
pub mod sessions;
pub mod words;

pub use daily_stats::DailyStat;
pub use notebooks::Notebook;
pub use sessions::StudySession;
pub use words::{Word, WordSearchHit};

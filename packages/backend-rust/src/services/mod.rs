pub mod daily_stats;
pub mod notebook_settings;
pub mod study_session;
pub mod word_import;

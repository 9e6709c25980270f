pub mod entry;
pub mod history;
pub mod profile;
pub mod scores;

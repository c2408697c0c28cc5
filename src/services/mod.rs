pub mod accounts;
pub mod catalog;
pub mod feed;
pub mod preferences;
pub mod sessions;
pub mod watched;

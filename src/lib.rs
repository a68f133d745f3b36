pub mod api;
pub mod config;
pub mod media;
pub mod storage;

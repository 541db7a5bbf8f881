pub mod client;
pub mod config;
pub mod dispatch;
pub mod entities;
pub mod errors;
pub mod helpers;
pub mod logger;

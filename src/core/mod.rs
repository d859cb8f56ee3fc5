pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod feed;
pub mod filters;
pub mod model;
pub mod rewards;

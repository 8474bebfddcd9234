pub mod analysis;
pub mod api;
pub mod config;
pub mod export;
pub mod parser;
pub mod services;
pub mod store;
pub mod survey;

pub mod assist;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod tablecrm;

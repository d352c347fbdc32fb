pub mod config;
pub mod csv;
pub mod error;
pub mod ledger;
pub mod models;
pub mod prelude;
pub mod repository;
pub mod seed;

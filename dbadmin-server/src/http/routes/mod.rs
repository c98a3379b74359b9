//! Route handlers organized by resource

pub mod graph;
pub mod health;
pub mod reports;
pub mod rows;
pub mod tables;

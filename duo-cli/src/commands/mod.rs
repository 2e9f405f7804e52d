//! CLI Commands

pub mod account;
pub mod check;
pub mod mode;
pub mod names;
pub mod steps;
pub mod walk;

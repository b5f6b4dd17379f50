#![cfg_attr(not(test), warn(clippy::unwrap_used))]
#![cfg_attr(not(test), warn(clippy::expect_used))]

pub mod config;
pub mod dataset;
pub mod genotype;
pub mod index;
pub mod indiv;
pub mod io;
pub mod personal;
pub mod pipeline;
pub mod report;
pub mod site;
#[cfg(test)]
pub mod tests;
pub mod utils;

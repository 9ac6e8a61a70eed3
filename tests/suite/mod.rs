//! Integration test suite modules

mod config;
mod determinism;
mod legacy;
mod properties;
mod scenarios;

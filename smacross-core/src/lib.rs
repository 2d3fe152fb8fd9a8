//! SMA Crossover Core: domain types, date validation, indicator engine, data providers.
//!
//! This crate contains everything that does not touch a terminal or a chart:
//! - Domain types (price bars, price series, run parameters)
//! - Calendar date validation for user-supplied `YYYY-MM-DD` strings
//! - Simple moving averages and crossover detection
//! - The `DataProvider` trait with Yahoo Finance, CSV, and synthetic sources
//!
//! The indicator engine is a pure function of (series, windows); it performs
//! no I/O and can be tested without a network or a filesystem.

pub mod data;
pub mod dates;
pub mod domain;
pub mod indicators;

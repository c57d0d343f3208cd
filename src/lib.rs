//! Closures, single-method callback capabilities and background task
//! launching, with a demo runner that exercises each of them in turn.

pub mod compare;
pub mod config;
pub mod console;
pub mod demo;
pub mod employee;
pub mod error;
pub mod function;
pub mod launcher;
pub mod logging;
pub mod pool;
pub mod predicate;
pub mod supplier;

pub use error::{LambdaError, Result};

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod model;
pub mod slicing;
pub mod volume;

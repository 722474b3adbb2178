#![warn(clippy::all, clippy::pedantic)]

pub mod components_tests;
pub mod properties_tests;
pub mod time_tests;

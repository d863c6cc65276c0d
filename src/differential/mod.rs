#[macro_use]
pub mod motions;
pub mod pose;
pub mod robot;

pub mod math;
pub mod samplers;

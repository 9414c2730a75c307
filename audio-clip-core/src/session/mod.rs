pub mod accumulator;
pub mod recorder;

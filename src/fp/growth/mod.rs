pub mod mining;

pub use mining::Growth;

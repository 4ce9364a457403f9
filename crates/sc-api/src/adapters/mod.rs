pub mod cloudwatch;
pub mod count;
pub mod delta;
pub mod prometheus;

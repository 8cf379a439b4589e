pub mod formatters;
pub mod network;
pub mod resolution;

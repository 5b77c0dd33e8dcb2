pub mod input;
pub mod network;

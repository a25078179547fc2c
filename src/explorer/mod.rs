//! File-tree explorer: tree model, controller and event bridge.

pub mod bridge;
pub mod controller;
pub mod entry;
pub mod tree;

pub use controller::Explorer;

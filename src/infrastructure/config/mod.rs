//! Infrastructure configuration modules.

pub mod betting;
pub mod logging;
pub mod pool;
pub mod settlement;
pub mod settings;
pub mod store;

//! Memory management utilities.

pub mod resource_pool;

pub use resource_pool::ResourcePool;

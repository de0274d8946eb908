pub mod math_helper;
pub mod memory;

pub mod read_wire;
pub mod write_wire;

pub mod compression_map;
pub mod to_wire;
pub mod from_wire;
mod from_wire_tests;
mod to_wire_tests;

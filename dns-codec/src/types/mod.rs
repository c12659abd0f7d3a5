pub mod label;
pub mod domain_name;

pub mod hex;

pub mod order;
pub mod vehicle;

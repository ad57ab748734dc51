pub mod fleet;
pub mod lifecycle;
pub mod placement;

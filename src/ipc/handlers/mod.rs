pub mod chart;
pub mod classes;
pub mod core;
pub mod photos;
pub mod roster;

pub mod analytics;
pub mod core;
pub mod directory;
pub mod marking;
pub mod records;

pub mod analysis;
pub mod entries;
pub mod health;
pub mod lunar;

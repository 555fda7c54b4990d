//! Pure computations over entry snapshots. Nothing here touches shared state.

pub mod color;
pub mod cycle;
pub mod food;
pub mod series;

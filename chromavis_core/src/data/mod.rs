//! Input records consumed by the projector and the distance engine.

pub mod catch_table;
pub mod quantum_catch;

pub use catch_table::{CatchTable, LUM_COLUMN};
pub use quantum_catch::{AchromaticReceptor, CatchScale, QuantumCatches, VisualMeta};

// Tax module - Indian income tax under the old and new regimes

pub mod comparison;
pub mod regimes;
pub mod slabs;

pub use comparison::{compare, compare_detailed, DetailedComparison, Regime, RegimeComparisonResult};
pub use regimes::{compute_legacy_regime, compute_new_regime, RegimeBreakdown};
pub use slabs::{Slab, SlabSlice, SlabTable, NEW_REGIME_SLABS, OLD_REGIME_SLABS};

// world/ - Terrain field
//
// terrain: pure per-cell math, no state.
// field: the generated point columns.

mod field;
mod terrain;

pub use field::*;
pub use terrain::*;

pub mod table;
pub mod vt_sets;

pub use table::{Precedence, PrecedenceTable};
pub use vt_sets::{first_vt, last_vt, VtSets, MAX_CLOSURE_SWEEPS};

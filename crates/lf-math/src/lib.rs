//! levelfit math utilities.
//!
//! Pure numerical kernels with no I/O: special functions, the Student t and
//! Fisher F distributions, simple least-squares regression and Pearson
//! correlation.

pub mod math;

pub use math::beta::*;
pub use math::correlation::*;
pub use math::fisher_f::*;
pub use math::ols::*;
pub use math::stable::*;
pub use math::student_t::*;

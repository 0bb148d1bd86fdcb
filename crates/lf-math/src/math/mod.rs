//! Core math modules.

pub mod beta;
pub mod correlation;
pub mod fisher_f;
pub mod ols;
pub mod stable;
pub mod student_t;

//! License display forms.
//!
//! - [`display`]: maps GitHub license keys and pkg.go.dev license names to the
//!   short, colored form shown in the table report.

pub mod display;

//! Terminal presentation helpers: tables and spinners.

pub mod progress;
pub mod table;

pub use progress::{create_spinner, ProgressBarExt};
pub use table::{list_table, render_list};

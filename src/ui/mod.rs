pub mod output;
pub mod table;
pub mod theme;

pub use output::{error, warn};
pub use table::slip_table;
pub use theme::theme;

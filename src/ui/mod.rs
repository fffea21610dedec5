pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, company, dim, error, header, info, score, section, success, summary_row};
pub use table::{dimension_table, pattern_table, stats_table, summary_table, TableBuilder};
pub use theme::{theme, Theme};

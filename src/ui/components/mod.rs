pub mod pattern_display;
pub mod stats_table;

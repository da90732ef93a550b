pub mod about;
pub mod config;
pub mod csv_input;
pub mod draw_commands;
pub mod environment_sequence;
pub mod error;
pub mod lineage_layout;
pub mod phenotype_sequence;
pub mod pipeline;
pub mod range_aggregator;
pub mod render_export;
pub mod slice_selector;
pub mod time_range;

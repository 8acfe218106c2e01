pub mod formatter;

pub use formatter::{
    format_breakdown, format_money, format_rar_summary, format_score, format_weights_table,
    should_use_colors,
};

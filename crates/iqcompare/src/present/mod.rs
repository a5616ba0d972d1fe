//! Presentation adapter: chart payloads and tables built from a snapshot.

mod chart;
mod table;

pub(crate) use chart::build_charts;
pub use chart::{
    bar_payload, fidelity_area_payload, radar_payload, Chart, ChartPayload, ChartView, Series,
};
pub use table::{escape_latex, format_cell, render_table, TableFormat};

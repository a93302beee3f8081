/// Rendering of the derived dashboard: search form, charts, record table.
pub mod panels;
pub mod plot;
pub mod records;

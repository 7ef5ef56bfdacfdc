// Adapters layer: concrete implementations for external systems (files, tabular input, report exports).

pub mod archive;
pub mod csv_table;
pub mod export;
pub mod storage;
pub mod xlsx;

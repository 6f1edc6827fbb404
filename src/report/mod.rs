pub mod export;
pub mod range;
pub mod summary;

pub use export::{
    export_to_dir, render, CsvExporter, Exporter, JsonExporter, PdfExporter, Statement, StatementExporter, StatementText,
    PDF_COLUMNS,
};
pub use range::{DateRange, QueryBounds, ReportQuery};
pub use summary::ReportSummary;

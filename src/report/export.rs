use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use enum_dispatch::enum_dispatch;
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, SimplePageDecorator};
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use super::range::DateRange;
use super::summary::ReportSummary;
use crate::error::ExportError;
use crate::model::ReportRow;

/// Everything an exporter needs to render one report.
#[derive(Debug, Clone)]
pub struct Statement<'a> {
    pub customer: &'a str,
    pub range: DateRange,
    pub generated_at: DateTime<Local>,
    pub rows: &'a [ReportRow],
}

impl Statement<'_> {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_rows(self.rows)
    }
}

#[enum_dispatch]
pub trait StatementExporter {
    fn label(&self) -> &'static str;

    fn file_name(&self, statement: &Statement) -> String;

    fn write_to(&self, out: &mut dyn Write, statement: &Statement) -> Result<(), ExportError>;
}

#[enum_dispatch(StatementExporter)]
#[derive(Debug, Clone, Copy)]
pub enum Exporter {
    PdfExporter,
    JsonExporter,
    CsvExporter,
}

/// Renders into `out`, refusing an empty report.
pub fn render(exporter: &Exporter, statement: &Statement, out: &mut dyn Write) -> Result<(), ExportError> {
    if statement.rows.is_empty() {
        return Err(ExportError::EmptyReport);
    }
    exporter.write_to(out, statement)
}

/// Writes the report as a new file in `dir` and returns its path.
pub fn export_to_dir(exporter: &Exporter, statement: &Statement, dir: &Path) -> Result<PathBuf, ExportError> {
    if statement.rows.is_empty() {
        return Err(ExportError::EmptyReport);
    }

    let path = dir.join(exporter.file_name(statement));
    let mut out = BufWriter::new(File::create(&path)?);
    exporter.write_to(&mut out, statement)?;
    out.flush()?;

    info!("exported {} rows to {}", statement.rows.len(), path.display());
    Ok(path)
}

fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}

fn status(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

/// Lowercase, dash-separated form of a name that is safe inside a file name.
fn slug(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();

    if slug.is_empty() {
        "customer".to_string()
    } else {
        slug
    }
}

const REGULAR_FONT: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSans.ttf"));
const BOLD_FONT: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSans-Bold.ttf"));

pub const PDF_COLUMNS: [&str; 7] = ["Date", "Account", "Type", "Balance Before", "Status", "Movement", "Balance After"];

/// Text of a PDF statement before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementText {
    pub title: &'static str,
    pub header: Vec<String>,
    pub rows: Vec<[String; 7]>,
    pub totals: Vec<String>,
}

fn statement_fonts() -> Result<FontFamily<FontData>, genpdf::error::Error> {
    let regular = FontData::new(REGULAR_FONT.to_vec(), None)?;
    let bold = FontData::new(BOLD_FONT.to_vec(), None)?;

    Ok(FontFamily {
        regular: regular.clone(),
        bold: bold.clone(),
        italic: regular,
        bold_italic: bold,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl PdfExporter {
    pub fn text(&self, statement: &Statement) -> StatementText {
        let header = vec![
            format!("Customer: {}", statement.customer),
            format!(
                "Period: {} to {}",
                statement.range.start().format("%Y-%m-%d"),
                statement.range.end().format("%Y-%m-%d")
            ),
            format!("Generated: {}", statement.generated_at.format("%Y-%m-%d %H:%M:%S")),
        ];

        let rows = statement
            .rows
            .iter()
            .map(|row| {
                [
                    row.date.format("%Y-%m-%d").to_string(),
                    row.account_number.clone(),
                    row.account_type.clone(),
                    money(row.balance_before),
                    status(row.active).to_string(),
                    money(row.movement),
                    money(row.balance_after),
                ]
            })
            .collect();

        let summary = statement.summary();
        let totals = vec![
            format!("Total Credits: {}", money(summary.total_credits())),
            format!("Total Debits: {}", money(summary.total_debits())),
            format!("Balance: {}", money(summary.balance())),
        ];

        StatementText {
            title: "Account Statement Report",
            header,
            rows,
            totals,
        }
    }

    /// Lays the statement out as a wrapped table on A4 pages.
    pub fn document(&self, statement: &Statement) -> Result<Document, ExportError> {
        let text = self.text(statement);

        let mut doc = Document::new(statement_fonts()?);
        doc.set_title(text.title);
        doc.set_font_size(10);
        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(Paragraph::new(text.title).styled(Style::new().bold().with_font_size(18)));
        doc.push(Break::new(1));
        for line in text.header {
            doc.push(Paragraph::new(line).styled(Style::new().with_font_size(12)));
        }
        doc.push(Break::new(1));

        let mut table = TableLayout::new(vec![3, 3, 3, 4, 2, 4, 4]);
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        let mut heading = table.row();
        for column in PDF_COLUMNS {
            heading = heading.element(Paragraph::new(column).styled(Style::new().bold().with_font_size(8)).padded(1));
        }
        heading.push()?;

        for cells in text.rows {
            let mut row = table.row();
            for (i, cell) in cells.into_iter().enumerate() {
                let alignment = if matches!(i, 3 | 5 | 6) {
                    Alignment::Right
                } else {
                    Alignment::Left
                };
                row = row.element(
                    Paragraph::new(cell)
                        .aligned(alignment)
                        .styled(Style::new().with_font_size(8))
                        .padded(1),
                );
            }
            row.push()?;
        }
        doc.push(table);

        doc.push(Break::new(1));
        for line in text.totals {
            doc.push(Paragraph::new(line).styled(Style::new().bold().with_font_size(12)));
        }

        Ok(doc)
    }
}

impl StatementExporter for PdfExporter {
    fn label(&self) -> &'static str {
        "PDF"
    }

    fn file_name(&self, statement: &Statement) -> String {
        format!(
            "report-{}-{}.pdf",
            slug(statement.customer),
            statement.generated_at.timestamp_millis()
        )
    }

    fn write_to(&self, out: &mut dyn Write, statement: &Statement) -> Result<(), ExportError> {
        self.document(statement)?.render(out)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl StatementExporter for JsonExporter {
    fn label(&self) -> &'static str {
        "JSON"
    }

    fn file_name(&self, statement: &Statement) -> String {
        format!("report-{}.json", statement.generated_at.timestamp_millis())
    }

    fn write_to(&self, out: &mut dyn Write, statement: &Statement) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(out, statement.rows)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    date: String,
    account: &'a str,
    #[serde(rename = "type")]
    account_type: &'a str,
    balance_before: String,
    status: &'static str,
    movement: String,
    balance_after: String,
}

impl<'a> From<&'a ReportRow> for CsvRecord<'a> {
    fn from(row: &'a ReportRow) -> Self {
        CsvRecord {
            date: row.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            account: &row.account_number,
            account_type: &row.account_type,
            balance_before: format!("{:.2}", row.balance_before),
            status: status(row.active),
            movement: format!("{:.2}", row.movement),
            balance_after: format!("{:.2}", row.balance_after),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl StatementExporter for CsvExporter {
    fn label(&self) -> &'static str {
        "CSV"
    }

    fn file_name(&self, statement: &Statement) -> String {
        format!(
            "report-{}-{}.csv",
            slug(statement.customer),
            statement.generated_at.timestamp_millis()
        )
    }

    fn write_to(&self, out: &mut dyn Write, statement: &Statement) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(out);
        for row in statement.rows {
            csv_writer.serialize(CsvRecord::from(row))?;
        }

        csv_writer.flush()?;

        Ok(())
    }
}

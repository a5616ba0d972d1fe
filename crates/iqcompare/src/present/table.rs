//! Tabular rendering of a [`Snapshot`].
//!
//! Columns are `Model` followed by every available field in catalogue order.
//! The last row names the best model(s) per field.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::TableConfig;
use crate::metric::MetricField;
use crate::pipeline::Snapshot;

const MODEL_HEADER: &str = "Model";
const BEST_ROW: &str = "Best";

/// Output syntax for [`render_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// Space-aligned columns for terminals.
    #[default]
    Plain,
    Markdown,
    /// A `tabular` environment.
    Latex,
}

/// Render the averaged metrics of `snapshot` as a table.
pub fn render_table(snapshot: &Snapshot, format: TableFormat, config: &TableConfig) -> String {
    let grid = TableGrid::build(snapshot, config);
    match format {
        TableFormat::Plain => grid.plain(),
        TableFormat::Markdown => grid.markdown(),
        TableFormat::Latex => grid.latex(),
    }
}

/// Format one cell: `precision` decimals, or the missing token.
pub fn format_cell(value: Option<f64>, config: &TableConfig) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", config.precision, v),
        _ => config.missing_token.clone(),
    }
}

struct TableGrid {
    columns: Vec<MetricField>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
}

impl TableGrid {
    fn build(snapshot: &Snapshot, config: &TableConfig) -> Self {
        let columns: Vec<MetricField> = snapshot.availability.fields().collect();

        let header: Vec<String> = std::iter::once(MODEL_HEADER.to_string())
            .chain(columns.iter().map(|f| f.label().to_string()))
            .collect();

        let rows: Vec<Vec<String>> = snapshot
            .averaged
            .iter()
            .map(|m| {
                std::iter::once(m.model.clone())
                    .chain(columns.iter().map(|&f| format_cell(m.value(f), config)))
                    .collect()
            })
            .collect();

        let footer: Option<Vec<String>> = (!snapshot.best.is_empty()).then(|| {
            std::iter::once(BEST_ROW.to_string())
                .chain(columns.iter().map(|&f| match snapshot.best_for(f) {
                    Some(best) => best.models.join(", "),
                    None => config.missing_token.clone(),
                }))
                .collect()
        });

        Self {
            columns,
            header,
            rows,
            footer,
        }
    }

    fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header)
            .chain(&self.rows)
            .chain(self.footer.as_ref())
    }

    fn plain(&self) -> String {
        let mut widths = vec![0usize; self.header.len()];
        for row in self.all_rows() {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

        let line = |row: &[String]| -> String {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, &w))| {
                    let pad = w.saturating_sub(cell.chars().count());
                    if i == 0 {
                        format!("{cell}{}", " ".repeat(pad))
                    } else {
                        format!("{}{cell}", " ".repeat(pad))
                    }
                })
                .collect();
            cells.join("  ").trim_end().to_string()
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", line(&self.header));
        let _ = writeln!(out, "{rule}");
        for row in &self.rows {
            let _ = writeln!(out, "{}", line(row));
        }
        if let Some(footer) = &self.footer {
            let _ = writeln!(out, "{rule}");
            let _ = writeln!(out, "{}", line(footer));
        }
        out
    }

    fn markdown(&self) -> String {
        let line = |row: &[String]| {
            let cells: Vec<String> = row
                .iter()
                .map(|c| c.replace(['\r', '\n'], " ").replace('|', "\\|"))
                .collect();
            format!("| {} |", cells.join(" | "))
        };
        let align = std::iter::once("---")
            .chain(self.columns.iter().map(|_| "---:"))
            .collect::<Vec<_>>()
            .join(" | ");

        let mut out = String::new();
        let _ = writeln!(out, "{}", line(&self.header));
        let _ = writeln!(out, "| {align} |");
        for row in &self.rows {
            let _ = writeln!(out, "{}", line(row));
        }
        if let Some(footer) = &self.footer {
            let bold: Vec<String> = footer.iter().map(|c| format!("**{c}**")).collect();
            let _ = writeln!(out, "{}", line(&bold));
        }
        out
    }

    fn latex(&self) -> String {
        let line = |row: &[String]| {
            let cells: Vec<String> = row.iter().map(|c| escape_latex(c)).collect();
            format!("{} \\\\", cells.join(" & "))
        };
        let layout = format!("l|{}", "r".repeat(self.columns.len()));

        let mut out = String::new();
        let _ = writeln!(out, "\\begin{{tabular}}{{{layout}}}");
        let _ = writeln!(out, "\\hline");
        let _ = writeln!(out, "{}", line(&self.header));
        let _ = writeln!(out, "\\hline");
        for row in &self.rows {
            let _ = writeln!(out, "{}", line(row));
        }
        if let Some(footer) = &self.footer {
            let _ = writeln!(out, "\\hline");
            let _ = writeln!(out, "{}", line(footer));
        }
        let _ = writeln!(out, "\\hline");
        let _ = writeln!(out, "\\end{{tabular}}");
        out
    }
}

/// Escape LaTeX special characters in free text.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            'Δ' => out.push_str("$\\Delta$"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareConfig;
    use crate::pipeline::recompute;
    use crate::test_utils::record;

    fn snapshot() -> Snapshot {
        let records = vec![
            record("model_a", &[(MetricField::Psnr, 30.0), (MetricField::Niqe, 5.0)]),
            record("model_b", &[(MetricField::Psnr, 32.5)]),
        ];
        recompute(&records, &CompareConfig::default())
    }

    #[test]
    fn cells_use_precision_or_missing_token() {
        let config = TableConfig::default();
        assert_eq!(format_cell(Some(0.123456), &config), "0.1235");
        assert_eq!(format_cell(None, &config), "N/A");
        assert_eq!(format_cell(Some(f64::NAN), &config), "N/A");

        let custom = TableConfig {
            precision: 1,
            missing_token: "-".to_string(),
        };
        assert_eq!(format_cell(Some(2.26), &custom), "2.3");
        assert_eq!(format_cell(None, &custom), "-");
    }

    #[test]
    fn markdown_lists_available_columns_only() {
        let table = render_table(&snapshot(), TableFormat::Markdown, &TableConfig::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| Model | PSNR | NIQE |");
        assert_eq!(lines[1], "| --- | ---: | ---: |");
        assert_eq!(lines[2], "| model_a | 30.0000 | 5.0000 |");
        assert_eq!(lines[3], "| model_b | 32.5000 | N/A |");
        assert_eq!(lines[4], "| **Best** | **model_b** | **model_a** |");
        assert!(!table.contains("SSIM"));
    }

    #[test]
    fn plain_columns_are_aligned() {
        let table = render_table(&snapshot(), TableFormat::Plain, &TableConfig::default());
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Model  "));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("model_a"));
        assert!(lines[3].ends_with("N/A"));
        assert_eq!(lines[2].find("30.0000"), lines[3].find("32.5000"));
    }

    #[test]
    fn latex_escapes_names_and_labels() {
        let records = vec![record(
            "ours_v2",
            &[(MetricField::DeltaE76VsOriginal, 1.5)],
        )];
        let snap = recompute(&records, &CompareConfig::default());
        let table = render_table(&snap, TableFormat::Latex, &TableConfig::default());
        assert!(table.starts_with("\\begin{tabular}{l|r}"));
        assert!(table.contains("ours\\_v2 & 1.5000 \\\\"));
        assert!(table.contains("$\\Delta$E76"));
        assert!(table.trim_end().ends_with("\\end{tabular}"));
    }

    #[test]
    fn markdown_rows_stay_on_one_line() {
        let records = vec![record("two\nlines|v1", &[(MetricField::Ssim, 0.5)])];
        let snap = recompute(&records, &CompareConfig::default());
        let table = render_table(&snap, TableFormat::Markdown, &TableConfig::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "| two lines\\|v1 | 0.5000 |");
    }

    #[test]
    fn empty_snapshot_is_header_only() {
        let table = render_table(&Snapshot::empty(), TableFormat::Markdown, &TableConfig::default());
        assert_eq!(table, "| Model |\n| --- |\n");
    }

    #[test]
    fn escape_handles_specials() {
        assert_eq!(escape_latex("a&b%c"), "a\\&b\\%c");
        assert_eq!(escape_latex("x~y"), "x\\textasciitilde{}y");
    }
}

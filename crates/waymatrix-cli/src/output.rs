//! Output formatting for shortest-path records.

use std::io::{self, Write};

use clap::ValueEnum;
use waymatrix_lib::ResultRecord;

/// Output format for the `paths` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of records; unreachable weights are `null`.
    #[default]
    Json,
    /// One line per ordered pair.
    Text,
}

/// Render `records` in the requested format.
pub fn render_records<W: Write>(
    records: &[ResultRecord],
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            for record in records {
                writeln!(
                    out,
                    "{} -> {}  min={}  km={}",
                    record.city1, record.city2, record.min, record.km
                )?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymatrix_lib::Weight;

    fn records() -> Vec<ResultRecord> {
        vec![
            ResultRecord {
                city1: "Alpha".to_string(),
                city2: "Bravo".to_string(),
                min: Weight::Finite(10.0),
                km: Weight::Finite(12.5),
            },
            ResultRecord {
                city1: "Alpha".to_string(),
                city2: "Delta".to_string(),
                min: Weight::Unreachable,
                km: Weight::Unreachable,
            },
        ]
    }

    fn render(format: OutputFormat) -> String {
        let mut out = Vec::new();
        render_records(&records(), format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lists_one_line_per_pair() {
        let text = render(OutputFormat::Text);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Alpha -> Bravo  min=10  km=12.5",
                "Alpha -> Delta  min=unreachable  km=unreachable",
            ]
        );
    }

    #[test]
    fn json_uses_null_for_unreachable() {
        let json: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();

        assert_eq!(json[0]["min"], 10.0);
        assert!(json[1]["min"].is_null());
        assert!(json[1]["km"].is_null());
    }

    #[test]
    fn empty_records_render_empty() {
        let mut out = Vec::new();
        render_records(&[], OutputFormat::Text, &mut out).unwrap();
        assert!(out.is_empty());

        let mut out = Vec::new();
        render_records(&[], OutputFormat::Json, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }
}

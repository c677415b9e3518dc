//! Output renderers for batch reports.

use std::fmt::Write as _;

use anyhow::anyhow;
use clap::ValueEnum;
use runcopy_fsops::BatchReport;

use crate::error::{CliError, CliResult};

/// Line printed once every file has been copied and verified.
pub(crate) const SUCCESS_MESSAGE: &str = "Files copied successfully!";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub(crate) fn render_report(report: &BatchReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Text => {
            let mut text = String::from(SUCCESS_MESSAGE);
            let _ = write!(
                text,
                "\ndestination: {}\nfiles: {} ({} bytes, {})",
                report.destination.display(),
                report.files.len(),
                report.total_bytes(),
                report.algorithm
            );
            if let Some(marker) = &report.completion_marker {
                let _ = write!(text, "\nmarker: {}", marker.display());
            }
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcopy_config::HashAlgorithm;
    use runcopy_fsops::{CopiedFile, RunId};
    use std::path::PathBuf;

    fn report() -> Result<BatchReport, Box<dyn std::error::Error>> {
        Ok(BatchReport {
            run_id: RunId::new("run7")?,
            destination: PathBuf::from("dst/run7_1"),
            algorithm: HashAlgorithm::Sha256,
            files: vec![CopiedFile {
                source: PathBuf::from("src/a.txt"),
                destination: PathBuf::from("dst/run7_1/a.txt"),
                bytes: 5,
                digest: "ab".into(),
            }],
            completion_marker: None,
            completed_at: "2026-01-02T03:04:05Z".parse()?,
        })
    }

    #[test]
    fn text_output_leads_with_success_line() -> Result<(), Box<dyn std::error::Error>> {
        let text = render_report(&report()?, OutputFormat::Text)
            .map_err(|err| err.display_message())?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(SUCCESS_MESSAGE));
        assert_eq!(lines.next(), Some("destination: dst/run7_1"));
        assert_eq!(lines.next(), Some("files: 1 (5 bytes, sha256)"));
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[test]
    fn json_output_serialises_report() -> Result<(), Box<dyn std::error::Error>> {
        let text = render_report(&report()?, OutputFormat::Json)
            .map_err(|err| err.display_message())?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value["run_id"], "run7");
        assert_eq!(value["algorithm"], "sha256");
        assert_eq!(value["files"][0]["bytes"], 5);
        Ok(())
    }
}

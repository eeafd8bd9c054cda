use std::path::{Path, PathBuf};

use serde::Serialize;
use tickchart_core::{ChartArtifact, CoreError, PipelineOutput};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Metadata printed after a chart has been written.
#[derive(Debug, Serialize)]
struct ChartSummary<'a> {
    path: String,
    content_type: &'a str,
    width: u32,
    height: u32,
    bytes: usize,
}

pub fn render(
    output: &PipelineOutput,
    format: OutputFormat,
    pretty: bool,
    chart_target: Option<&Path>,
) -> Result<(), CliError> {
    match output {
        PipelineOutput::Chart(artifact) => {
            let path = write_artifact(artifact, chart_target)?;
            match format {
                OutputFormat::Text => println!("Chart saved to {}", path.display()),
                OutputFormat::Json => {
                    let summary = ChartSummary {
                        path: path.display().to_string(),
                        content_type: artifact.content_type,
                        width: artifact.width,
                        height: artifact.height,
                        bytes: artifact.bytes.len(),
                    };
                    println!("{}", to_json(&summary, pretty)?);
                }
            }
        }
        PipelineOutput::Spot(spot) => print(format, pretty, spot, || spot.to_string())?,
        PipelineOutput::Overview(overview) => {
            print(format, pretty, overview, || overview.to_string())?
        }
    }
    Ok(())
}

fn print<T, F>(format: OutputFormat, pretty: bool, value: &T, text: F) -> Result<(), CliError>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", to_json(value, pretty)?),
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CoreError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(payload)
}

/// Write the PNG to `target`, into it when it is a directory, or to the
/// artifact's own filename when no target is given.
pub fn write_artifact(artifact: &ChartArtifact, target: Option<&Path>) -> Result<PathBuf, CliError> {
    let path = match target {
        Some(dir) if dir.is_dir() => dir.join(&artifact.filename),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(&artifact.filename),
    };

    std::fs::write(&path, &artifact.bytes).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = artifact.bytes.len(), "chart written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ChartArtifact {
        ChartArtifact {
            bytes: vec![0x89, b'P', b'N', b'G'],
            content_type: "image/png",
            filename: String::from("IBM_chart.png"),
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn writes_into_directory_using_artifact_name() {
        let dir = tempfile::tempdir().expect("tempdir");

        let path = write_artifact(&artifact(), Some(dir.path())).expect("write");

        assert_eq!(path, dir.path().join("IBM_chart.png"));
        assert_eq!(std::fs::read(&path).expect("read back"), artifact().bytes);
    }

    #[test]
    fn writes_to_explicit_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("custom.png");

        let path = write_artifact(&artifact(), Some(&target)).expect("write");

        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[test]
    fn missing_parent_directory_is_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("missing").join("chart.png");

        let err = write_artifact(&artifact(), Some(&target)).expect_err("must fail");

        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn chart_summary_serializes_metadata_only() {
        let summary = ChartSummary {
            path: String::from("IBM_chart.png"),
            content_type: "image/png",
            width: 800,
            height: 600,
            bytes: 4,
        };
        let json = to_json(&summary, false).expect("json");
        assert_eq!(
            json,
            r#"{"path":"IBM_chart.png","content_type":"image/png","width":800,"height":600,"bytes":4}"#
        );
    }
}

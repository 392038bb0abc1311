//! JSON export and import of reports.

use crate::ResultsResult;
use crate::types::PipelineReport;
use std::fs;
use std::path::Path;

pub fn report_to_json(report: &PipelineReport) -> ResultsResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn report_from_json(json: &str) -> ResultsResult<PipelineReport> {
    Ok(serde_json::from_str(json)?)
}

pub fn save_report(path: &Path, report: &PipelineReport) -> ResultsResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report_to_json(report)?)?;
    Ok(())
}

pub fn load_report(path: &Path) -> ResultsResult<PipelineReport> {
    let content = fs::read_to_string(path)?;
    report_from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_is_rejected() {
        let err = report_from_json("{ \"pipeline\": 3 }").unwrap_err();
        assert!(matches!(err, crate::ResultsError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_report(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(matches!(err, crate::ResultsError::Io(_)));
    }
}

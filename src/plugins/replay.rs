//! Line-based script of engine signals, used to drive a callback without a real engine.
//!
//! ```text
//! start <download_id> <file_name> <file_path> [mime_type]
//! success <download_id> <content_length>
//! success-file <file_path> <content_length> [mime_type]
//! error <download_id>
//! fail-or-cancel <download_id> <reason>
//! failure <url|-> <reason>
//! ```

use crate::core::callback::DownloadCallback;
use crate::core::model::{DownloadFailReason, DownloadId, DownloadItem, FinishedFile, ParseReasonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSignal {
    Start(DownloadItem),
    Success { download_id: DownloadId, content_length: i64 },
    SuccessFile { file: FinishedFile, mime_type: Option<String> },
    Error { download_id: DownloadId },
    FailOrCancel { download_id: DownloadId, reason: DownloadFailReason },
    Failure { url: Option<String>, reason: DownloadFailReason },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ReplayError {
    #[error("line {line}: unknown signal `{signal}`")]
    UnknownSignal { line: usize, signal: String },

    #[error("line {line}: `{signal}` expects {expected}")]
    Arity { line: usize, signal: &'static str, expected: &'static str },

    #[error("line {line}: invalid number `{value}`")]
    Number { line: usize, value: String },

    #[error("line {line}: {source}")]
    Reason {
        line: usize,
        #[source]
        source: ParseReasonError,
    },
}

impl EngineSignal {
    pub fn deliver(self, callback: &dyn DownloadCallback) {
        match self {
            EngineSignal::Start(item) => callback.on_start(item),
            EngineSignal::Success { download_id, content_length } => callback.on_success(download_id, content_length),
            EngineSignal::SuccessFile { file, mime_type } => callback.on_success_file(file, mime_type),
            EngineSignal::Error { download_id } => callback.on_error(download_id),
            EngineSignal::FailOrCancel { download_id, reason } => callback.on_fail_or_cancel(download_id, reason),
            EngineSignal::Failure { url, reason } => callback.on_failure(url, reason),
        }
    }
}

pub fn parse_script(script: &str) -> Result<Vec<EngineSignal>, ReplayError> {
    let mut signals = Vec::new();
    for (idx, raw) in script.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let parts: Vec<&str> = content.split_whitespace().collect();
        signals.push(parse_line(line, &parts)?);
    }
    Ok(signals)
}

fn parse_line(line: usize, parts: &[&str]) -> Result<EngineSignal, ReplayError> {
    fn number(line: usize, value: &str) -> Result<i64, ReplayError> {
        value.parse().map_err(|_| ReplayError::Number { line, value: value.to_string() })
    }
    fn reason(line: usize, value: &str) -> Result<DownloadFailReason, ReplayError> {
        value.parse().map_err(|source| ReplayError::Reason { line, source })
    }

    match parts {
        ["start", id, name, path] => Ok(EngineSignal::Start(DownloadItem::started(number(line, id)?, *name, *path))),
        ["start", id, name, path, mime] => Ok(EngineSignal::Start(
            DownloadItem::started(number(line, id)?, *name, *path).with_mime_type(*mime),
        )),
        ["start", ..] => Err(ReplayError::Arity {
            line,
            signal: "start",
            expected: "<download_id> <file_name> <file_path> [mime_type]",
        }),

        ["success", id, len] => Ok(EngineSignal::Success { download_id: number(line, id)?, content_length: number(line, len)? }),
        ["success", ..] => Err(ReplayError::Arity { line, signal: "success", expected: "<download_id> <content_length>" }),

        ["success-file", path, len, rest @ ..] if rest.len() <= 1 => Ok(EngineSignal::SuccessFile {
            file: FinishedFile::new(*path, number(line, len)?),
            mime_type: rest.first().map(|m| m.to_string()),
        }),
        ["success-file", ..] => Err(ReplayError::Arity {
            line,
            signal: "success-file",
            expected: "<file_path> <content_length> [mime_type]",
        }),

        ["error", id] => Ok(EngineSignal::Error { download_id: number(line, id)? }),
        ["error", ..] => Err(ReplayError::Arity { line, signal: "error", expected: "<download_id>" }),

        ["fail-or-cancel", id, r] => Ok(EngineSignal::FailOrCancel { download_id: number(line, id)?, reason: reason(line, r)? }),
        ["fail-or-cancel", ..] => Err(ReplayError::Arity { line, signal: "fail-or-cancel", expected: "<download_id> <reason>" }),

        ["failure", url, r] => Ok(EngineSignal::Failure {
            url: Some(url.to_string()).filter(|u| u != "-"),
            reason: reason(line, r)?,
        }),
        ["failure", ..] => Err(ReplayError::Arity { line, signal: "failure", expected: "<url|-> <reason>" }),

        [other, ..] => Err(ReplayError::UnknownSignal { line, signal: other.to_string() }),
        [] => unreachable!("blank lines are skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_signal_kind() {
        let script = r#"
            # a cancelled and a finished download
            start 0 report.pdf /d/report.pdf application/pdf
            start 12 movie.mp4 /d/movie.mp4
            success 12 1048576
            success-file /d/report.pdf 2048 application/pdf
            error 13
            fail-or-cancel 14 ConnectionRefused
            failure - DataUriParseException   # id-less
        "#;
        let signals = parse_script(script).unwrap();
        assert_eq!(signals.len(), 7);
        assert_eq!(
            signals[0],
            EngineSignal::Start(DownloadItem::started(0, "report.pdf", "/d/report.pdf").with_mime_type("application/pdf"))
        );
        assert_eq!(signals[2], EngineSignal::Success { download_id: 12, content_length: 1048576 });
        assert_eq!(
            signals[3],
            EngineSignal::SuccessFile {
                file: FinishedFile::new("/d/report.pdf", 2048),
                mime_type: Some("application/pdf".into()),
            }
        );
        assert_eq!(
            signals[6],
            EngineSignal::Failure { url: None, reason: DownloadFailReason::DataUriParseException }
        );
    }

    #[test]
    fn reports_line_of_bad_input() {
        assert_eq!(
            parse_script("error 1\npause 2").unwrap_err(),
            ReplayError::UnknownSignal { line: 2, signal: "pause".into() }
        );
        assert_eq!(
            parse_script("success x 10").unwrap_err(),
            ReplayError::Number { line: 1, value: "x".into() }
        );
        assert!(matches!(
            parse_script("\n\nfailure http://x Timeout").unwrap_err(),
            ReplayError::Reason { line: 3, .. }
        ));
        assert!(matches!(parse_script("error").unwrap_err(), ReplayError::Arity { signal: "error", .. }));
    }
}

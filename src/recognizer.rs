use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{EngineError, EngineResult};
use crate::model::RecognitionResult;
use crate::store::Recognizer;

/// Face recognition delegated to an external program:
/// `<program> [args..] <video> --subject <id> [--class <id>]`, JSON on stdout.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: PathBuf,
    args: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectorOutput {
    Ids(Vec<IdValue>),
    Report {
        detected: Vec<IdValue>,
        #[serde(default, alias = "total_students")]
        #[serde(rename = "totalStudents")]
        total_students: usize,
        #[serde(default, alias = "detected_count")]
        #[serde(rename = "detectedCount")]
        detected_count: Option<usize>,
    },
}

/// Detectors keyed on integer primary keys report numbers; everything here is a string id.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(i64),
}

impl IdValue {
    fn into_id(self) -> String {
        match self {
            IdValue::Text(s) => s,
            IdValue::Number(n) => n.to_string(),
        }
    }
}

pub fn parse_detector_output(stdout: &str) -> EngineResult<RecognitionResult> {
    let parsed: DetectorOutput = serde_json::from_str(stdout.trim()).map_err(|e| {
        EngineError::ProcessingFailed(format!("unreadable detector output: {}", e))
    })?;
    Ok(match parsed {
        DetectorOutput::Ids(ids) => {
            RecognitionResult::from_detected(ids.into_iter().map(IdValue::into_id))
        }
        DetectorOutput::Report {
            detected,
            total_students,
            detected_count,
        } => {
            let mut result =
                RecognitionResult::from_detected(detected.into_iter().map(IdValue::into_id));
            result.total_students = total_students;
            if let Some(n) = detected_count {
                result.detected_count = n;
            }
            result
        }
    })
}

impl CommandRecognizer {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Recognizer for CommandRecognizer {
    fn detect(
        &self,
        video: &Path,
        subject_id: &str,
        class_id: Option<&str>,
    ) -> EngineResult<RecognitionResult> {
        if !video.is_file() {
            return Err(EngineError::ProcessingFailed(format!(
                "video not found: {}",
                video.display()
            )));
        }
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(video)
            .arg("--subject")
            .arg(subject_id);
        if let Some(c) = class_id {
            cmd.arg("--class").arg(c);
        }
        log::info!(
            "running recognizer {} on {}",
            self.program.display(),
            video.display()
        );
        let output = cmd
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                EngineError::ProcessingFailed(format!(
                    "failed to start {}: {}",
                    self.program.display(),
                    e
                ))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::ProcessingFailed(format!(
                "recognizer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let result = parse_detector_output(&stdout)?;
        log::info!("recognizer detected {} students", result.detected.len());
        Ok(result)
    }
}

use crate::core::headers::resolve_headers;
use crate::domain::model::{
    Alert, FileStatus, LogEntry, Row, RunStatus, SourceFile, View,
};
use std::collections::HashMap;

/// Everything the pipeline can tell the outside world. One action at a time,
/// applied through [`PipelineState::apply`].
#[derive(Debug, Clone)]
pub enum Action {
    SetFiles(Vec<SourceFile>),
    ProcessingStart,
    AddLogEntry(LogEntry),
    SetFileStatus { name: String, status: FileStatus },
    ProcessingSuccess(Vec<Row>),
    ProcessingError(Alert),
    SetError(Alert),
    Reset,
}

#[derive(Debug, Clone)]
pub struct PipelineState {
    pub view: View,
    pub status: RunStatus,
    pub files: Vec<SourceFile>,
    pub file_statuses: HashMap<String, FileStatus>,
    pub log: Vec<LogEntry>,
    pub rows: Vec<Row>,
    pub headers: Vec<String>,
    pub alert: Option<Alert>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            view: View::Upload,
            status: RunStatus::Idle,
            files: Vec::new(),
            file_statuses: HashMap::new(),
            log: Vec::new(),
            rows: Vec::new(),
            headers: Vec::new(),
            alert: None,
        }
    }
}

impl PipelineState {
    /// Pure transition function. Guarding against overlapping runs is the
    /// caller's job; late log/status events settle into whatever state the
    /// run ended in without changing its kind.
    pub fn apply(mut self, action: Action) -> PipelineState {
        match action {
            Action::SetFiles(files) => {
                self.file_statuses = files
                    .iter()
                    .map(|file| (file.name.clone(), FileStatus::Pending))
                    .collect();
                self.files = files;
                self.alert = None;
                self
            }
            Action::ProcessingStart => {
                self.status = RunStatus::Processing;
                self.view = View::Upload;
                self.log.clear();
                self.rows.clear();
                self.headers.clear();
                self.alert = None;
                self
            }
            Action::AddLogEntry(entry) => {
                self.log.push(entry);
                self
            }
            Action::SetFileStatus { name, status } => {
                self.file_statuses.insert(name, status);
                self
            }
            Action::ProcessingSuccess(rows) => {
                self.headers = resolve_headers(&rows);
                self.rows = rows;
                self.status = RunStatus::Success;
                self.view = View::Results;
                self.alert = None;
                self.files.clear();
                self.file_statuses.clear();
                self
            }
            Action::ProcessingError(alert) => {
                self.status = RunStatus::Error;
                self.view = View::Upload;
                self.alert = Some(alert);
                self.files.clear();
                self.file_statuses.clear();
                self
            }
            Action::SetError(alert) => {
                self.alert = Some(alert);
                self
            }
            Action::Reset => PipelineState::default(),
        }
    }
}

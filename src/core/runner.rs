use crate::core::dedupe::dedupe_rows;
use crate::core::state::Action;
use crate::domain::model::{Alert, FileStatus, LogEntry, LogLevel, Row, SourceFile};
use crate::domain::ports::{ImageEncoder, Recognizer};
use crate::utils::error::ExtractError;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Drives the per-file extraction lifecycle: encode, recognize, tag, then a
/// single terminal decision over the aggregate. Progress is reported as
/// [`Action`]s on the channel; each file's own events arrive in lifecycle
/// order even when files run concurrently.
pub struct ExtractionRunner<R, E> {
    recognizer: Arc<R>,
    encoder: Arc<E>,
    concurrent_requests: usize,
}

enum FileOutcome {
    Extracted(Vec<Row>),
    Failed(String),
    Cancelled,
}

impl<R, E> ExtractionRunner<R, E>
where
    R: Recognizer + 'static,
    E: ImageEncoder + 'static,
{
    pub fn new(recognizer: Arc<R>, encoder: Arc<E>, concurrent_requests: usize) -> Self {
        Self {
            recognizer,
            encoder,
            concurrent_requests,
        }
    }

    /// Processes `files` and emits actions until one terminal action has been
    /// sent. A dropped receiver cancels the run: no further files are
    /// launched and in-flight results are discarded.
    pub async fn run(&self, files: Vec<SourceFile>, actions: mpsc::UnboundedSender<Action>) {
        if files.is_empty() {
            let _ = actions.send(Action::SetError(Alert::warning(
                "No files",
                "Please select at least one image file to process.",
            )));
            return;
        }

        if actions.send(Action::ProcessingStart).is_err() {
            return;
        }

        tracing::debug!(
            "Processing {} file(s) with up to {} concurrent request(s)",
            files.len(),
            self.concurrent_requests.max(1)
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests.max(1)));
        let mut handles = Vec::with_capacity(files.len());

        for file in files {
            if actions.is_closed() {
                break;
            }

            let recognizer = Arc::clone(&self.recognizer);
            let encoder = Arc::clone(&self.encoder);
            let semaphore = Arc::clone(&semaphore);
            let tx = actions.clone();
            let name = file.name.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return FileOutcome::Cancelled,
                };
                process_file(file, recognizer, encoder, tx).await
            });
            handles.push((name, handle));
        }

        // Rows are gathered in input-file order, not completion order, so
        // deduplication keeps the earliest file's copy.
        let mut collected: Vec<Row> = Vec::new();
        let mut failures: Vec<(String, String)> = Vec::new();

        for (name, handle) in handles {
            match handle.await {
                Ok(FileOutcome::Extracted(rows)) => collected.extend(rows),
                Ok(FileOutcome::Failed(message)) => failures.push((name, message)),
                Ok(FileOutcome::Cancelled) => {}
                Err(join_error) => {
                    let message = format!("extraction task failed: {}", join_error);
                    emit(
                        &actions,
                        log_entry(
                            LogLevel::Error,
                            format!("Error processing \"{}\": {}", name, message),
                        ),
                    );
                    emit(
                        &actions,
                        Action::SetFileStatus {
                            name: name.clone(),
                            status: FileStatus::Error,
                        },
                    );
                    failures.push((name, message));
                }
            }
        }

        if collected.is_empty() {
            if let Some((name, message)) = failures.last() {
                emit(
                    &actions,
                    Action::ProcessingError(Alert::error(
                        "Processing Failed",
                        format!(
                            "Could not extract data from any files. Last error ({}): {}",
                            name, message
                        ),
                    )),
                );
            } else {
                emit(
                    &actions,
                    Action::ProcessingError(Alert::info(
                        "No Data Extracted",
                        "Finished processing, but no structured data could be extracted \
                         from the selected files.",
                    )),
                );
            }
            return;
        }

        let unique = dedupe_rows(collected);
        emit(
            &actions,
            log_entry(
                LogLevel::Success,
                format!("De-duplication complete. Found {} unique rows.", unique.len()),
            ),
        );
        emit(&actions, Action::ProcessingSuccess(unique));

        // Partial success stays success; the failed files surface as a
        // non-blocking warning after the terminal action.
        if !failures.is_empty() {
            let failed_names: Vec<&str> =
                failures.iter().map(|(name, _)| name.as_str()).collect();
            emit(
                &actions,
                Action::SetError(Alert::warning(
                    "Partial Success",
                    format!(
                        "Could not process {} file(s): {}",
                        failed_names.len(),
                        failed_names.join(", ")
                    ),
                )),
            );
        }
    }
}

async fn process_file<R: Recognizer, E: ImageEncoder>(
    file: SourceFile,
    recognizer: Arc<R>,
    encoder: Arc<E>,
    actions: mpsc::UnboundedSender<Action>,
) -> FileOutcome {
    let name = file.name.clone();

    if !emit(
        &actions,
        log_entry(LogLevel::Info, format!("Starting to process \"{}\"...", name)),
    ) {
        return FileOutcome::Cancelled;
    }
    emit(
        &actions,
        Action::SetFileStatus {
            name: name.clone(),
            status: FileStatus::Processing,
        },
    );

    emit(
        &actions,
        log_entry(
            LogLevel::Info,
            format!("Converting \"{}\" to base64...", name),
        ),
    );
    let image = match encoder.encode(&file).await {
        Ok(image) => image,
        Err(error) => return report_failure(&actions, &name, error),
    };

    if !emit(
        &actions,
        log_entry(
            LogLevel::Info,
            format!("Sending \"{}\" for data extraction...", name),
        ),
    ) {
        return FileOutcome::Cancelled;
    }
    let extracted = match recognizer.extract_rows(std::slice::from_ref(&image)).await {
        Ok(rows) => rows,
        Err(error) => return report_failure(&actions, &name, error),
    };

    // An empty result is not a failure: the file was readable, it just held
    // no structured data.
    if extracted.is_empty() {
        emit(
            &actions,
            log_entry(
                LogLevel::Warning,
                format!("No structured data found in \"{}\".", name),
            ),
        );
    } else {
        emit(
            &actions,
            log_entry(
                LogLevel::Success,
                format!(
                    "Successfully extracted {} row(s) from \"{}\".",
                    extracted.len(),
                    name
                ),
            ),
        );
    }
    emit(
        &actions,
        Action::SetFileStatus {
            name: name.clone(),
            status: FileStatus::Success,
        },
    );

    let rows = extracted
        .into_iter()
        .map(|row| Row::with_source(&name, row.fields))
        .collect();
    FileOutcome::Extracted(rows)
}

fn report_failure(
    actions: &mpsc::UnboundedSender<Action>,
    name: &str,
    error: ExtractError,
) -> FileOutcome {
    let message = error.to_string();
    emit(
        actions,
        log_entry(
            LogLevel::Error,
            format!("Error processing \"{}\": {}", name, message),
        ),
    );
    emit(
        actions,
        Action::SetFileStatus {
            name: name.to_string(),
            status: FileStatus::Error,
        },
    );
    FileOutcome::Failed(message)
}

fn emit(actions: &mpsc::UnboundedSender<Action>, action: Action) -> bool {
    actions.send(action).is_ok()
}

fn log_entry(level: LogLevel, message: String) -> Action {
    Action::AddLogEntry(LogEntry::new(level, message))
}

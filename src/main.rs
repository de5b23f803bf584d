use clap::Parser;
use snaptable::config::profile::ProfileConfig;
use snaptable::core::Storage;
use snaptable::domain::model::{LogLevel, RunStatus, Severity, SourceFile};
use snaptable::export;
use snaptable::utils::monitor::SystemMonitor;
use snaptable::utils::{logger, validation::Validate};
use snaptable::{
    Action, CliConfig, ExtractionRunner, FileSystemEncoder, GeminiRecognizer, LocalStorage,
    PipelineState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌（未知格式稍後由驗證攔截）
    match config.log_format.as_str() {
        "json" => logger::init_json_logger(config.verbose),
        _ => logger::init_cli_logger(config.verbose),
    }

    tracing::info!("Starting snaptable CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入設定檔（設定值優先於旗標）
    if let Some(profile_path) = config.config.clone() {
        match ProfileConfig::from_file(&profile_path) {
            Ok(profile) => profile.apply(&mut config),
            Err(e) => {
                tracing::error!("❌ Could not load profile {}: {}", profile_path, e);
                eprintln!("❌ Could not load profile {}: {}", profile_path, e);
                std::process::exit(1);
            }
        }
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let api_key = match config.require_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("❌ {} (pass --api-key or set GEMINI_API_KEY)", e);
            std::process::exit(1);
        }
    };

    let monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
        monitor.log_stats("startup");
    }

    let files: Vec<SourceFile> = config
        .files
        .iter()
        .map(|raw| SourceFile::from_path(raw))
        .collect();

    let recognizer = GeminiRecognizer::new(
        &config.endpoint,
        &api_key,
        &config.model,
        Duration::from_secs(config.timeout_seconds),
    )?;
    let runner = ExtractionRunner::new(
        Arc::new(recognizer),
        Arc::new(FileSystemEncoder),
        config.concurrent_requests,
    );

    let mut state = PipelineState::default().apply(Action::SetFiles(files.clone()));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let runner_task = tokio::spawn(async move { runner.run(files, tx).await });

    // 將管道事件鏡射到終端，同時折疊成最終狀態
    while let Some(action) = rx.recv().await {
        if let Action::AddLogEntry(entry) = &action {
            match entry.level {
                LogLevel::Info => tracing::info!("{}", entry.message),
                LogLevel::Success => tracing::info!("✅ {}", entry.message),
                LogLevel::Warning => tracing::warn!("⚠️ {}", entry.message),
                LogLevel::Error => tracing::error!("❌ {}", entry.message),
            }
        }
        state = state.apply(action);
    }
    runner_task.await?;

    monitor.log_stats("extraction complete");

    match state.status {
        RunStatus::Success => {
            let storage = LocalStorage::new(config.output_path.clone());
            let mut artifacts: Vec<(String, String)> = Vec::new();

            for format in &config.formats {
                match format.as_str() {
                    "json" => artifacts.push((
                        "data.json".to_string(),
                        export::json::generate_json(&state.rows)?,
                    )),
                    "csv" => artifacts.push((
                        "data.csv".to_string(),
                        export::csv::generate_csv(&state.rows, &state.headers)?,
                    )),
                    "sql" => artifacts.push((
                        format!("{}.sql", config.table_name),
                        export::sql::generate_sql(&state.rows, &config.table_name),
                    )),
                    other => tracing::warn!("⚠️ Skipping unknown format: {}", other),
                }
            }

            if config.bundle {
                let archive = export::bundle::bundle_artifacts(&artifacts)?;
                storage.write_file("snaptable_export.zip", &archive).await?;
                tracing::info!("💾 Wrote {}/snaptable_export.zip", config.output_path);
            } else {
                for (name, content) in &artifacts {
                    storage.write_file(name, content.as_bytes()).await?;
                    tracing::info!("💾 Wrote {}/{}", config.output_path, name);
                }
            }

            println!(
                "✅ Extraction complete: {} unique row(s) from {} file(s).",
                state.rows.len(),
                config.files.len()
            );
            println!("📁 Output saved to: {}", config.output_path);

            if let Some(alert) = &state.alert {
                println!("⚠️ {}: {}", alert.title, alert.message);
            }
        }
        _ => {
            if let Some(alert) = &state.alert {
                match alert.severity {
                    Severity::Error => {
                        tracing::error!("❌ {}: {}", alert.title, alert.message);
                        eprintln!("❌ {}: {}", alert.title, alert.message);
                        std::process::exit(1);
                    }
                    Severity::Warning => {
                        tracing::warn!("⚠️ {}: {}", alert.title, alert.message);
                        eprintln!("⚠️ {}: {}", alert.title, alert.message);
                    }
                    Severity::Info => {
                        tracing::info!("{}: {}", alert.title, alert.message);
                        println!("{}: {}", alert.title, alert.message);
                    }
                }
            }
        }
    }

    monitor.log_final_stats();

    Ok(())
}

//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::database::Destination;
use crate::decode::{source_for, DecoderFormat};
use crate::engine::LoadEngine;
use crate::error::{Error, Result};
use crate::job::{load_job, LoadJobDefinition};
use crate::template::TemplateContext;
use serde_json::{json, Value};
use std::fs;
use std::io::BufReader;
use tokio_util::sync::CancellationToken;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Load {
                input,
                input_format,
                config_json,
            } => {
                self.load(input, *input_format, config_json.as_deref())
                    .await
            }
            Commands::Schema { config_json } => self.schema(config_json.as_deref()).await,
            Commands::Check { config_json } => self.check(config_json.as_deref()).await,
            Commands::Tables { config_json } => self.tables(config_json.as_deref()).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load job definition
    fn load_job(&self) -> Result<LoadJobDefinition> {
        let path = self
            .cli
            .job
            .as_ref()
            .ok_or_else(|| Error::config("Job file not specified (use -j flag)"))?;
        load_job(path)
    }

    /// Load configuration
    fn load_config(&self, inline: Option<&str>) -> Result<Value> {
        // Inline config takes precedence
        if let Some(json_str) = inline {
            return serde_json::from_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        if let Some(path) = &self.cli.config {
            let content = fs::read_to_string(path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::FileNotFound {
                    path: path.display().to_string(),
                },
                _ => Error::Io(e),
            })?;
            return serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        Ok(json!({}))
    }

    /// Job plus the template context its destination renders against
    fn prepare(&self, config_json: Option<&str>) -> Result<(LoadJobDefinition, TemplateContext)> {
        let job = self.load_job()?;
        let config = self.load_config(config_json)?;
        Ok((job, TemplateContext::with_config(config)))
    }

    /// Load records into the destination table
    async fn load(
        &self,
        input: &str,
        format: DecoderFormat,
        config_json: Option<&str>,
    ) -> Result<()> {
        let (job, context) = self.prepare(config_json)?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Starting load job '{}' into {}", job.name, job.table)
            }
        }));

        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupt received, cancelling load");
                    cancel.cancel();
                }
            })
        };

        let input = input.to_string();
        let token = cancel.clone();
        let result = blocking(move || {
            let mut source = if input == "-" {
                source_for(format, BufReader::new(std::io::stdin()))
            } else {
                let file = fs::File::open(&input).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => Error::FileNotFound {
                        path: input.clone(),
                    },
                    _ => Error::Io(e),
                })?;
                source_for(format, BufReader::new(file))
            };
            let mut engine = LoadEngine::from_job(&job, &context)?;
            engine.run(source.as_mut(), &token)
        })
        .await;
        watcher.abort();

        let report = result?;
        self.output_message(&json!({
            "type": "LOAD_REPORT",
            "report": report
        }));

        Ok(())
    }

    /// Show the destination table's column catalog
    async fn schema(&self, config_json: Option<&str>) -> Result<()> {
        let (job, context) = self.prepare(config_json)?;

        let (table, columns) = blocking(move || {
            let destination = Destination::open(&job.destination, &context)?;
            let table = destination.resolve_table(&job.table)?;
            let columns = destination.fetch_columns(&table)?;
            Ok((table.qualified(), columns))
        })
        .await?;

        self.output_message(&json!({
            "type": "SCHEMA",
            "table": table,
            "columns": columns
        }));

        Ok(())
    }

    /// Check destination connection
    async fn check(&self, config_json: Option<&str>) -> Result<()> {
        let (job, context) = self.prepare(config_json)?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Checking connection to {} destination", job.destination.engine)
            }
        }));

        let status = blocking(move || {
            let destination = match Destination::open(&job.destination, &context) {
                Ok(destination) => destination,
                Err(e) => return Ok(Err(format!("Failed to connect: {e}"))),
            };
            match destination.check_connection() {
                Ok(()) => {
                    let table_count = destination.list_tables().map(|t| t.len()).unwrap_or(0);
                    Ok(Ok(format!(
                        "Connection successful. Found {table_count} tables."
                    )))
                }
                Err(e) => Ok(Err(format!("Connection check failed: {e}"))),
            }
        })
        .await?;

        let (status, message) = match status {
            Ok(message) => ("SUCCEEDED", message),
            Err(message) => ("FAILED", message),
        };
        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message
            }
        }));

        Ok(())
    }

    /// List destination tables
    async fn tables(&self, config_json: Option<&str>) -> Result<()> {
        let (job, context) = self.prepare(config_json)?;
        let engine = job.destination.engine;

        let tables = blocking(move || {
            let destination = Destination::open(&job.destination, &context)?;
            destination.list_tables()
        })
        .await?;

        self.output_message(&json!({
            "type": "TABLES",
            "tables": tables,
            "engine": engine.to_string()
        }));

        Ok(())
    }

    /// Validate job definition
    fn validate(&self) -> Result<()> {
        let job = self.load_job()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Load job '{}' is valid: {} destination, table {}, batch size {}",
                    job.name,
                    job.destination.engine,
                    job.table,
                    job.max_batch_size
                )
            }
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Run synchronous DuckDB work off the async runtime
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Other(format!("Blocking task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_load_command() {
        let cli = Cli::try_parse_from([
            "batchload",
            "-j",
            "job.yaml",
            "load",
            "--input",
            "rows.json",
            "--input-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Load {
                input,
                input_format,
                config_json,
            } => {
                assert_eq!(input, "rows.json");
                assert_eq!(input_format, DecoderFormat::Json);
                assert!(config_json.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_load_defaults_to_stdin_jsonl() {
        let cli = Cli::try_parse_from(["batchload", "load"]).unwrap();
        match cli.command {
            Commands::Load {
                input,
                input_format,
                ..
            } => {
                assert_eq!(input, "-");
                assert_eq!(input_format, DecoderFormat::Jsonl);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_input_format_rejected() {
        let result = Cli::try_parse_from(["batchload", "load", "--input-format", "csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inline_config_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "config.json", r#"{"db": "file"}"#);
        let cli = Cli::try_parse_from([
            "batchload",
            "-C",
            path.to_str().unwrap(),
            "validate",
        ])
        .unwrap();
        let runner = Runner::new(cli);

        assert_eq!(runner.load_config(None).unwrap(), json!({"db": "file"}));
        assert_eq!(
            runner.load_config(Some(r#"{"db": "inline"}"#)).unwrap(),
            json!({"db": "inline"})
        );
        assert!(runner.load_config(Some("{not json")).is_err());
    }

    #[test]
    fn test_missing_config_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let cli = Cli::try_parse_from([
            "batchload",
            "-C",
            missing.to_str().unwrap(),
            "validate",
        ])
        .unwrap();

        let err = Runner::new(cli).load_config(None).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }), "{err}");
        assert_eq!(err.phase(), "io");
    }

    #[test]
    fn test_validate_requires_job() {
        let cli = Cli::try_parse_from(["batchload", "validate"]).unwrap();
        let err = Runner::new(cli).validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_load_command_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("dest.duckdb");
        {
            let conn = duckdb::Connection::open(&db_path).unwrap();
            conn.execute_batch("CREATE TABLE events (id INTEGER NOT NULL, kind VARCHAR);")
                .unwrap();
        }
        let job = write_file(
            &dir,
            "job.yaml",
            r#"
name: events
destination:
  engine: duckdb
  database: "{{ config.path }}"
table: events
max_batch_size: 2
"#,
        );
        let input = write_file(
            &dir,
            "events.jsonl",
            "{\"id\":1,\"kind\":\"a\"}\n{\"id\":2}\n{\"id\":\"3\",\"kind\":\"c\"}\n",
        );
        let config = json!({ "path": db_path.to_str().unwrap() }).to_string();

        let cli = Cli::try_parse_from([
            "batchload",
            "-j",
            job.to_str().unwrap(),
            "load",
            "-i",
            input.to_str().unwrap(),
            "--config-json",
            &config,
        ])
        .unwrap();
        Runner::new(cli).run().await.unwrap();

        let conn = duckdb::Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_load_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = write_file(
            &dir,
            "job.yaml",
            "name: j\ndestination:\n  engine: duckdb\n  database: \":memory:\"\ntable: t\n",
        );
        let cli = Cli::try_parse_from([
            "batchload",
            "-j",
            job.to_str().unwrap(),
            "load",
            "-i",
            dir.path().join("absent.jsonl").to_str().unwrap(),
        ])
        .unwrap();

        let err = Runner::new(cli).run().await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }), "{err}");
    }
}

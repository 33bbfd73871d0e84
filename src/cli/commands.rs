//! CLI command implementations
//!
//! Commands only read configuration and render SQL; none of them opens a
//! database connection.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::{GatewayConfig, Snapshot};
use crate::dialect::DialectKind;
use crate::finder;
use crate::gateway::{read_statement, MetadataSource, ReadOptions};
use crate::model::Table;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_line};

/// Parse arguments and run the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::CheckConfig { config } => check_config(&config),
        Command::Render {
            config,
            alias,
            resource,
            finder,
            args,
            limit,
            offset,
        } => {
            let request = RenderRequest {
                alias,
                resource,
                finder,
                args,
                limit,
                offset,
            };
            render(&config, &request)
        }
        Command::TablesStatement { dialect } => tables_statement(&dialect),
    }
}

/// Validate the file and print one summary object
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = GatewayConfig::load(config_path)?;
    write_json(&config_summary(&config))
}

fn config_summary(config: &GatewayConfig) -> Value {
    let aliases: Vec<Value> = config
        .aliases
        .iter()
        .map(|a| {
            json!({
                "name": a.name,
                "dialect": a.dialect.as_str(),
                "database": a.database,
                "tables": a.tables.len(),
            })
        })
        .collect();

    json!({
        "root": config.server.normalized_root(),
        "address": config.server.socket_addr(),
        "aliases": aliases,
    })
}

/// A read to render
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub alias: String,
    pub resource: String,
    pub finder: Option<String>,
    pub args: Vec<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub fn render(config_path: &Path, request: &RenderRequest) -> CliResult<()> {
    let snapshot = GatewayConfig::load(config_path)?.snapshot()?;
    write_json(&render_read(&snapshot, request)?)
}

/// Render the page and count statements of a read
pub fn render_read(snapshot: &Snapshot, request: &RenderRequest) -> CliResult<Value> {
    let dialect = snapshot
        .dialects
        .get(&request.alias)
        .ok_or_else(|| CliError::unknown_alias(&request.alias))?;

    let table = match snapshot.metadata.table(&request.alias, &request.resource) {
        Some(table) => table,
        None => Arc::new(
            Table::unresolved(&request.resource)
                .map_err(|e| CliError::render_failed(e.to_string()))?,
        ),
    };

    let predicates = match &request.finder {
        Some(expression) => Some(
            finder::parse_finder(&table, expression, Some(request.args.as_slice()))
                .map_err(|e| CliError::render_failed(e.to_string()))?,
        ),
        None => None,
    };

    let options = ReadOptions {
        limit: request.limit.clone(),
        offset: request.offset.clone(),
        ..Default::default()
    };
    let (statement, _) = read_statement(table, predicates, &options)
        .map_err(|e| CliError::render_failed(e.to_string()))?;

    Ok(json!({
        "dialect": dialect.kind().as_str(),
        "select": dialect.render_select(&statement),
        "count": dialect.render_count(&statement),
    }))
}

pub fn tables_statement(dialect: &str) -> CliResult<()> {
    let kind: DialectKind = dialect.parse().map_err(CliError::unknown_dialect)?;
    write_line(kind.dialect().list_tables_statement())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;

    fn snapshot() -> Snapshot {
        GatewayConfig::from_json(
            r#"{"aliases":[{"name":"demo1","dialect":"hsql","database":"demo1",
                "tables":[{"name":"car","primary_key":"cid","columns":[
                    {"name":"cid","type":"integer"},
                    {"name":"maker","type":"text"},
                    {"name":"month","type":"integer"}]}]}]}"#,
        )
        .unwrap()
        .snapshot()
        .unwrap()
    }

    #[test]
    fn test_render_plain_list() {
        let rendered = render_read(
            &snapshot(),
            &RenderRequest {
                alias: "demo1".into(),
                resource: "car".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rendered["select"]["sql"], "SELECT * FROM car LIMIT 25 OFFSET 0");
        assert_eq!(rendered["count"]["sql"], "SELECT COUNT(*) FROM car");
    }

    #[test]
    fn test_render_finder() {
        let rendered = render_read(
            &snapshot(),
            &RenderRequest {
                alias: "demo1".into(),
                resource: "car".into(),
                finder: Some("findAllByMakerLikeAndMonthLessThanEquals".into()),
                args: vec!["A%".into(), "4".into()],
                limit: Some("10".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            rendered["select"]["sql"],
            "SELECT * FROM car WHERE maker LIKE ? AND month <= ? LIMIT 10 OFFSET 0"
        );
        assert_eq!(rendered["select"]["binds"], json!(["A%", "4"]));
    }

    #[test]
    fn test_render_unknown_alias() {
        let err = render_read(
            &snapshot(),
            &RenderRequest {
                alias: "nope".into(),
                resource: "car".into(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UnknownAlias);
    }

    #[test]
    fn test_tables_statement_unknown_dialect() {
        let err = tables_statement("sqlite").unwrap_err();
        assert_eq!(err.code_str(), "TABLEGATE_CLI_UNKNOWN_DIALECT");
    }
}

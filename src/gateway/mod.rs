//! # Request Orchestrator
//!
//! Runs one resource operation end to end:
//!
//! 1. required parameters must be non-empty, else BAD_REQUEST
//! 2. the resource is resolved through the metadata source; unknown names
//!    are left for the database to reject. Names that are not valid
//!    identifiers never reach SQL text and are rejected here with
//!    BAD_REQUEST and sqlState 42602
//! 3. access control, denial is BAD_REQUEST
//! 4. the statement is built, rendered with the alias dialect and executed
//! 5. success carries rows, plus pagination for list and search operations
//! 6. driver failures are classified by the error taxonomy
//!
//! Every operation returns `Ok(Envelope)` for anything the caller can be
//! told about, and `Err(ContractError)` only when the caller broke the
//! operation contract.

pub mod collaborators;
pub mod envelope;
pub mod errors;

use std::sync::Arc;

use serde_json::{json, Value};

use crate::acl::{AccessControl, Operation};
use crate::dialect::{Dialect, DialectRegistry, RenderedSql};
use crate::finder::{self, FinderError};
use crate::model::{
    Direction, ModelError, ModelResult, Mutation, Ordering, PagingWindow, Pagination, Payload,
    Predicate, PredicateSet, Statement, StoredCall, Table,
};
use crate::observability::{log_event_with_fields, Event};
use crate::taxonomy::{self, Intent, OutcomeCategory};

pub use collaborators::{
    DatabaseDriver, DriverError, ExecutionOutcome, MetadataSource, Row, StaticMetadata,
};
pub use envelope::Envelope;
pub use errors::{ContractError, ContractResult};

/// Who asks for which resource of which alias
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub alias: &'a str,
    pub resource: &'a str,
    pub principal: &'a str,
}

impl<'a> Target<'a> {
    pub fn new(alias: &'a str, resource: &'a str, principal: &'a str) -> Self {
        Self {
            alias,
            resource,
            principal,
        }
    }
}

/// Raw read parameters: `limit`, `offset`, `sort`, `dir` and `cols`
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub columns: Option<String>,
}

/// Create/update request body
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    Json(&'a str),
    /// Raw `application/x-www-form-urlencoded` bytes
    Form(&'a [u8]),
}

impl Body<'_> {
    fn payload(&self) -> ModelResult<Payload> {
        match self {
            Body::Json(text) => Payload::from_json(text),
            Body::Form(bytes) => Payload::from_form(bytes),
        }
    }
}

/// Why an operation stopped early
enum Halt {
    Contract(ContractError),
    Reply(Envelope),
}

impl From<ContractError> for Halt {
    fn from(err: ContractError) -> Self {
        Halt::Contract(err)
    }
}

impl From<ModelError> for Halt {
    fn from(err: ModelError) -> Self {
        Halt::Reply(Envelope::rejected(OutcomeCategory::BadRequest, err.to_string()))
    }
}

impl From<FinderError> for Halt {
    fn from(err: FinderError) -> Self {
        if err.is_precondition() {
            Halt::Contract(ContractError::MissingArguments)
        } else {
            Halt::Reply(Envelope::rejected(err.category(), err.to_string()))
        }
    }
}

type Step<T> = Result<T, Halt>;

fn finish(result: Step<Envelope>) -> ContractResult<Envelope> {
    match result {
        Ok(envelope) | Err(Halt::Reply(envelope)) => Ok(envelope),
        Err(Halt::Contract(err)) => Err(err),
    }
}

fn require(name: &str, value: &str) -> Step<()> {
    if value.trim().is_empty() {
        return Err(Halt::Reply(Envelope::rejected(
            OutcomeCategory::BadRequest,
            format!("Missing required parameter: {}", name),
        )));
    }
    Ok(())
}

/// The gateway core, shared by every request
#[derive(Clone)]
pub struct Gateway {
    dialects: DialectRegistry,
    metadata: Arc<dyn MetadataSource>,
    access: AccessControl,
    driver: Arc<dyn DatabaseDriver>,
}

impl Gateway {
    pub fn new(
        dialects: DialectRegistry,
        metadata: Arc<dyn MetadataSource>,
        access: AccessControl,
        driver: Arc<dyn DatabaseDriver>,
    ) -> Self {
        Self {
            dialects,
            metadata,
            access,
            driver,
        }
    }

    pub fn dialects(&self) -> &DialectRegistry {
        &self.dialects
    }

    // ==================
    // Operations
    // ==================

    /// Names of every table reachable through `alias`
    pub fn metadata(&self, alias: &str, principal: &str) -> ContractResult<Envelope> {
        finish(self.metadata_step(alias, principal))
    }

    /// Columns of one resource
    pub fn resource_metadata(&self, target: Target<'_>) -> ContractResult<Envelope> {
        finish(self.resource_metadata_step(target))
    }

    /// One page of a resource
    pub fn list(&self, target: Target<'_>, options: &ReadOptions) -> ContractResult<Envelope> {
        finish(self.list_step(target, options))
    }

    /// One record by key. `key_column` overrides the table's primary key.
    pub fn get(
        &self,
        target: Target<'_>,
        key_column: Option<&str>,
        id: &str,
    ) -> ContractResult<Envelope> {
        finish(self.get_step(target, key_column, id))
    }

    /// Records whose `column` equals `value`
    pub fn find_by_column(
        &self,
        target: Target<'_>,
        column: &str,
        value: &str,
        options: &ReadOptions,
    ) -> ContractResult<Envelope> {
        finish(self.find_by_column_step(target, column, value, options))
    }

    /// Records matching a dynamic finder expression
    pub fn find(
        &self,
        target: Target<'_>,
        expression: &str,
        arguments: Option<&[String]>,
        options: &ReadOptions,
    ) -> ContractResult<Envelope> {
        finish(self.find_step(target, expression, arguments, options))
    }

    /// Insert one record
    pub fn create(&self, target: Target<'_>, body: &Body<'_>) -> ContractResult<Envelope> {
        finish(self.create_step(target, body))
    }

    /// Update one record by key
    pub fn update(
        &self,
        target: Target<'_>,
        key_column: Option<&str>,
        id: &str,
        body: &Body<'_>,
    ) -> ContractResult<Envelope> {
        finish(self.update_step(target, key_column, id, body))
    }

    /// Delete one record by key
    pub fn delete(
        &self,
        target: Target<'_>,
        key_column: Option<&str>,
        id: &str,
    ) -> ContractResult<Envelope> {
        finish(self.delete_step(target, key_column, id))
    }

    /// Call a stored routine. `target.resource` is the routine name and
    /// `parameters` the JSON parameter array (empty for none).
    pub fn call(&self, target: Target<'_>, parameters: &str) -> ContractResult<Envelope> {
        finish(self.call_step(target, parameters))
    }

    // ==================
    // Steps
    // ==================

    fn metadata_step(&self, alias: &str, principal: &str) -> Step<Envelope> {
        require("alias", alias)?;
        let dialect = self.dialect(alias)?;
        self.authorize(Target::new(alias, "", principal), Operation::Read)?;

        let names = self
            .driver
            .list_tables(alias, dialect.list_tables_statement())
            .map_err(|e| self.driver_failure(dialect.as_ref(), alias, e, Intent::Read))?;

        let rows = names
            .into_iter()
            .map(|name| single("name", Value::String(name)))
            .collect();
        Ok(Envelope::ok(rows))
    }

    fn resource_metadata_step(&self, target: Target<'_>) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Read)?;

        if table.is_resolved() {
            let rows = table
                .columns()
                .iter()
                .map(|c| {
                    let mut row = Row::new();
                    row.insert("name".to_string(), json!(c.name));
                    row.insert("type".to_string(), json!(c.column_type.as_str()));
                    row.insert(
                        "primaryKey".to_string(),
                        json!(c.name.eq_ignore_ascii_case(table.primary_key())),
                    );
                    row
                })
                .collect();
            return Ok(Envelope::ok(rows));
        }

        // Unknown to metadata: let the database describe it
        let sample = Statement::select(table).with_paging(PagingWindow::new(1, 0)?);
        let outcome = self.run(
            dialect.as_ref(),
            target.alias,
            &dialect.render_select(&sample),
            Intent::Read,
        )?;
        let rows = outcome
            .columns
            .into_iter()
            .map(|name| single("name", Value::String(name)))
            .collect();
        Ok(Envelope::ok(rows))
    }

    fn list_step(&self, target: Target<'_>, options: &ReadOptions) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Read)?;

        let (statement, paging) = read_statement(table, None, options)?;
        let (rows, pagination) = self.page(dialect.as_ref(), target.alias, &statement, paging)?;
        Ok(Envelope::page(rows, pagination))
    }

    fn get_step(
        &self,
        target: Target<'_>,
        key_column: Option<&str>,
        id: &str,
    ) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        require("id", id)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Read)?;

        let key = key_column.unwrap_or(table.primary_key()).to_string();
        let statement = Statement::select(table)
            .with_predicates(PredicateSet::single(Predicate::equals(key, id)))?;
        let outcome = self.run(
            dialect.as_ref(),
            target.alias,
            &dialect.render_select(&statement),
            Intent::Read,
        )?;

        if outcome.rows.is_empty() {
            return Ok(Envelope::status(OutcomeCategory::NotFound));
        }
        Ok(Envelope::ok(outcome.rows))
    }

    fn find_by_column_step(
        &self,
        target: Target<'_>,
        column: &str,
        value: &str,
        options: &ReadOptions,
    ) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        require("column", column)?;
        require("value", value)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Read)?;

        let predicates = finder::column_predicate(&table, column, value)?;
        self.search(dialect.as_ref(), target.alias, table, predicates, options)
    }

    fn find_step(
        &self,
        target: Target<'_>,
        expression: &str,
        arguments: Option<&[String]>,
        options: &ReadOptions,
    ) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        require("finder", expression)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Read)?;

        let predicates = finder::parse_finder(&table, expression, arguments)?;
        self.search(dialect.as_ref(), target.alias, table, predicates, options)
    }

    fn create_step(&self, target: Target<'_>, body: &Body<'_>) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Create)?;

        let payload = body.payload()?;
        let mutation = Mutation::insert(table, &payload)?;
        self.run(
            dialect.as_ref(),
            target.alias,
            &dialect.render_mutation(&mutation),
            Intent::Mutation,
        )?;
        Ok(Envelope::created(payload.to_row()))
    }

    fn update_step(
        &self,
        target: Target<'_>,
        key_column: Option<&str>,
        id: &str,
        body: &Body<'_>,
    ) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        require("id", id)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Update)?;

        let payload = body.payload()?;
        let key = key_column.unwrap_or(table.primary_key()).to_string();
        let mutation = Mutation::update(table, &payload, &key, id)?;
        let outcome = self.run(
            dialect.as_ref(),
            target.alias,
            &dialect.render_mutation(&mutation),
            Intent::Mutation,
        )?;

        if outcome.affected == 0 {
            return Ok(Envelope::status(OutcomeCategory::NoContent));
        }
        let mut row = payload.to_row();
        row.insert(key, Value::String(id.to_string()));
        Ok(Envelope::ok(vec![row]))
    }

    fn delete_step(
        &self,
        target: Target<'_>,
        key_column: Option<&str>,
        id: &str,
    ) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("resource", target.resource)?;
        require("id", id)?;
        let dialect = self.dialect(target.alias)?;
        let table = self.resolve(target)?;
        self.authorize(target, Operation::Delete)?;

        let key = key_column.unwrap_or(table.primary_key()).to_string();
        let mutation = Mutation::delete(table, &key, id)?;
        let outcome = self.run(
            dialect.as_ref(),
            target.alias,
            &dialect.render_mutation(&mutation),
            Intent::Mutation,
        )?;

        if outcome.affected == 0 {
            return Ok(Envelope::status(OutcomeCategory::NoContent));
        }
        Ok(Envelope::ok(Vec::new()))
    }

    fn call_step(&self, target: Target<'_>, parameters: &str) -> Step<Envelope> {
        require("alias", target.alias)?;
        require("routine", target.resource)?;
        let dialect = self.dialect(target.alias)?;
        self.authorize(target, Operation::Call)?;

        let call = StoredCall::from_json(target.resource, parameters)?;
        let rendered = dialect.render_call(&call);
        let outcome = self
            .driver
            .call(target.alias, &rendered)
            .map_err(|e| self.driver_failure(dialect.as_ref(), target.alias, e, Intent::Mutation))?;
        Ok(Envelope::ok(outcome.rows))
    }

    fn dialect(&self, alias: &str) -> Step<Arc<dyn Dialect>> {
        self.dialects
            .get(alias)
            .ok_or_else(|| ContractError::UnknownAlias(alias.to_string()).into())
    }

    fn resolve(&self, target: Target<'_>) -> Step<Arc<Table>> {
        match self.metadata.table(target.alias, target.resource) {
            Some(table) => Ok(table),
            None => Table::unresolved(target.resource)
                .map(Arc::new)
                .map_err(|_| Halt::Reply(Envelope::failed(taxonomy::invalid_name()))),
        }
    }

    fn authorize(&self, target: Target<'_>, operation: Operation) -> Step<()> {
        if self
            .access
            .permit(target.alias, target.resource, target.principal, operation)
        {
            return Ok(());
        }
        Err(Halt::Reply(Envelope::rejected(
            OutcomeCategory::BadRequest,
            format!("Access denied to {}/{}", target.alias, target.resource),
        )))
    }

    fn run(
        &self,
        dialect: &dyn Dialect,
        alias: &str,
        statement: &RenderedSql,
        intent: Intent,
    ) -> Step<ExecutionOutcome> {
        self.driver
            .execute(alias, statement)
            .map_err(|e| self.driver_failure(dialect, alias, e, intent))
    }

    fn driver_failure(&self, dialect: &dyn Dialect, alias: &str, err: DriverError, intent: Intent) -> Halt {
        let diagnostic = match &err {
            DriverError::Vendor { signal, message } => {
                let diagnostic = taxonomy::classify(dialect.kind(), signal, intent);
                let code = signal.code.to_string();
                log_event_with_fields(
                    Event::ExecutionFailed,
                    &[
                        ("alias", alias),
                        ("category", diagnostic.category.as_str()),
                        ("message", message.as_str()),
                        ("sql_code", code.as_str()),
                        ("sql_state", signal.state.as_str()),
                    ],
                );
                diagnostic
            }
            DriverError::Unavailable(reason) => {
                log_event_with_fields(
                    Event::DriverUnavailable,
                    &[("alias", alias), ("reason", reason.as_str())],
                );
                taxonomy::unavailable()
            }
        };
        Halt::Reply(Envelope::failed(diagnostic))
    }

    /// Paged search; an empty result is NOT_FOUND
    fn search(
        &self,
        dialect: &dyn Dialect,
        alias: &str,
        table: Arc<Table>,
        predicates: PredicateSet,
        options: &ReadOptions,
    ) -> Step<Envelope> {
        let (statement, paging) = read_statement(table, Some(predicates), options)?;
        let (rows, pagination) = self.page(dialect, alias, &statement, paging)?;
        if rows.is_empty() {
            return Ok(Envelope::status(OutcomeCategory::NotFound));
        }
        Ok(Envelope::page(rows, pagination))
    }

    /// Fetch one page and count the records behind it
    fn page(
        &self,
        dialect: &dyn Dialect,
        alias: &str,
        statement: &Statement,
        paging: PagingWindow,
    ) -> Step<(Vec<Row>, Pagination)> {
        let outcome = self.run(dialect, alias, &dialect.render_select(statement), Intent::Read)?;
        let rows = outcome.rows;

        // a short first page already holds every record
        let total = if paging.offset() == 0 && rows.len() < paging.size() {
            rows.len()
        } else {
            let counted = self.run(dialect, alias, &dialect.render_count(statement), Intent::Read)?;
            counted.count().ok_or_else(|| {
                log_event_with_fields(
                    Event::ExecutionFailed,
                    &[("alias", alias), ("error", "count query returned no row count")],
                );
                Halt::Reply(Envelope::rejected(
                    OutcomeCategory::Internal,
                    "Row count unavailable",
                ))
            })?
        };

        let pagination = Pagination::of(paging, rows.len(), total);
        Ok((rows, pagination))
    }
}

/// Statement and paging window for a read: paging, projection and ordering
/// come from `options`
pub fn read_statement(
    table: Arc<Table>,
    predicates: Option<PredicateSet>,
    options: &ReadOptions,
) -> ModelResult<(Statement, PagingWindow)> {
    let paging = PagingWindow::parse(options.limit.as_deref(), options.offset.as_deref())?;

    let mut statement = Statement::select(table);
    if let Some(predicates) = predicates {
        statement = statement.with_predicates(predicates)?;
    }
    if let Some(columns) = options.columns.as_deref() {
        let columns = finder::parse_columns(columns).map_err(|e| match e {
            FinderError::Model(m) => m,
            other => ModelError::InvalidParameter {
                name: "cols",
                value: other.to_string(),
            },
        })?;
        statement = statement.with_columns(columns)?;
    }
    if options.sort.is_some() || options.dir.is_some() {
        let direction = match options.dir.as_deref() {
            Some(dir) => Direction::parse(dir)?,
            None => Direction::default(),
        };
        statement = statement.with_ordering(Ordering {
            column: options.sort.clone().filter(|s| !s.trim().is_empty()),
            direction,
        })?;
    }

    Ok((statement.with_paging(paging), paging))
}

fn single(key: &str, value: Value) -> Row {
    let mut row = Row::new();
    row.insert(key.to_string(), value);
    row
}

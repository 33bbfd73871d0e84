//! # Operator & Predicate Parser
//!
//! Turns request input into predicate sets over a [`Table`]:
//!
//! - dynamic finder expressions (`findAllByMakerLikeAndMonthLessThanEquals`)
//!   plus their ordered argument list
//! - the `/{resource}/{column}/{value}` path form
//! - column projection lists (`"name, age"`)

pub mod errors;
pub mod grammar;

pub use errors::{FinderError, FinderResult};
pub use grammar::{tokenize, Clause, FINDER_PREFIX};

use crate::model::{ModelError, Predicate, PredicateSet, Table};

/// Parse a dynamic finder against `table`.
///
/// `None` arguments is a contract violation; an empty slice is a request
/// error when the expression needs arguments.
pub fn parse_finder(
    table: &Table,
    expression: &str,
    arguments: Option<&[String]>,
) -> FinderResult<PredicateSet> {
    let arguments = arguments.ok_or(FinderError::MissingArguments)?;
    let clauses = tokenize(expression)?;

    let fields = clauses
        .iter()
        .map(|clause| resolve_field(table, clause))
        .collect::<FinderResult<Vec<_>>>()?;

    let expected: usize = clauses.iter().map(|c| c.operator.arity()).sum();
    if expected != arguments.len() {
        return Err(FinderError::ArgumentMismatch {
            expected,
            supplied: arguments.len(),
        });
    }

    let mut remaining = arguments;
    let mut predicates = Vec::with_capacity(clauses.len());
    for (clause, column) in clauses.iter().zip(fields) {
        let (taken, rest) = remaining.split_at(clause.operator.arity());
        remaining = rest;
        predicates.push(Predicate::new(column, clause.operator, taken.to_vec())?);
    }

    Ok(PredicateSet::new(predicates)?)
}

/// Single EQUALS predicate for `/{resource}/{column}/{value}`
pub fn column_predicate(table: &Table, column: &str, value: &str) -> FinderResult<PredicateSet> {
    let column = table.resolve_column(column)?;
    Ok(PredicateSet::single(Predicate::equals(column, value)))
}

/// Split a comma separated projection list
pub fn parse_columns(list: &str) -> FinderResult<Vec<String>> {
    let columns: Vec<String> = list
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if columns.is_empty() {
        return Err(ModelError::EmptyProjection.into());
    }
    Ok(columns)
}

fn resolve_field(table: &Table, clause: &Clause) -> FinderResult<String> {
    if clause.suspect_suffix && !table.is_resolved() {
        return Err(FinderError::UnknownOperator(clause.field.clone()));
    }

    match table.resolve_column(&clause.field) {
        Ok(column) => Ok(column),
        Err(ModelError::UnknownColumn { .. }) => {
            // FirstName matches first_name
            if let Some(column) = table
                .columns()
                .iter()
                .find(|c| c.name.replace('_', "").eq_ignore_ascii_case(&clause.field))
            {
                return Ok(column.name.clone());
            }
            if clause.suspect_suffix {
                Err(FinderError::UnknownOperator(clause.field.clone()))
            } else {
                Err(FinderError::UnknownField {
                    resource: table.name().to_string(),
                    field: clause.field.clone(),
                })
            }
        }
        Err(e) => Err(e.into()),
    }
}

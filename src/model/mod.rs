//! # Statement Model
//!
//! Vendor-neutral representation of reads, single-row mutations and stored
//! routine calls. Everything here is an immutable value built per request,
//! except [`Table`], which is loaded once per alias and shared.

pub mod errors;
pub mod mutation;
pub mod operator;
pub mod pagination;
pub mod predicate;
pub mod statement;
pub mod stored_call;
pub mod table;

pub use errors::{ModelError, ModelResult};
pub use mutation::{BindValue, Mutation, Payload};
pub use operator::Operator;
pub use pagination::Pagination;
pub use predicate::{Predicate, PredicateSet};
pub use statement::{Direction, Ordering, PagingWindow, Projection, Statement};
pub use stored_call::{ParamDirection, StoredCall, StoredCallParam};
pub use table::{Column, ColumnType, Table};

use cfl_common::{CflError, Result};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

pub mod scope;

pub use scope::{EmptyScope, OverScope, ScopeNamespace, ValidatorScope};

pub fn parse_sql(sql: &str) -> Result<Vec<Statement>> {
    let dialect = GenericDialect {};
    Parser::parse_sql(&dialect, sql).map_err(|e| CflError::Planning(e.to_string()))
}

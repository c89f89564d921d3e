//! Operator symbol tables
//!
//! Each lookup fails with [`LowerError::UnsupportedOperator`] for an operator
//! outside its table.

use crate::error::{LowerError, Result};
use pn_syntax::Operator;

fn unsupported(op: Operator, context: &'static str) -> LowerError {
    LowerError::UnsupportedOperator {
        operator: op.name().to_owned(),
        context,
    }
}

/// Symbol for an arithmetic operator
///
/// # Errors
///
/// Fails for an operator outside the table.
pub fn arithmetic(op: Operator) -> Result<&'static str> {
    match op {
        Operator::Add => Ok("+"),
        Operator::Sub => Ok("-"),
        Operator::Mult => Ok("*"),
        Operator::Div => Ok("/"),
        Operator::Mod => Ok("%"),
        _ => Err(unsupported(op, "Arithmetic")),
    }
}

/// Symbol for a comparison operator; equality is strict
///
/// # Errors
///
/// Fails for an operator outside the table.
pub fn comparison(op: Operator) -> Result<&'static str> {
    match op {
        Operator::Gt => Ok(">"),
        Operator::GtE => Ok(">="),
        Operator::Lt => Ok("<"),
        Operator::LtE => Ok("<="),
        Operator::Eq => Ok("==="),
        Operator::NotEq => Ok("!=="),
        _ => Err(unsupported(op, "Comparison")),
    }
}

/// Symbol for a boolean operator
///
/// # Errors
///
/// Fails for an operator outside the table.
pub fn logical(op: Operator) -> Result<&'static str> {
    match op {
        Operator::And => Ok("&&"),
        Operator::Or => Ok("||"),
        _ => Err(unsupported(op, "Logical")),
    }
}

/// Symbol for a prefix operator
///
/// # Errors
///
/// Fails for an operator outside the table.
pub fn unary(op: Operator) -> Result<&'static str> {
    match op {
        Operator::USub => Ok("-"),
        Operator::UAdd => Ok("+"),
        Operator::Not => Ok("!"),
        _ => Err(unsupported(op, "Unary")),
    }
}

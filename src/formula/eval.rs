//! Formula evaluation over bound input values

use super::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::FormulaError;
use crate::model::{format_number, FieldValue};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// A runtime value inside a formula
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Value {
    /// Numeric reading: numbers, booleans, and text that parses as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Bool(b) => *b,
        }
    }

    /// Bind a field value as a formula input. Absent and falsy values are
    /// bound as zero so arithmetic works before every input is filled in.
    pub fn from_input(value: Option<&FieldValue>) -> Self {
        match value {
            None => Value::Number(0.0),
            Some(v) if !v.is_truthy() => Value::Number(0.0),
            Some(FieldValue::Number(n)) => Value::Number(*n),
            Some(FieldValue::Bool(b)) => Value::Bool(*b),
            Some(FieldValue::Text(s)) => Value::Text(s.clone()),
            Some(FieldValue::List(items)) => Value::Text(items.join(",")),
        }
    }

    pub fn into_field_value(self) -> FieldValue {
        match self {
            Value::Number(n) => FieldValue::Number(n),
            Value::Text(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Bool(b),
        }
    }
}

/// Input values by reference name
pub type Bindings<'a> = HashMap<&'a str, Value>;

/// Evaluate `expr` against `bindings`
pub fn evaluate(expr: &Expr, bindings: &Bindings<'_>) -> Result<Value, FormulaError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Reference(name) => {
            bindings
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| FormulaError::UnknownReference { name: name.clone() })
        }
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, bindings)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                UnaryOp::Neg => numeric("-", &value).map(|n| Value::Number(-n)),
                UnaryOp::Plus => numeric("+", &value).map(Value::Number),
            }
        }
        Expr::Binary { op, left, right } => match op {
            BinaryOp::And => {
                let lhs = evaluate(left, bindings)?;
                if !lhs.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(evaluate(right, bindings)?.is_truthy()))
            }
            BinaryOp::Or => {
                let lhs = evaluate(left, bindings)?;
                if lhs.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(evaluate(right, bindings)?.is_truthy()))
            }
            _ => {
                let lhs = evaluate(left, bindings)?;
                let rhs = evaluate(right, bindings)?;
                apply(*op, lhs, rhs)
            }
        },
    }
}

fn apply(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, FormulaError> {
    let result = match op {
        BinaryOp::Add => match (lhs.as_number(), rhs.as_number()) {
            (Some(a), Some(b)) => Value::Number(a + b),
            _ => Value::Text(format!("{lhs}{rhs}")),
        },
        BinaryOp::Sub => Value::Number(numeric("-", &lhs)? - numeric("-", &rhs)?),
        BinaryOp::Mul => Value::Number(numeric("*", &lhs)? * numeric("*", &rhs)?),
        BinaryOp::Div => {
            let divisor = numeric("/", &rhs)?;
            let dividend = numeric("/", &lhs)?;
            if divisor == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            Value::Number(dividend / divisor)
        }
        BinaryOp::Rem => {
            let divisor = numeric("%", &rhs)?;
            let dividend = numeric("%", &lhs)?;
            if divisor == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            Value::Number(dividend % divisor)
        }
        BinaryOp::Eq => Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Equal)),
        BinaryOp::NotEq => Value::Bool(compare(&lhs, &rhs) != Some(Ordering::Equal)),
        BinaryOp::Lt => Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Less)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(&lhs, &rhs),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Greater)),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(&lhs, &rhs),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::And => Value::Bool(lhs.is_truthy() && rhs.is_truthy()),
        BinaryOp::Or => Value::Bool(lhs.is_truthy() || rhs.is_truthy()),
    };

    if let Value::Number(n) = result {
        if !n.is_finite() {
            return Err(FormulaError::NonFinite);
        }
    }
    Ok(result)
}

fn numeric(op: &'static str, value: &Value) -> Result<f64, FormulaError> {
    value.as_number().ok_or_else(|| FormulaError::NotANumber {
        op,
        value: value.to_string(),
    })
}

/// Numeric order when both sides are numeric, text order otherwise
fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => Some(lhs.to_string().cmp(&rhs.to_string())),
    }
}

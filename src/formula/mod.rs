//! Formula language for derived fields
//!
//! A formula is an arithmetic/logical expression over the values of the
//! field's `derivedFrom` inputs. Sources are compiled into a small syntax
//! tree; there are no calls, loops or assignments, so evaluation always
//! terminates.

pub mod ast;
pub mod eval;
pub mod parser;
pub mod token;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use eval::{evaluate, Bindings, Value};
pub use parser::{parse, MAX_DEPTH, MAX_NODES};

use crate::error::FormulaError;

/// A parsed formula whose references are known to be among its inputs
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parse `source` and check that every reference names one of `inputs`
    pub fn compile(source: &str, inputs: &[String]) -> Result<Self, FormulaError> {
        let expr = parse(source)?;
        if let Some(unknown) = expr
            .references()
            .into_iter()
            .find(|name| !inputs.iter().any(|input| input == name))
        {
            return Err(FormulaError::UnknownReference {
                name: unknown.to_string(),
            });
        }
        Ok(Self { expr })
    }

    /// Distinct referenced input names, in order of first appearance
    pub fn references(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for name in self.expr.references() {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }

    pub fn evaluate(&self, bindings: &Bindings<'_>) -> Result<Value, FormulaError> {
        evaluate(&self.expr, bindings)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inputs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compile_and_evaluate() {
        let formula = Formula::compile("${A} + ${B}", &inputs(&["A", "B"])).unwrap();
        let bindings: Bindings = [("A", Value::Number(2.0)), ("B", Value::Number(3.0))]
            .into_iter()
            .collect();
        assert_eq!(formula.evaluate(&bindings), Ok(Value::Number(5.0)));
    }

    #[test]
    fn test_reference_outside_inputs_is_rejected() {
        assert_eq!(
            Formula::compile("${A} * rate", &inputs(&["A"])),
            Err(FormulaError::UnknownReference {
                name: "rate".into()
            })
        );
    }

    #[test]
    fn test_references_are_deduplicated() {
        let formula = Formula::compile("b + a * b", &inputs(&["a", "b"])).unwrap();
        assert_eq!(formula.references(), vec!["b", "a"]);
    }

    #[test]
    fn test_syntax_errors_surface_from_compile() {
        assert!(matches!(
            Formula::compile("${A}+", &inputs(&["A"])),
            Err(FormulaError::UnexpectedEnd { .. })
        ));
    }
}

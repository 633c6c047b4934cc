//! Derivation engine: recomputes derived fields from their inputs
//!
//! A pass walks the derived fields and writes each result into the working
//! value map, so later fields read results produced earlier in the same pass.
//! A field that fails keeps its previous value; the failure is logged and
//! reported but never stops the pass.

use crate::error::DerivationError;
use crate::formula::{Bindings, Formula, Value};
use crate::model::{FieldValue, FieldValues, FormField};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Order in which derived fields are evaluated within one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationOrder {
    /// Schema order; a field reading a derived field placed after it sees
    /// that field's previous value
    #[default]
    Schema,
    /// Dependencies first; fields in a dependency cycle are left unchanged
    Topological,
}

/// A derived field that could not be computed
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationFailure {
    pub field_id: String,
    pub label: String,
    pub error: DerivationError,
}

/// Result of one derivation pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivationOutcome {
    pub values: FieldValues,
    pub failures: Vec<DerivationFailure>,
}

impl DerivationOutcome {
    pub fn failure_for(&self, field_id: &str) -> Option<&DerivationFailure> {
        self.failures.iter().find(|f| f.field_id == field_id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DerivationEngine {
    order: EvaluationOrder,
}

impl DerivationEngine {
    pub fn new(order: EvaluationOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> EvaluationOrder {
        self.order
    }

    /// Run one pass over `fields`, starting from `values`
    pub fn derive(&self, fields: &[FormField], values: &FieldValues) -> DerivationOutcome {
        let derived: Vec<(&FormField, &str)> = fields
            .iter()
            .filter_map(|field| field.active_formula().map(|src| (field, src)))
            .collect();

        let mut outcome = DerivationOutcome {
            values: values.clone(),
            failures: Vec::new(),
        };

        let schedule = match self.order {
            EvaluationOrder::Schema => Schedule {
                order: (0..derived.len()).collect(),
                cyclic: Vec::new(),
            },
            EvaluationOrder::Topological => topological_schedule(&derived),
        };

        for index in schedule.cyclic {
            let (field, _) = derived[index];
            record_failure(&mut outcome, field, DerivationError::Cycle);
        }

        for index in schedule.order {
            let (field, source) = derived[index];
            match derive_field(field, source, &outcome.values) {
                Ok(value) => {
                    outcome.values.insert(field.id.clone(), value);
                }
                Err(err) => record_failure(&mut outcome, field, err.into()),
            }
        }

        outcome
    }
}

/// Schema-order pass returning only the new values
pub fn derive_all(fields: &[FormField], values: &FieldValues) -> FieldValues {
    DerivationEngine::default().derive(fields, values).values
}

fn derive_field(
    field: &FormField,
    source: &str,
    values: &FieldValues,
) -> Result<FieldValue, crate::error::FormulaError> {
    let formula = Formula::compile(source, &field.derived_from)?;
    let bindings: Bindings = field
        .derived_from
        .iter()
        .map(|id| (id.as_str(), Value::from_input(values.get(id))))
        .collect();
    Ok(formula.evaluate(&bindings)?.into_field_value())
}

fn record_failure(outcome: &mut DerivationOutcome, field: &FormField, error: DerivationError) {
    tracing::warn!(
        field = %field.label,
        field_id = %field.id,
        error = %error,
        "Error evaluating formula"
    );
    outcome.failures.push(DerivationFailure {
        field_id: field.id.clone(),
        label: field.label.clone(),
        error,
    });
}

/// Evaluation order over indexes into the derived-field list
struct Schedule {
    order: Vec<usize>,
    cyclic: Vec<usize>,
}

/// Kahn's algorithm over the derived fields. When no field is ready, the
/// fields that can reach themselves are set aside as cyclic and their
/// dependents are released, so everything downstream of a cycle still runs.
fn topological_schedule(derived: &[(&FormField, &str)]) -> Schedule {
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    for (index, (field, _)) in derived.iter().enumerate() {
        by_id.entry(field.id.as_str()).or_insert(index);
    }

    let deps: Vec<Vec<usize>> = derived
        .iter()
        .map(|(field, _)| {
            let mut out: Vec<usize> = Vec::new();
            for source in &field.derived_from {
                if let Some(&dep) = by_id.get(source.as_str()) {
                    if !out.contains(&dep) {
                        out.push(dep);
                    }
                }
            }
            out
        })
        .collect();

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); derived.len()];
    for (index, field_deps) in deps.iter().enumerate() {
        for &dep in field_deps {
            dependents[dep].push(index);
        }
    }

    let mut pending: Vec<usize> = deps.iter().map(Vec::len).collect();
    let mut done = vec![false; derived.len()];
    let mut ready: VecDeque<usize> = (0..derived.len()).filter(|&i| pending[i] == 0).collect();
    let mut schedule = Schedule {
        order: Vec::with_capacity(derived.len()),
        cyclic: Vec::new(),
    };

    loop {
        while let Some(index) = ready.pop_front() {
            done[index] = true;
            schedule.order.push(index);
            for &next in &dependents[index] {
                if done[next] {
                    continue;
                }
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.push_back(next);
                }
            }
        }

        let stuck: Vec<usize> = (0..derived.len()).filter(|&i| !done[i]).collect();
        if stuck.is_empty() {
            break;
        }

        let cyclic: Vec<usize> = stuck
            .iter()
            .copied()
            .filter(|&i| reaches_itself(i, &deps, &done))
            .collect();

        for &index in &cyclic {
            done[index] = true;
            schedule.cyclic.push(index);
        }
        for &index in &cyclic {
            for &next in &dependents[index] {
                if done[next] {
                    continue;
                }
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.push_back(next);
                }
            }
        }
    }

    schedule
}

/// Whether `start` depends on itself through fields not yet scheduled
fn reaches_itself(start: usize, deps: &[Vec<usize>], done: &[bool]) -> bool {
    let mut seen = vec![false; deps.len()];
    let mut stack: Vec<usize> = deps[start].clone();
    while let Some(node) = stack.pop() {
        if node == start {
            return true;
        }
        if done[node] || seen[node] {
            continue;
        }
        seen[node] = true;
        stack.extend(deps[node].iter().copied());
    }
    false
}

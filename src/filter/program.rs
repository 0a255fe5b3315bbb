use serde_json::Value;
use tracing::debug;

use crate::models::Record;
use crate::traits::{EvaluationError, QueryEvaluator};

/// Wrap a user predicate into a program that maps an array of records to an
/// array of booleans, one per record, using the predicate's truthiness.
pub fn build_program(predicate: &str) -> String {
    format!("[.[] | ({}) | not | not]", predicate.trim())
}

/// Evaluate `predicate` against `records` and return one boolean per record.
///
/// Records are serialized without their payloads. Any output that is not an
/// array of booleans as long as the input is rejected.
pub async fn evaluate<E>(
    evaluator: &E,
    records: &[Record],
    predicate: &str,
) -> Result<Vec<bool>, EvaluationError>
where
    E: QueryEvaluator + ?Sized,
{
    let input = serde_json::to_value(records).map_err(|e| EvaluationError::Failed {
        message: format!("could not serialize records: {}", e),
    })?;
    let program = build_program(predicate);
    debug!("Evaluating {} records with {}", records.len(), program);

    let output = evaluator.run(&input, &program).await?;
    parse_mask(output, records.len())
}

fn parse_mask(output: Value, expected: usize) -> Result<Vec<bool>, EvaluationError> {
    let items = match output {
        Value::Array(items) => items,
        other => {
            return Err(EvaluationError::InvalidOutput {
                message: format!("expected an array, got {}", type_name(&other)),
            })
        }
    };

    if items.len() != expected {
        return Err(EvaluationError::InvalidOutput {
            message: format!("expected {} results, got {}", expected, items.len()),
        });
    }

    items
        .into_iter()
        .map(|item| match item {
            Value::Bool(b) => Ok(b),
            other => Err(EvaluationError::InvalidOutput {
                message: format!("expected a boolean, got {}", type_name(&other)),
            }),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Request validation for single and batch symbol lookups.
//!
//! Everything here is pure: the same input always yields the same decision,
//! and a rejected request never reaches the upstream API.

use std::collections::HashSet;

use serde_json::Value;

use crate::{Symbol, ValidationError};

/// Default cap on symbols per batch request.
pub const DEFAULT_MAX_BATCH_SYMBOLS: usize = 20;

/// Validates one symbol and returns its normalized form.
pub fn validate_symbol(input: &str) -> Result<Symbol, ValidationError> {
    Symbol::parse(input)
}

/// Validates a batch of symbols.
///
/// Checks run in order: non-empty, at most `max` entries, every item valid,
/// no duplicates after normalization. The first failure rejects the whole batch.
pub fn validate_batch<S: AsRef<str>>(
    inputs: &[S],
    max: usize,
) -> Result<Vec<Symbol>, ValidationError> {
    check_batch_len(inputs.len(), max)?;

    let symbols = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let value = input.as_ref();
            Symbol::parse(value).map_err(|reason| ValidationError::InvalidBatchItem {
                index,
                value: value.to_owned(),
                reason: Box::new(reason),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    reject_duplicates(&symbols)?;
    Ok(symbols)
}

/// Validates an untyped JSON `symbols` value, as received on the wire.
pub fn validate_batch_value(value: &Value, max: usize) -> Result<Vec<Symbol>, ValidationError> {
    let Value::Array(items) = value else {
        return Err(ValidationError::BatchNotArray);
    };
    check_batch_len(items.len(), max)?;

    let inputs = items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(text) => Ok(text.as_str()),
            other => Err(ValidationError::BatchItemNotString {
                index,
                value: other.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_batch(&inputs, max)
}

fn check_batch_len(len: usize, max: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::EmptyBatch);
    }
    if len > max {
        return Err(ValidationError::BatchTooLarge { provided: len, max });
    }
    Ok(())
}

fn reject_duplicates(symbols: &[Symbol]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(symbols.len());
    let first_duplicate = symbols.iter().find(|symbol| !seen.insert(*symbol));

    if let Some(symbol) = first_duplicate {
        let unique = symbols.iter().collect::<HashSet<_>>().len();
        return Err(ValidationError::DuplicateSymbol {
            symbol: symbol.to_string(),
            provided: symbols.len(),
            unique,
        });
    }
    Ok(())
}

//! Argument splitter: top-level comma tokenization of a bracketed argument list.
//!
//! Input is the inner content of one call (outer brackets already stripped).
//! Commas nested inside `(...)` stay inside their token; whitespace is kept as-is.

use crate::error::PolicyError;
use tracing::warn;

/// Split on depth-0 commas, failing on an unbalanced `)`.
///
/// The error carries every token completed before the bad bracket plus the
/// accumulator at that point, so callers can still use the partial result.
pub fn try_split_arguments(input: &str) -> Result<Vec<String>, PolicyError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth: i64 = 0;

    for (position, ch) in input.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                if depth < 0 {
                    tokens.push(current);
                    return Err(PolicyError::UnbalancedBrackets {
                        input: input.to_string(),
                        position,
                        partial: tokens,
                    });
                }
                current.push(ch);
            }
            ',' if depth == 0 => tokens.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    tokens.push(current);
    Ok(tokens)
}

/// Split on depth-0 commas; never returns fewer than one token.
///
/// An unbalanced `)` stops the scan. The diagnostic is logged and the tokens
/// gathered so far are returned.
pub fn split_arguments(input: &str) -> Vec<String> {
    match try_split_arguments(input) {
        Ok(tokens) => tokens,
        Err(PolicyError::UnbalancedBrackets {
            input,
            position,
            partial,
        }) => {
            warn!(
                input = %input,
                position,
                "Unbalanced closing bracket in policy arguments; tokenization stopped early"
            );
            partial
        }
        Err(other) => {
            warn!(error = %other, "Unexpected splitter failure");
            vec![input.to_string()]
        }
    }
}

/// Strip one pair of enclosing brackets, if both are present.
pub fn strip_outer_parens(policy: &str) -> &str {
    let trimmed = policy.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed)
}

//! Tokenizer for the free-form custom engine options
//!
//! The grammar is deliberately small: space-separated tokens, a token with
//! leading dashes names a flag and the following plain token is its value.
//! There is no quoting or escaping, and malformed input never fails; it just
//! yields whatever the state machine managed to collect.

use crate::domain::model::FlagMap;

/// Tokenizer state
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Waiting for a flag token
    ExpectFlag,
    /// A flag was read and may be followed by a value
    ExpectValue(String),
}

/// Parse `-flag value -flag2 value2 ...` into a flag map.
///
/// A repeated flag keeps the last value.
pub fn parse(raw: &str) -> FlagMap {
    let mut flags = FlagMap::new();
    let mut state = State::ExpectFlag;

    for token in raw.split(' ').filter(|token| !token.is_empty()) {
        state = match (state, flag_name(token)) {
            (State::ExpectFlag, Some(flag)) => State::ExpectValue(flag.to_string()),
            // A stray value with no flag in front of it is dropped
            (State::ExpectFlag, None) => State::ExpectFlag,
            (State::ExpectValue(previous), Some(flag)) => {
                flags.set_bare(previous);
                State::ExpectValue(flag.to_string())
            }
            (State::ExpectValue(flag), None) => {
                flags.set(flag, token);
                State::ExpectFlag
            }
        };
    }

    if let State::ExpectValue(flag) = state {
        flags.set_bare(flag);
    }

    flags
}

/// Name of a flag token with its dashes stripped, `None` for value tokens
fn flag_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('-')?.trim_start_matches('-');
    (!name.is_empty()).then_some(name)
}

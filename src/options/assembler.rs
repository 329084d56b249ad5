//! Engine argument vector assembly
//!
//! Layout of the assembled vector (the executable itself is not included):
//!
//! ```text
//! <global flags...> -i <input> <output flags...> <output>
//! ```
//!
//! Global flags (overwrite policy) come first, output flags follow in the
//! flag map's insertion order so they apply to the output file. A flag without
//! a value contributes a single token. Paths are separate tokens and are never
//! quoted.

use crate::domain::model::FlagMap;

/// Builds engine argument vectors
#[derive(Debug, Clone, Default)]
pub struct ArgumentAssembler {
    globals: FlagMap,
}

/// An argument vector split back into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub globals: FlagMap,
    pub input: String,
    pub flags: FlagMap,
    pub output: String,
}

impl ArgumentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a global flag placed before the input
    pub fn with_global(mut self, flag: &str, value: Option<String>) -> Self {
        self.globals.insert(flag, value);
        self
    }

    /// Set the overwrite policy: `-y` replaces an existing output, `-n` refuses to
    pub fn with_overwrite(self, overwrite: bool) -> Self {
        let (keep, drop) = if overwrite { ("y", "n") } else { ("n", "y") };
        let mut assembler = self.with_global(keep, None);
        assembler.globals.remove(drop);
        assembler
    }

    /// Assemble the argument vector for one conversion
    pub fn assemble(&self, flags: &FlagMap, input: &str, output: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(2 * (self.globals.len() + flags.len()) + 3);
        push_flags(&mut args, &self.globals);
        args.push("-i".to_string());
        args.push(input.to_string());
        push_flags(&mut args, flags);
        args.push(output.to_string());
        args
    }
}

fn push_flags(args: &mut Vec<String>, flags: &FlagMap) {
    for (flag, value) in flags.iter() {
        args.push(format!("-{}", flag));
        if let Some(value) = value {
            args.push(value.to_string());
        }
    }
}

/// Whether a token names a flag. Negative numbers such as `-1` are values.
fn is_flag_token(token: &str) -> bool {
    match token.strip_prefix('-') {
        Some(rest) => rest
            .chars()
            .next()
            .map_or(false, |first| !first.is_ascii_digit() && first != '.'),
        None => false,
    }
}

/// Split tokens into flags, consuming a following non-flag token as the value
fn collect_flags(tokens: &[String]) -> FlagMap {
    let mut flags = FlagMap::new();
    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        if !is_flag_token(token) {
            index += 1;
            continue;
        }
        match tokens.get(index + 1).filter(|next| !is_flag_token(next)) {
            Some(value) => {
                flags.set(token.as_str(), value.as_str());
                index += 2;
            }
            None => {
                flags.set_bare(token.as_str());
                index += 1;
            }
        }
    }
    flags
}

/// Split an assembled argument vector back into its parts.
///
/// Accepts the vector with or without the executable and engine-only global
/// options in front. Returns `None` when there is no `-i <input>` followed by
/// an output path.
pub fn parse_invocation(args: &[String]) -> Option<Invocation> {
    let input_at = args.iter().position(|arg| arg == "-i")?;
    let input = args.get(input_at + 1)?.clone();
    let (output, flag_tokens) = args[input_at + 2..].split_last()?;

    let leading = args[..input_at]
        .iter()
        .position(|arg| is_flag_token(arg))
        .unwrap_or(input_at);

    Some(Invocation {
        globals: collect_flags(&args[leading..input_at]),
        input,
        flags: collect_flags(flag_tokens),
        output: output.clone(),
    })
}

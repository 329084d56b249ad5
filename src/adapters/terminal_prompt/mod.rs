//! Line-based terminal prompter
//!
//! Works over any `BufRead`/`Write` pair so the whole interview can be driven
//! from a byte buffer in tests. Unrecognised answers are rejected and asked
//! again; end of input falls back to the prompt's default.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::ports::Prompter;

/// Prompter reading answers line by line
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<BufReader<Stdin>, Stdout> {
    /// Prompter on the process's standard streams
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one answer without its line ending; `None` at end of input
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn not_understood(&mut self, answer: &str) -> io::Result<()> {
        writeln!(self.output, "Sorry, response {:?} is not understood.", answer)
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, " -*- {} -*-", title)
    }

    fn choose(&mut self, title: &str, options: &[String], default: Option<usize>) -> io::Result<usize> {
        writeln!(self.output, "{}", title)?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "  [{}] {}", index + 1, option)?;
        }

        loop {
            match default {
                Some(slot) => write!(self.output, "Select [1-{}] ({}): ", options.len(), slot)?,
                None => write!(self.output, "Select [1-{}]: ", options.len())?,
            }
            self.output.flush()?;

            let answer = match self.read_answer()? {
                Some(answer) => answer,
                None => {
                    return default.ok_or_else(|| {
                        io::Error::new(io::ErrorKind::UnexpectedEof, "no answer given")
                    })
                }
            };

            let answer = answer.trim();
            if answer.is_empty() {
                if let Some(slot) = default {
                    return Ok(slot);
                }
            } else if let Ok(slot) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&slot) {
                    return Ok(slot);
                }
            }
            self.not_understood(answer)?;
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{} {}: ", question, hint)?;
            self.output.flush()?;

            let answer = match self.read_answer()? {
                Some(answer) => answer,
                None => return Ok(default),
            };

            match answer.trim() {
                "" => return Ok(default),
                "y" | "Y" | "yes" | "Yes" => return Ok(true),
                "n" | "N" | "no" | "No" => return Ok(false),
                other => self.not_understood(other)?,
            }
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}: ", question)?;
        self.output.flush()?;
        Ok(self.read_answer()?.unwrap_or_default())
    }
}

use anyhow::Result;
use std::io::{BufRead, BufReader, Stdin, Stdout, Write, stdin, stdout};
use tracing::warn;

use crate::engine::{Record, Value};
use crate::ingest::RecordSource;

/// Reads name/score pairs interactively until a blank name is entered.
///
/// Non-numeric scores are re-prompted rather than aborting the session,
/// matching the forgiving behavior of the original console tool.
pub fn read_interactive_scores<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    loop {
        write!(output, "Enter student name (blank to finish): ")?;
        output.flush()?;

        let mut name = String::new();
        if input.read_line(&mut name)? == 0 {
            break;
        }
        let name = name.trim().to_string();
        if name.is_empty() {
            break;
        }

        write!(output, "Enter marks for {}: ", name)?;
        output.flush()?;

        let mut marks = String::new();
        if input.read_line(&mut marks)? == 0 {
            break;
        }

        match marks.trim().parse::<f64>() {
            Ok(score) => {
                records.push(Record::new(vec![
                    ("name".to_string(), Value::Str(name)),
                    ("score".to_string(), Value::Num(score)),
                ]));
            }
            Err(_) => {
                warn!(%name, value = marks.trim(), "Ignoring non-numeric marks entry");
                writeln!(output, "Marks must be a number, entry skipped.")?;
            }
        }
    }

    Ok(records)
}

/// Interactive terminal entry as a record source.
pub struct InteractivePrompt<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl InteractivePrompt<BufReader<Stdin>, Stdout> {
    pub fn from_terminal() -> Self {
        Self {
            input: BufReader::new(stdin()),
            output: stdout(),
        }
    }
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> RecordSource for InteractivePrompt<R, W> {
    fn records(&mut self) -> Result<Vec<Record>> {
        read_interactive_scores(&mut self.input, &mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_until_blank_name() {
        let mut input = "Alice\n95\nBob\n62\n\n".as_bytes();
        let mut output = Vec::new();

        let records = read_interactive_scores(&mut input, &mut output).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some(&Value::Str("Alice".into())));
        assert_eq!(records[1].get("score"), Some(&Value::Num(62.0)));
    }

    #[test]
    fn test_skips_non_numeric_marks() {
        let mut input = "Alice\nninety\nBob\n62\n\n".as_bytes();
        let mut output = Vec::new();

        let records = read_interactive_scores(&mut input, &mut output).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&Value::Str("Bob".into())));
    }

    #[test]
    fn test_eof_ends_session() {
        let mut input = "Alice\n95\n".as_bytes();
        let mut output = Vec::new();

        let records = read_interactive_scores(&mut input, &mut output).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_source_trait_round() {
        let input = "Dana\n77\n\n".as_bytes();
        let mut source = InteractivePrompt::new(input, Vec::new());

        let records = source.records().unwrap();
        assert_eq!(records.len(), 1);
    }
}

use anyhow::bail;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

use tradedoc_core::traits::FormFiller;

/// Line-oriented prompts over any reader/writer pair (stdin/stdout in the CLI).
pub struct TerminalFormFiller<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl TerminalFormFiller<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self { Self::new(std::io::stdin().lock(), std::io::stdout()) }
}

impl<R: BufRead, W: Write> TerminalFormFiller<R, W> {
    pub fn new(input: R, output: W) -> Self { Self { input, output } }

    pub fn into_output(self) -> W { self.output }

    fn read_answer(&mut self) -> anyhow::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> FormFiller for TerminalFormFiller<R, W> {
    fn ask(&mut self, prompt: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        match default {
            Some(d) => write!(self.output, "{} [{}]: ", prompt, d)?,
            None => write!(self.output, "{}: ", prompt)?,
        }
        let answer = self.read_answer()?;
        Ok(if answer.is_empty() { default.map(str::to_string) } else { Some(answer) })
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> anyhow::Result<bool> {
        loop {
            write!(self.output, "{} [{}]: ", prompt, if default { "Y/n" } else { "y/N" })?;
            match self.read_answer()?.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please enter y or n")?,
            }
        }
    }
}

/// Replays canned answers; used for tests and non-interactive runs.
#[derive(Debug, Default)]
pub struct ScriptedFiller {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    /// Every prompt seen, in order.
    pub prompts: Vec<String>,
}

impl ScriptedFiller {
    pub fn new<A: Into<String>>(answers: impl IntoIterator<Item = A>, confirmations: impl IntoIterator<Item = bool>) -> Self {
        Self { answers: answers.into_iter().map(Into::into).collect(), confirmations: confirmations.into_iter().collect(), prompts: Vec::new() }
    }
}

impl FormFiller for ScriptedFiller {
    fn ask(&mut self, prompt: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        let Some(answer) = self.answers.pop_front() else { bail!("no scripted answer for '{}'", prompt) };
        Ok(if answer.trim().is_empty() { default.map(str::to_string) } else { Some(answer) })
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> anyhow::Result<bool> {
        self.prompts.push(prompt.to_string());
        match self.confirmations.pop_front() {
            Some(c) => Ok(c),
            None => bail!("no scripted confirmation for '{}'", prompt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn terminal_filler_applies_defaults_and_reasks_confirmations() {
        let input = Cursor::new("\nINV-9\nmaybe\ny\n");
        let mut filler = TerminalFormFiller::new(input, Vec::new());
        assert_eq!(filler.ask("Currency", Some("USD")).unwrap().as_deref(), Some("USD"));
        assert_eq!(filler.ask("Invoice Number", None).unwrap().as_deref(), Some("INV-9"));
        assert!(filler.confirm("Add seller?", false).unwrap());
        let shown = String::from_utf8(filler.into_output()).unwrap();
        assert!(shown.starts_with("Currency [USD]: Invoice Number: Add seller? [y/N]: Please enter y or n"));
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut filler = TerminalFormFiller::new(Cursor::new(""), Vec::new());
        assert!(filler.ask("Anything", None).is_err());
        assert!(filler.confirm("Sure?", true).is_err());
    }

    #[test]
    fn blank_answer_without_default_is_none() {
        let mut filler = TerminalFormFiller::new(Cursor::new("   \n"), Vec::new());
        assert_eq!(filler.ask("Notes", None).unwrap(), None);
    }
}

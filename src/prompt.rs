use std::io::{BufRead, Write};

/// Line based questions on a terminal, or on anything else that reads and
/// writes lines.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// One trimmed line, or `None` once input is exhausted.
    pub fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prints `label (default): ` and reads the answer. An empty answer or end
    /// of input gives `default`.
    pub fn ask(&mut self, label: &str, default: &str) -> anyhow::Result<String> {
        write!(self.output, "{label}")?;
        if !default.is_empty() {
            write!(self.output, " ({default})")?;
        }
        write!(self.output, ": ")?;
        self.output.flush()?;

        match self.read_line()? {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Ok(default.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn answers_and_defaults() {
        let input: &[u8] = b"  First answer \n\n";
        let mut prompter = Prompter::new(input, Vec::new());

        assert_eq!(prompter.ask("Title", "").unwrap(), "First answer");
        assert_eq!(prompter.ask("Slug", "my-post").unwrap(), "my-post");
        // input is exhausted
        assert_eq!(prompter.ask("Date", "2026-01-01").unwrap(), "2026-01-01");
        assert_eq!(prompter.read_line().unwrap(), None);

        let shown = String::from_utf8(prompter.output().clone()).unwrap();
        assert_eq!(shown, "Title: Slug (my-post): Date (2026-01-01): ");
    }
}

use std::io::{self, BufRead, Write};

use crate::core::ports::{InteractionError, UserInteraction};

pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }

    /// Only an explicit `y` or `yes` counts as consent
    fn confirm_stream<R, W>(
        read: &mut R,
        write: &mut W,
        message: &str,
    ) -> Result<bool, InteractionError>
    where
        R: BufRead,
        W: Write,
    {
        write!(write, "{message} [y/N]: ")?;
        write.flush()?;

        let mut input = String::new();
        read.read_line(&mut input)?;

        let answer = input.trim().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}

impl Default for TerminalInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInteraction for TerminalInteraction {
    fn confirm(&self, message: &str) -> Result<bool, InteractionError> {
        Self::confirm_stream(&mut io::stdin().lock(), &mut io::stdout(), message)
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_error(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &[u8]) -> bool {
        let mut reader = Cursor::new(input);
        let mut writer = Vec::new();
        TerminalInteraction::confirm_stream(&mut reader, &mut writer, "Force push?").unwrap()
    }

    #[test]
    fn test_confirm_prompt_text() {
        let mut reader = Cursor::new(&b"y\n"[..]);
        let mut writer = Vec::new();

        let result = TerminalInteraction::confirm_stream(&mut reader, &mut writer, "Force push?");
        assert!(result.unwrap());
        assert_eq!(String::from_utf8(writer).unwrap(), "Force push? [y/N]: ");
    }

    #[test]
    fn test_confirm_yes_variants() {
        assert!(answer(b"Yes\n"));
        assert!(answer(b"  YES  \n"));
    }

    #[test]
    fn test_confirm_no() {
        assert!(!answer(b"n\n"));
        assert!(!answer(b"\n"));
    }

    #[test]
    fn test_confirm_rejects_words_starting_with_y() {
        assert!(!answer(b"yeah, maybe not\n"));
        assert!(!answer(b"what\n"));
    }

    #[test]
    fn test_confirm_at_end_of_input() {
        assert!(!answer(b""));
    }
}

//! Interactive acquisition of run parameters.
//!
//! Reads answers from any `BufRead` and writes questions to any `Write`, so
//! the same flow drives a terminal session and the tests.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::models::Thresholds;

pub const SYNTHETIC_QUESTION: &str = "Do you want to create a test image with basic shapes? (y/n): ";
pub const PATH_QUESTION: &str = "Enter the path to your image: ";
pub const ADJUST_QUESTION: &str = "Do you want to adjust edge detection parameters? (y/n): ";
pub const LOW_QUESTION: &str = "Enter low threshold (10-100 recommended): ";
pub const HIGH_QUESTION: &str = "Enter high threshold (100-200 recommended): ";

/// The image source chosen at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceChoice {
    Synthetic,
    File(PathBuf),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and return the trimmed answer; end of input reads as empty
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Only `y` (any case) counts as yes
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.ask(question)?.eq_ignore_ascii_case("y"))
    }

    pub fn source(&mut self) -> io::Result<SourceChoice> {
        if self.confirm(SYNTHETIC_QUESTION)? {
            return Ok(SourceChoice::Synthetic);
        }
        Ok(SourceChoice::File(PathBuf::from(self.ask(PATH_QUESTION)?)))
    }

    /// Ask whether to override the defaults and, if so, for both values.
    ///
    /// Unparsable or inconsistent values fall back to the defaults with a warning.
    pub fn thresholds(&mut self) -> io::Result<Thresholds> {
        if !self.confirm(ADJUST_QUESTION)? {
            return Ok(Thresholds::default());
        }

        let Ok(low) = self.ask(LOW_QUESTION)?.parse::<i32>() else {
            return self.fall_back("Invalid input. Using default values.");
        };
        let Ok(high) = self.ask(HIGH_QUESTION)?.parse::<i32>() else {
            return self.fall_back("Invalid input. Using default values.");
        };

        match Thresholds::new(low, high) {
            Ok(thresholds) => Ok(thresholds),
            Err(e) => {
                let warning = format!("{}. Using default values.", e);
                self.fall_back(&warning)
            }
        }
    }

    fn fall_back(&mut self, warning: &str) -> io::Result<Thresholds> {
        writeln!(self.output, "{}", warning)?;
        log::warn!("{}", warning);
        Ok(Thresholds::default())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(answers: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_inner().1).unwrap()
    }

    #[test]
    fn yes_selects_synthetic_source() {
        let mut p = prompter("y\n");
        assert_eq!(p.source().unwrap(), SourceChoice::Synthetic);
        assert_eq!(transcript(p), SYNTHETIC_QUESTION);
    }

    #[test]
    fn uppercase_yes_is_accepted() {
        let mut p = prompter("  Y \n");
        assert_eq!(p.source().unwrap(), SourceChoice::Synthetic);
    }

    #[test]
    fn anything_else_asks_for_path() {
        let mut p = prompter("yes\nphotos/cat.png\n");
        assert_eq!(
            p.source().unwrap(),
            SourceChoice::File(PathBuf::from("photos/cat.png"))
        );
        assert_eq!(transcript(p), format!("{SYNTHETIC_QUESTION}{PATH_QUESTION}"));
    }

    #[test]
    fn declining_adjustment_keeps_defaults() {
        let mut p = prompter("n\n");
        assert_eq!(p.thresholds().unwrap(), Thresholds::default());
    }

    #[test]
    fn custom_thresholds_are_read() {
        let mut p = prompter("y\n30\n120\n");
        assert_eq!(p.thresholds().unwrap(), Thresholds { low: 30, high: 120 });
    }

    #[test]
    fn non_numeric_threshold_falls_back_with_warning() {
        let mut p = prompter("y\nabc\n");
        assert_eq!(p.thresholds().unwrap(), Thresholds::default());
        assert!(transcript(p).ends_with("Invalid input. Using default values.\n"));
    }

    #[test]
    fn bad_high_threshold_falls_back() {
        let mut p = prompter("y\n40\n1.5\n");
        assert_eq!(p.thresholds().unwrap(), Thresholds::default());
    }

    #[test]
    fn inverted_thresholds_fall_back() {
        let mut p = prompter("y\n200\n100\n");
        assert_eq!(p.thresholds().unwrap(), Thresholds::default());
        assert!(transcript(p).contains("Using default values."));
    }

    #[test]
    fn end_of_input_means_no() {
        let mut p = prompter("");
        assert!(!p.confirm(ADJUST_QUESTION).unwrap());
    }
}

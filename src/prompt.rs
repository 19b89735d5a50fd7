//! Yes/no confirmation before destructive actions.

use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// Returns true only on an explicit yes.
    fn confirm(&self, question: &str) -> bool;
}

/// Asks on the terminal. In one-shot mode there is nobody to ask, so the
/// answer is no unless `--yes` was given.
pub struct TerminalConfirm {
    one_shot: bool,
    auto_yes: bool,
}

impl TerminalConfirm {
    pub fn new(one_shot: bool, auto_yes: bool) -> Self {
        Self { one_shot, auto_yes }
    }

    fn ask(&self, question: &str, input: &mut dyn BufRead, output: &mut dyn Write) -> bool {
        if self.auto_yes {
            return true;
        }
        if self.one_shot {
            let _ = writeln!(output, "{} - use --yes with -c to confirm", question);
            return false;
        }

        let _ = write!(output, "{} [y/N]: ", question);
        output.flush().ok();

        let mut line = String::new();
        if input.read_line(&mut line).is_ok() {
            is_yes(&line)
        } else {
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        self.ask(question, &mut input, &mut io::stdout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(prompt: &TerminalConfirm, typed: &str) -> (bool, String) {
        let mut input = typed.as_bytes();
        let mut output = Vec::new();
        let yes = prompt.ask("Delete?", &mut input, &mut output);
        (yes, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_interactive_prompt() {
        let prompt = TerminalConfirm::new(false, false);
        let (yes, shown) = answer(&prompt, "y\n");
        assert!(yes);
        assert_eq!(shown, "Delete? [y/N]: ");

        let (yes, _) = answer(&prompt, "\n");
        assert!(!yes);
    }

    #[test]
    fn test_one_shot_denies_without_yes() {
        let prompt = TerminalConfirm::new(true, false);
        let (yes, shown) = answer(&prompt, "y\n");
        assert!(!yes);
        assert!(shown.contains("--yes"));
    }

    #[test]
    fn test_auto_yes() {
        let prompt = TerminalConfirm::new(true, true);
        let (yes, shown) = answer(&prompt, "");
        assert!(yes);
        assert!(shown.is_empty());
    }
}

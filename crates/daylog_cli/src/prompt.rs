//! Interactive form surface: one stdin prompt per question.
//!
//! Policy enforcement lives here, per the provider contract: empty input
//! takes the policy default, out-of-range input is clamped to the policy
//! bounds, hours are rounded to the 0.5 step, and unparsable input is
//! re-prompted.

use daylog_core::{Answer, AnswerProvider, InputPolicy};
use std::io::{BufRead, Write};

pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
    current_category: Option<String>,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            current_category: None,
        }
    }

    fn read_line(&mut self) -> Result<String, String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|err| format!("cannot read input: {err}"))?;
        if read == 0 {
            return Err("input closed".to_string());
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> AnswerProvider for ConsolePrompt<R, W> {
    fn provide(
        &mut self,
        category: &str,
        question: &str,
        policy: InputPolicy,
    ) -> Result<Answer, String> {
        if self.current_category.as_deref() != Some(category) {
            writeln!(self.output, "\n## {category}").map_err(|err| err.to_string())?;
            self.current_category = Some(category.to_string());
        }

        loop {
            write!(self.output, "{question} {}: ", hint(policy)).map_err(|err| err.to_string())?;
            self.output.flush().map_err(|err| err.to_string())?;

            let line = self.read_line()?;
            match answer_from_input(&line, policy) {
                Some(answer) => return Ok(answer),
                None => {
                    writeln!(self.output, "  please enter a number {}", hint(policy))
                        .map_err(|err| err.to_string())?;
                }
            }
        }
    }
}

fn hint(policy: InputPolicy) -> String {
    match policy {
        InputPolicy::Ordinal => "[1-5, default 3]".to_string(),
        InputPolicy::Hours => "[0-24 in 0.5 steps, default 0]".to_string(),
    }
}

/// Maps one input line to an answer; `None` means re-prompt.
fn answer_from_input(line: &str, policy: InputPolicy) -> Option<Answer> {
    let trimmed = line.trim();
    let raw = if trimmed.is_empty() {
        policy.default_value()
    } else {
        trimmed.parse::<f64>().ok()?
    };

    let stepped = (raw / policy.step()).round() * policy.step();
    let clamped = stepped.clamp(policy.min(), policy.max());

    match policy {
        // Clamped into bounds, so the constructors cannot fail.
        InputPolicy::Ordinal => Answer::ordinal(clamped as u8).ok(),
        InputPolicy::Hours => Answer::hours(clamped).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::{answer_from_input, ConsolePrompt};
    use daylog_core::{Answer, AnswerProvider, InputPolicy};

    #[test]
    fn empty_input_takes_the_policy_default() {
        assert_eq!(
            answer_from_input("\n", InputPolicy::Ordinal),
            Some(Answer::Ordinal(3))
        );
        assert_eq!(
            answer_from_input("  ", InputPolicy::Hours),
            Some(Answer::Hours(0.0))
        );
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(
            answer_from_input("9", InputPolicy::Ordinal),
            Some(Answer::Ordinal(5))
        );
        assert_eq!(
            answer_from_input("0", InputPolicy::Ordinal),
            Some(Answer::Ordinal(1))
        );
        assert_eq!(
            answer_from_input("30", InputPolicy::Hours),
            Some(Answer::Hours(24.0))
        );
        assert_eq!(
            answer_from_input("-1", InputPolicy::Hours),
            Some(Answer::Hours(0.0))
        );
    }

    #[test]
    fn hours_round_to_the_half_step() {
        assert_eq!(
            answer_from_input("6.4", InputPolicy::Hours),
            Some(Answer::Hours(6.5))
        );
        assert_eq!(
            answer_from_input("6.2", InputPolicy::Hours),
            Some(Answer::Hours(6.0))
        );
    }

    #[test]
    fn unparsable_input_asks_again() {
        assert_eq!(answer_from_input("lots", InputPolicy::Ordinal), None);
    }

    #[test]
    fn prompt_reprompts_then_accepts() {
        let input = b"nope\n4\n" as &[u8];
        let mut output = Vec::new();
        let mut prompt = ConsolePrompt::new(input, &mut output);

        let answer = prompt
            .provide("Work", "Did I enjoy work?", InputPolicy::Ordinal)
            .unwrap();
        assert_eq!(answer, Answer::Ordinal(4));

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("## Work"));
        assert!(transcript.contains("please enter a number"));
    }

    #[test]
    fn closed_input_reports_a_cause() {
        let input = b"" as &[u8];
        let mut output = Vec::new();
        let mut prompt = ConsolePrompt::new(input, &mut output);
        let err = prompt
            .provide("Work", "Did I enjoy work?", InputPolicy::Ordinal)
            .unwrap_err();
        assert_eq!(err, "input closed");
    }
}

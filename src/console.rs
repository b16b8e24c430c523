//! Interactive prediction loop over any line-based input.

use hiring_ai::inference::{Prediction, Predictor};
use hiring_ai::intake::parse_field;
use hiring_ai::schema::{ApplicantRecord, Decision, DomainPolicy, Feature, FEATURE_COUNT};
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 50;

pub struct ConsoleSession<R, W> {
    input: R,
    output: W,
    policy: DomainPolicy,
}

impl<R: BufRead, W: Write> ConsoleSession<R, W> {
    pub fn new(input: R, output: W, policy: DomainPolicy) -> Self {
        Self {
            input,
            output,
            policy,
        }
    }

    /// Prompt for applicants until the user declines or input ends. Returns the number of
    /// predictions shown.
    pub fn run(&mut self, predictor: &Predictor) -> io::Result<usize> {
        writeln!(self.output, "Welcome to the Recruitment Prediction System!")?;
        writeln!(
            self.output,
            "This system will predict whether an applicant will be hired based on their details."
        )?;

        let mut predictions = 0;
        loop {
            let Some(record) = self.read_applicant()? else {
                break;
            };
            let prediction = predictor.predict(&record);
            render_prediction(&mut self.output, &prediction)?;
            predictions += 1;

            write!(
                self.output,
                "\nWould you like to predict another applicant? (yes/no): "
            )?;
            self.output.flush()?;
            match self.read_line()? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("yes") => continue,
                _ => break,
            }
        }

        Ok(predictions)
    }

    /// `None` when input ends before all ten fields are collected.
    fn read_applicant(&mut self) -> io::Result<Option<ApplicantRecord>> {
        writeln!(self.output, "\nEnter Applicant Details:")?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            match self.read_field(feature)? {
                Some(value) => values[feature.index()] = value,
                None => return Ok(None),
            }
        }

        into_record(values).map(Some)
    }

    fn read_field(&mut self, feature: Feature) -> io::Result<Option<f64>> {
        loop {
            write!(self.output, "{}", field_prompt(feature))?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_field(feature, &line, self.policy) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => writeln!(self.output, "Invalid input: {err}. Please try again.")?,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn into_record(values: [f64; FEATURE_COUNT]) -> io::Result<ApplicantRecord> {
    ApplicantRecord::from_values(values)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Prompt text for one field; choice fields list their codes.
pub fn field_prompt(feature: Feature) -> String {
    let choices = feature.kind().choices();
    if !choices.is_empty() {
        let mut prompt = format!("{}:\n", feature.label());
        for choice in choices {
            prompt.push_str(&format!("{}: {}\n", choice.code, choice.label));
        }
        let domain = feature.domain().describe();
        prompt.push_str(&format!("Enter choice ({domain}): "));
        return prompt;
    }

    let domain = feature.domain();
    match domain.max {
        Some(_) => format!("{} ({}): ", feature.label(), domain.describe()),
        None => format!("{}: ", feature.label()),
    }
}

pub fn render_prediction<W: Write>(out: &mut W, prediction: &Prediction) -> io::Result<()> {
    writeln!(out, "\nPrediction Results:")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "Hiring Decision: {}", prediction.decision)?;
    writeln!(out, "Confidence: {:.2}%", prediction.confidence() * 100.0)?;
    writeln!(out, "\nDetailed Probabilities:")?;
    writeln!(
        out,
        "Probability of Not Hiring: {:.2}%",
        prediction.probability_of(Decision::NotHired) * 100.0
    )?;
    writeln!(
        out,
        "Probability of Hiring: {:.2}%",
        prediction.probability_of(Decision::Hired) * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_block_matches_expected_layout() {
        let prediction = Prediction {
            decision: Decision::Hired,
            probabilities: [0.13, 0.87],
        };
        let mut out = Vec::new();
        render_prediction(&mut out, &prediction).expect("rendered");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            format!(
                "\nPrediction Results:\n{}\nHiring Decision: Hired\nConfidence: 87.00%\n\n\
Detailed Probabilities:\nProbability of Not Hiring: 13.00%\nProbability of Hiring: 87.00%\n",
                "-".repeat(50)
            )
        );
    }

    #[test]
    fn unbuildable_records_surface_as_invalid_data() {
        let mut values = [1.0; FEATURE_COUNT];
        values[Feature::EducationLevel.index()] = 2.5;
        let err = into_record(values).expect_err("fractional code");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("EducationLevel"));

        values[Feature::EducationLevel.index()] = 2.0;
        assert_eq!(
            into_record(values).expect("whole codes").education_level,
            2
        );
    }

    #[test]
    fn prompts_describe_ranges_and_codes() {
        assert_eq!(field_prompt(Feature::Age), "Age (20-50): ");
        assert_eq!(
            field_prompt(Feature::DistanceFromCompany),
            "Distance from Company (km): "
        );
        let gender = field_prompt(Feature::Gender);
        assert!(gender.starts_with("Gender:\n0: Female\n1: Male\n"));
        assert!(gender.ends_with("Enter choice (0-1): "));
    }
}

//! Guided question flows.
//!
//! A wizard walks a conversation through the fixed steps of its [`Flow`], storing each
//! answer under the step key. When the last step is answered the record is marked
//! finished and, for flows that collect token amounts, `target_number` is derived as
//! `minting + distribution`.

use serde_json::{ Map, Number, Value };
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

pub const COMPLETE_MESSAGE: &str = "All steps complete. Thank you!";
pub const ALREADY_COMPLETE_MESSAGE: &str = "This conversation is already complete.";
pub const TARGET_NUMBER_KEY: &str = "target_number";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub key: &'static str,
    pub question: &'static str,
}

const MINTING: Step = Step {
    key: "minting",
    question: "How many tokens should be minted?",
};

const DISTRIBUTION: Step = Step {
    key: "distribution",
    question: "How many tokens should be set aside for distribution?",
};

const SETUP_STEPS: [Step; 5] = [
    MINTING,
    DISTRIBUTION,
    Step {
        key: "address",
        question: "What is the token contract address?",
    },
    Step {
        key: "wallet",
        question: "Which wallet should receive the tokens?",
    },
    Step {
        key: "signature",
        question: "Please paste the authorising signature.",
    },
];

const RESET_CONFIRM_STEPS: [Step; 1] = [
    Step {
        key: "confirm",
        question: "Are you sure you want to reset the current parameters? (yes/no)",
    },
];

const RESET_PARAMETERS_STEPS: [Step; 2] = [MINTING, DISTRIBUTION];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    Setup,
    ResetConfirm,
    ResetParameters,
}

impl Flow {
    pub fn steps(self) -> &'static [Step] {
        match self {
            Flow::Setup => &SETUP_STEPS,
            Flow::ResetConfirm => &RESET_CONFIRM_STEPS,
            Flow::ResetParameters => &RESET_PARAMETERS_STEPS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flow::Setup => "setup",
            Flow::ResetConfirm => "reset_confirm",
            Flow::ResetParameters => "reset_parameters",
        }
    }

    /// Page title and heading for this flow.
    pub fn title(self) -> &'static str {
        match self {
            Flow::Setup => "Setup Wizard",
            Flow::ResetConfirm => "Reset Confirmation",
            Flow::ResetParameters => "Reset Parameters",
        }
    }

    fn derives_target_number(self) -> bool {
        matches!(self, Flow::Setup | Flow::ResetParameters)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flow {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "setup" => Ok(Flow::Setup),
            "reset_confirm" => Ok(Flow::ResetConfirm),
            "reset_parameters" => Ok(Flow::ResetParameters),
            other => Err(ChatError::UnknownFlow(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Advanced,
    Completed,
    AlreadyComplete,
}

#[derive(Clone, Debug)]
pub struct WizardRecord {
    flow: Flow,
    steps: &'static [Step],
    index: usize,
    responses: Map<String, Value>,
    finished: bool,
}

impl WizardRecord {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            steps: flow.steps(),
            index: 0,
            responses: Map::new(),
            finished: false,
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn steps(&self) -> &'static [Step] {
        self.steps
    }

    /// Number of steps answered so far.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn responses(&self) -> &Map<String, Value> {
        &self.responses
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next_question(&self) -> &'static str {
        match self.steps.get(self.index) {
            Some(step) if !self.finished => step.question,
            _ => COMPLETE_MESSAGE,
        }
    }

    /// Records `text` as the answer to the current step and moves the cursor forward.
    pub fn answer(&mut self, text: &str) -> Outcome {
        let step = match self.steps.get(self.index) {
            Some(step) if !self.finished => step,
            _ => {
                return Outcome::AlreadyComplete;
            }
        };

        self.responses.insert(step.key.to_string(), Value::String(text.to_string()));
        self.index += 1;

        if self.index < self.steps.len() {
            return Outcome::Advanced;
        }

        if self.flow.derives_target_number() {
            let target = self.target_number().and_then(Number::from_f64).map_or(Value::Null, Value::Number);
            self.responses.insert(TARGET_NUMBER_KEY.to_string(), target);
        }
        self.finished = true;
        Outcome::Completed
    }

    fn target_number(&self) -> Option<f64> {
        let minting = parse_amount(self.responses.get(MINTING.key)?)?;
        let distribution = parse_amount(self.responses.get(DISTRIBUTION.key)?)?;
        Some(minting + distribution).filter(|sum| sum.is_finite())
    }
}

fn parse_amount(value: &Value) -> Option<f64> {
    value
        .as_str()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(flow: Flow, answers: &[&str]) -> WizardRecord {
        let mut record = WizardRecord::new(flow);
        for answer in answers {
            record.answer(answer);
        }
        record
    }

    #[test]
    fn new_record_starts_at_first_question() {
        let record = WizardRecord::new(Flow::Setup);
        assert_eq!(record.index, 0);
        assert!(!record.finished);
        assert!(record.responses.is_empty());
        assert_eq!(record.next_question(), "How many tokens should be minted?");
    }

    #[test]
    fn finishes_after_exactly_len_steps() {
        for flow in [Flow::Setup, Flow::ResetConfirm, Flow::ResetParameters] {
            let mut record = WizardRecord::new(flow);
            let len = flow.steps().len();
            for i in 0..len {
                assert!(!record.finished, "{flow} finished early at step {i}");
                let outcome = record.answer("1");
                let expected = if i + 1 == len { Outcome::Completed } else { Outcome::Advanced };
                assert_eq!(outcome, expected);
            }
            assert!(record.finished);
            assert_eq!(record.index, len);
            assert_eq!(record.next_question(), COMPLETE_MESSAGE);
        }
    }

    #[test]
    fn answering_a_finished_wizard_is_a_no_op() {
        let mut record = run(Flow::ResetParameters, &["1", "2"]);
        let before = record.responses.clone();

        assert_eq!(record.answer("99"), Outcome::AlreadyComplete);
        assert_eq!(record.index, 2);
        assert_eq!(record.responses, before);
    }

    #[test]
    fn accessors_report_progress_without_exposing_mutation() {
        let mut record = WizardRecord::new(Flow::ResetParameters);
        assert_eq!(record.flow(), Flow::ResetParameters);
        assert_eq!(record.steps().len(), 2);

        record.answer("3");
        assert_eq!(record.index(), 1);
        assert!(!record.is_finished());
        assert_eq!(record.responses()["minting"], "3");

        record.answer("4");
        record.answer("5");
        assert_eq!(record.index(), 2);
        assert!(record.is_finished());
        assert_eq!(record.responses()[TARGET_NUMBER_KEY].as_f64(), Some(7.0));
    }

    #[test]
    fn target_number_sums_fractional_amounts() {
        let record = run(Flow::ResetParameters, &["1.5", "2.5"]);
        assert_eq!(record.responses[TARGET_NUMBER_KEY].as_f64(), Some(4.0));
    }

    #[test]
    fn setup_scenario_derives_target_number() {
        let record = run(Flow::Setup, &["10", "5", "addr", "wallet", "sig"]);
        assert!(record.finished);
        assert_eq!(record.responses["minting"], "10");
        assert_eq!(record.responses["signature"], "sig");
        assert_eq!(record.responses[TARGET_NUMBER_KEY].as_f64(), Some(15.0));
    }

    #[test]
    fn unparsable_amount_yields_null_target() {
        let record = run(Flow::Setup, &["ten", "5", "addr", "wallet", "sig"]);
        assert!(record.finished);
        assert_eq!(record.responses[TARGET_NUMBER_KEY], Value::Null);

        let record = run(Flow::ResetParameters, &["inf", "5"]);
        assert_eq!(record.responses[TARGET_NUMBER_KEY], Value::Null);
    }

    #[test]
    fn amounts_tolerate_surrounding_whitespace() {
        let record = run(Flow::ResetParameters, &[" 7 ", "3\n"]);
        assert_eq!(record.responses[TARGET_NUMBER_KEY].as_f64(), Some(10.0));
    }

    #[test]
    fn reset_confirm_has_no_derived_field() {
        let record = run(Flow::ResetConfirm, &["yes"]);
        assert!(record.finished);
        assert!(!record.responses.contains_key(TARGET_NUMBER_KEY));
    }

    #[test]
    fn flow_names_round_trip_through_from_str() {
        for flow in [Flow::Setup, Flow::ResetConfirm, Flow::ResetParameters] {
            assert_eq!(flow.as_str().parse::<Flow>().unwrap(), flow);
        }
        assert!(matches!("main".parse::<Flow>(), Err(ChatError::UnknownFlow(name)) if name == "main"));
    }
}

//! Seeded arithmetic quiz generator.

use log::warn;
use quiz_defence_core::{Question, QuestionSource};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DISTRACTORS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    fn for_topic(topic: Option<&str>) -> &'static [Operation] {
        match topic {
            Some("addition") => &[Operation::Add],
            Some("subtraction") => &[Operation::Subtract],
            Some("multiplication") => &[Operation::Multiply],
            _ => &Self::ALL,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
        }
    }
}

/// Question source producing small arithmetic problems.
#[derive(Debug)]
pub(crate) struct ArithmeticQuestions {
    rng: ChaCha8Rng,
}

impl ArithmeticQuestions {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn generate(&mut self, operation: Operation) -> (String, i64) {
        match operation {
            Operation::Add => {
                let (a, b) = (self.rng.gen_range(1..=50), self.rng.gen_range(1..=50));
                (format!("{a} {} {b}", operation.symbol()), a + b)
            }
            Operation::Subtract => {
                let a: i64 = self.rng.gen_range(10..=60);
                let b = self.rng.gen_range(1..=a);
                (format!("{a} {} {b}", operation.symbol()), a - b)
            }
            Operation::Multiply => {
                let (a, b) = (self.rng.gen_range(2..=12), self.rng.gen_range(2..=12));
                (format!("{a} {} {b}", operation.symbol()), a * b)
            }
        }
    }

    fn options(&mut self, answer: i64) -> Vec<String> {
        let mut values = vec![answer];
        while values.len() <= DISTRACTORS {
            let offset = self.rng.gen_range(1..=9);
            let candidate = if self.rng.gen_bool(0.5) {
                answer + offset
            } else {
                answer - offset
            };
            if !values.contains(&candidate) {
                values.push(candidate);
            }
        }
        values.shuffle(&mut self.rng);
        values.into_iter().map(|value| value.to_string()).collect()
    }
}

impl QuestionSource for ArithmeticQuestions {
    fn next(&mut self, topic: Option<&str>) -> Question {
        let operations = Operation::for_topic(topic);
        loop {
            let operation = operations[self.rng.gen_range(0..operations.len())];
            let (prompt, answer) = self.generate(operation);
            let options = self.options(answer);
            match Question::new(prompt, answer.to_string(), options) {
                Ok(question) => return question,
                Err(error) => warn!("discarding generated question: {error}"),
            }
        }
    }
}

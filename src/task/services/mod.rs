//! Application services for task orchestration.

mod evaluator;
mod seeder;

pub use evaluator::{
    AutoCompletionEvaluator, EvaluationOutcome, EvaluatorError, TaskEvaluationError,
    TaskEvaluationFailure,
};
pub use seeder::{SeedError, SeedResult, TaskSeeder};

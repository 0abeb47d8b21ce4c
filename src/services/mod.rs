pub mod ai;
pub mod evaluations;
pub mod rubrics;
pub mod submissions;

pub use ai::AiService;
pub use evaluations::EvaluationService;
pub use rubrics::RubricService;
pub use submissions::SubmissionService;

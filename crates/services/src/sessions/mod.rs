mod navigator;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use navigator::QuizNavigator;
pub use view::{QuestionView, SelectOutcome};
pub use workflow::QuizLoopService;

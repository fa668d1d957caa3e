mod ids;
mod question;
mod result;
mod session;
mod settings;

pub use ids::{DisplayId, ParseIdError, QuestionId};
pub use question::{AnswerClass, GENERIC_CHOICE_LABEL, Question, QuestionError, QuestionType};
pub use result::{AttemptStats, QuizResult, WrongBookRequest, WrongQuestion};
pub use session::{QuizSession, SessionStateError};
pub use settings::QuizSettings;

mod ids;
mod question;
mod theme;

pub use ids::{AnswerId, ParseIdError, QuestionNumber};
pub use question::{PresentationAnswer, PresentationQuestion, RawQuestion, grade};
pub use theme::ThemePreference;

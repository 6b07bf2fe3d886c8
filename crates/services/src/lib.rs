#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod quiz_service;
pub mod sessions;
pub mod stats_service;
pub mod theme_service;

pub use quiz_core::RandomSource;

pub use app_services::AppServices;
pub use error::{
    AppServicesError, QuizServiceError, SessionError, StatsServiceError, ThemeServiceError,
};
pub use quiz_service::{QuestionBatch, QuizMeta, QuizService};
pub use sessions::{QuizSession, SessionService, Submission};
pub use stats_service::StatsService;
pub use theme_service::ThemeService;

//! Application services shared by the HTTP API and the CLI.

pub mod surveys;

pub use surveys::SurveyService;

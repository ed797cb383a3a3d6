pub(crate) mod access;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod prompts;
pub mod submissions;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use prompts::PromptService;
pub use submissions::SubmissionService;

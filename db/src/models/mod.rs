pub mod activity;
pub mod course;
pub mod enrollment;
pub mod submission;
pub mod submission_file;
pub mod user;

pub use activity::Entity as Activity;
pub use course::Entity as Course;
pub use enrollment::Entity as Enrollment;
pub use submission::Entity as Submission;
pub use submission_file::Entity as SubmissionFile;
pub use user::Entity as User;

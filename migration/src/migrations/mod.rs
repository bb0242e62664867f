pub mod m202510010001_create_users;
pub mod m202510010002_create_courses;
pub mod m202510010003_create_enrollments;
pub mod m202510010004_create_activities;
pub mod m202510010005_create_submissions;
pub mod m202510010006_create_submission_files;

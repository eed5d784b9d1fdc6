pub mod dispute;
pub mod document;
pub mod meeting;
pub mod notification;
pub mod professional;

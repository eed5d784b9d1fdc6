pub mod cases;
pub mod email;
pub mod issuance;
pub mod notifications;
pub mod scheduling;
pub mod storage;
pub mod workflow;

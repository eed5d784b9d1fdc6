pub mod ids;
pub mod response;

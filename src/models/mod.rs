pub mod advice;
pub mod job;

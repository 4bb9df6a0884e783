pub mod advisor;
pub mod gemini;
pub mod ranker;

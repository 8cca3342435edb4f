pub mod gemini;
pub mod session;

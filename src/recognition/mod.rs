pub mod gemini;
pub mod parse;

pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod score;
pub mod spam;

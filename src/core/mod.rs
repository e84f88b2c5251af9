mod engine;
mod extractor;
mod formatter;
mod parser;
mod renderer;
mod source;
mod types;

pub use extractor::extract_signatures;
pub use formatter::Formatter;
pub use parser::SignatureParser;
pub use renderer::Renderer;
pub use source::{DirTree, GoModuleTree, SourceTree};
pub use types::{FromType, Method, Param, Request, ToType};

// Export the main engine
pub use engine::Engine;

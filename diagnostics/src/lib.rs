pub mod error;
pub mod result;

pub use codespan_reporting::term::termcolor;

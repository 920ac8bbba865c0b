// Nexus Language Interpreter Library
//
// Lexer, Pratt parser and tree-walking evaluator for a small
// expression-oriented scripting language.

// Public modules
pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{BlockStatement, Expression, Identifier, Program, Statement};
pub use config::Config;
pub use error::{ErrorKind, NexusError, RuntimeError, Span};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{parse, Parser, Precedence};
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;

/// Runs `source` through the whole pipeline.
///
/// Returns the program's value (`None` when there is nothing to show), or
/// every parse diagnostic, or the single runtime error that stopped evaluation.
/// Evaluation is skipped when parsing produced diagnostics.
pub fn interpret(source: &str, config: &Config) -> Result<Option<Value>, Vec<NexusError>> {
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }

    Evaluator::with_config(config)
        .eval_program(&program)
        .map_err(|error| vec![NexusError::from(error)])
}

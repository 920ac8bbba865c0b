use crate::config::Config;

/// Runs a whole source file, printing the program's value when it has one.
///
/// Diagnostics are rendered against the source. Returns `false` if parsing
/// or evaluation failed.
pub fn run(source: &str, filename: Option<&str>, config: &Config) -> bool {
    match crate::interpret(source, config) {
        Ok(value) => {
            if let Some(value) = value {
                println!("{}", value);
            }
            true
        }
        Err(errors) => {
            for error in &errors {
                error.report(source, filename);
            }
            false
        }
    }
}

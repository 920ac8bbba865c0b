/// Settings shared by the REPL and the file runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Report type errors and unsupported constructs instead of evaluating them to `null`.
    pub strict: bool,
    /// 0 = warnings only, 1 = debug, 2 and above = trace.
    pub verbosity: u8,
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            verbosity: 0,
            prompt: ">>> ".to_string(),
        }
    }
}

impl Config {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Default log filter directive for this verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

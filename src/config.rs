use nix::sys::signal::Signal;

#[derive(Debug, Clone)]
pub struct Config {
    /// Wrap the prompt in ANSI colors.
    pub color_prompt: bool,
    /// Print the "Run help for help" line when the loop starts.
    pub banner: bool,
    /// Signal delivered by the `kill` builtin.
    pub kill_signal: Signal,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            color_prompt: true,
            banner: true,
            kill_signal: Signal::SIGKILL,
        }
    }
}

impl Config {
    /// Plain prompt and no banner, for driving the shell from scripts.
    pub fn quiet() -> Self {
        Config {
            color_prompt: false,
            banner: false,
            ..Config::default()
        }
    }
}

use anyhow::Context;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

use stage::{signal, Cli, Config, Session, Terminal};

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    signal::install().context("failed to install signal handlers")?;
    let code = {
        let terminal = Terminal::new().context("failed to start line editor")?;
        let session = Session::new(Config::default(), io::stdout(), io::stderr());
        Cli::new(terminal, session).go()?
    };
    process::exit(code);
}

use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::common::*;

extern "C" fn handle_interrupt(_signal: libc::c_int) {}

/// Keep Ctrl-C and Ctrl-\ from killing the shell while it waits on a
/// foreground child. A caught signal is reset to its default across exec,
/// so children still see the usual dispositions.
pub fn install() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGQUIT] {
        unsafe { signal::sigaction(sig, &action) }.map_err(ShellError::SignalSetup)?;
    }
    Ok(())
}

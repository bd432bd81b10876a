use std::fmt::{self, Write};

use clap::Parser;
use gdbstub::target::ext::monitor_cmd::{ConsoleOutput, MonitorCmd};
use log::{debug, warn};

use crate::{debugger::Debugger, reports::Command};

/// A `monitor` line, e.g. `monitor report-mounts 1`.
#[derive(Debug, Parser)]
#[command(name = "monitor", no_binary_name = true, disable_version_flag = true)]
pub struct MonitorLine {
    #[command(subcommand)]
    pub command: Command,
}

impl Debugger {
    /// Runs one `monitor` line against the image. Usage errors and report
    /// failures are written to `out`; only a failing `out` is an error.
    pub fn monitor(&self, line: &str, out: &mut dyn Write) -> fmt::Result {
        let line = match MonitorLine::try_parse_from(line.split_whitespace()) {
            Ok(line) => line,
            Err(e) => return writeln!(out, "{}", e.render().to_string().trim_end()),
        };

        if let Err(e) = line.command.run(self.image(), out) {
            warn!("{:?} failed: {e}", line.command);
            writeln!(out, "error: {e}")?;
        }
        Ok(())
    }
}

impl MonitorCmd for Debugger {
    fn handle_monitor_cmd(
        &mut self,
        cmd: &[u8],
        mut out: ConsoleOutput<'_>,
    ) -> Result<(), Self::Error> {
        let cmd = String::from_utf8_lossy(cmd);
        debug!("handle_monitor_cmd(cmd: {cmd:?})");

        self.monitor(&cmd, &mut out)?;
        Ok(())
    }
}

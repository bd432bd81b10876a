pub mod banner;
pub mod mounts;
pub mod ps;
pub mod resources;

use std::fmt::Write;

use clap::Subcommand;
use log::info;

use crate::{error::Result, introspect::Introspect};

/// The reports, shared by the command line and GDB `monitor`.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the kernel command line
    #[command(name = "report-cmdline")]
    Cmdline,
    /// Print the kernel version banner
    #[command(name = "report-version")]
    Version,
    /// Print the I/O memory resource tree, like /proc/iomem
    #[command(name = "report-iomem")]
    Iomem,
    /// Print the I/O port resource tree, like /proc/ioports
    #[command(name = "report-ioports")]
    Ioports,
    /// Print the mount table of a process's mount namespace, like /proc/mounts
    #[command(name = "report-mounts")]
    Mounts {
        /// Process id (defaults to 1)
        #[arg(allow_hyphen_values = true)]
        pid: Option<String>,
    },
    /// Print the task list
    #[command(name = "report-ps")]
    Ps,
}

impl Command {
    pub fn run(&self, target: &dyn Introspect, out: &mut dyn Write) -> Result<()> {
        info!("running {self:?}");
        match self {
            Command::Cmdline => banner::report_cmdline(target, out),
            Command::Version => banner::report_version(target, out),
            Command::Iomem => resources::report_resources(target, "iomem_resource", out),
            Command::Ioports => resources::report_resources(target, "ioport_resource", out),
            Command::Mounts { pid } => {
                let pid = mounts::parse_pid(pid.as_deref())?;
                mounts::report_mounts(target, pid, out)
            }
            Command::Ps => ps::report_ps(target, out),
        }
    }
}

use gdbstub::target::{
    Target,
    ext::{base::BaseOps, monitor_cmd::MonitorCmdOps},
};
use gdbstub_arch::x86::X86_64_SSE;

use crate::debugger::Debugger;

impl Target for Debugger {
    type Arch = X86_64_SSE;
    type Error = anyhow::Error;

    fn base_ops(&mut self) -> BaseOps<'_, Self::Arch, Self::Error> {
        BaseOps::SingleThread(self)
    }

    fn support_monitor_cmd(&mut self) -> Option<MonitorCmdOps<'_, Self>> {
        Some(self)
    }

    // Breakpoints make no sense on a memory image; GDB's fallback of patching
    // memory is refused by `write_addrs`.
    fn guard_rail_implicit_sw_breakpoints(&self) -> bool {
        true
    }
}

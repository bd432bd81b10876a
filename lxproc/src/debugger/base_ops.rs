use gdbstub::{
    arch::Arch,
    target::{TargetError, TargetResult, ext::base::singlethread::SingleThreadBase},
};
use log::{debug, warn};

use crate::debugger::Debugger;

impl SingleThreadBase for Debugger {
    fn read_registers(
        &mut self,
        regs: &mut <Self::Arch as Arch>::Registers,
    ) -> TargetResult<(), Self> {
        debug!("read_registers()");

        *regs = Default::default();
        Ok(())
    }

    fn write_registers(
        &mut self,
        _regs: &<Self::Arch as Arch>::Registers,
    ) -> TargetResult<(), Self> {
        debug!("write_registers()");

        warn!("refusing to write registers of a kernel image");
        Err(TargetError::NonFatal)
    }

    fn read_addrs(
        &mut self,
        start_addr: <Self::Arch as Arch>::Usize,
        data: &mut [u8],
    ) -> TargetResult<usize, Self> {
        debug!(
            "read_addrs(start_addr: {:x}, size: {:x})",
            start_addr,
            data.len()
        );

        self.read_memory(start_addr, data).map_err(|e| {
            warn!("failed to read memory at {:x}: {:?}", start_addr, e);
            TargetError::NonFatal
        })
    }

    fn write_addrs(
        &mut self,
        start_addr: <Self::Arch as Arch>::Usize,
        data: &[u8],
    ) -> TargetResult<(), Self> {
        debug!(
            "write_addrs(start_addr: {:x}, data: {:x?})",
            start_addr, data
        );

        warn!("refusing to write memory of a kernel image at {:x}", start_addr);
        Err(TargetError::NonFatal)
    }
}

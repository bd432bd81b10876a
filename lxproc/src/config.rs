use std::path::PathBuf;

use clap::Args;
use log::info;

use crate::{
    error::Result,
    image::{KernelImage, layout::Layout, memory::Memory, symbols::SymbolTable},
    util::parse_addr,
};

/// Where the kernel image and its debug metadata come from.
#[derive(Debug, Args)]
pub struct ImageArgs {
    /// ELF core of the kernel (vmcore, /proc/kcore)
    #[arg(long, required_unless_present = "raw", conflicts_with = "raw")]
    pub core: Option<PathBuf>,

    /// Flat memory dump, mapped at --raw-base
    #[arg(long, requires = "raw_base")]
    pub raw: Option<PathBuf>,

    /// Kernel virtual address of the first byte of --raw
    #[arg(long, value_parser = parse_addr)]
    pub raw_base: Option<u64>,

    /// System.map or a copy of /proc/kallsyms
    #[arg(long)]
    pub system_map: PathBuf,

    /// Struct field offsets for this kernel build
    #[arg(long)]
    pub layout: PathBuf,

    /// KASLR slide added to every System.map address
    #[arg(long, value_parser = parse_addr, default_value = "0")]
    pub kaslr_offset: u64,
}

impl ImageArgs {
    pub fn open(&self) -> Result<KernelImage> {
        let memory = match (&self.core, &self.raw) {
            (Some(core), _) => Memory::open_core(core)?,
            (None, Some(raw)) => Memory::open_raw(raw, self.raw_base.unwrap_or_default())?,
            (None, None) => unreachable!("clap requires --core or --raw"),
        };
        let symbols = SymbolTable::load(&self.system_map, self.kaslr_offset)?;
        let layout = Layout::load(&self.layout)?;
        info!(
            "loaded {} symbols from {}",
            symbols.len(),
            self.system_map.display()
        );
        Ok(KernelImage::new(memory, symbols, layout))
    }
}

pub mod base_ops;
pub mod monitor_cmd;
pub mod target;

use crate::image::KernelImage;

/// A GDB remote target backed by a kernel image.
///
/// The image is served read-only: memory reads come from the image, the
/// registers read as zero and the target can never be resumed.
#[derive(Debug)]
pub struct Debugger {
    image: KernelImage,
}

impl Debugger {
    pub fn new(image: KernelImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &KernelImage {
        &self.image
    }

    /// Reads up to the end of the segment holding `addr`; GDB asks again for
    /// whatever is left.
    pub fn read_memory(&self, addr: u64, data: &mut [u8]) -> anyhow::Result<usize> {
        Ok(self.image.read_prefix(addr, data)?)
    }
}

use std::fmt::Write;

use crate::{
    error::{Error, Result},
    introspect::Introspect,
};

/// `saved_command_line` is a `char *`; the string it points to has no
/// trailing newline.
pub fn report_cmdline(target: &dyn Introspect, out: &mut dyn Write) -> Result<()> {
    let ptr = target.read_u64(target.symbol("saved_command_line")?)?;
    if ptr == 0 {
        return Err(Error::null_pointer("char *", "saved_command_line"));
    }
    writeln!(out, "{}", target.read_cstr(ptr)?)?;
    Ok(())
}

/// `linux_banner` is a `char []` that already ends in a newline.
pub fn report_version(target: &dyn Introspect, out: &mut dyn Write) -> Result<()> {
    let banner = target.read_cstr(target.symbol("linux_banner")?)?;
    out.write_str(&banner)?;
    Ok(())
}

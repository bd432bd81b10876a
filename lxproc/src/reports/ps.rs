use std::fmt::Write;

use crate::{error::Result, introspect::Introspect, tasks::task_list};

pub fn report_ps(target: &dyn Introspect, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{:>7} COMM", "PID")?;
    for task in task_list(target)? {
        let task = task?;
        writeln!(out, "{:>7} {}", task.read_i32("pid")?, task.inline_string("comm")?)?;
    }
    Ok(())
}

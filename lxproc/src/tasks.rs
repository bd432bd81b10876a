use std::iter;

use log::debug;

use crate::{
    error::{Error, Result},
    handle::Handle,
    introspect::Introspect,
    lists::list_for_each_entry,
};

/// Every task on the global task list, starting with `init_task` itself.
pub fn task_list(
    target: &dyn Introspect,
) -> Result<impl Iterator<Item = Result<Handle<'_>>> + '_> {
    let init_task = Handle::symbol(target, "init_task", "task_struct")?;
    let rest = list_for_each_entry(
        init_task.embedded("tasks", "list_head")?,
        "task_struct",
        "tasks",
    )?;
    Ok(iter::once(Ok(init_task)).chain(rest))
}

/// The other threads of `leader`'s thread group.
pub fn threads<'a>(
    leader: Handle<'a>,
) -> Result<impl Iterator<Item = Result<Handle<'a>>> + 'a> {
    list_for_each_entry(
        leader.embedded("thread_group", "list_head")?,
        "task_struct",
        "thread_group",
    )
}

/// Finds a task by thread id, searching every thread of every thread group.
pub fn task_by_pid(target: &dyn Introspect, pid: i32) -> Result<Handle<'_>> {
    debug!("task_by_pid(pid: {pid})");
    for leader in task_list(target)? {
        let leader = leader?;
        if leader.read_i32("pid")? == pid {
            return Ok(leader);
        }
        for thread in threads(leader)? {
            let thread = thread?;
            if thread.read_i32("pid")? == pid {
                return Ok(thread);
            }
        }
    }
    Err(Error::NoSuchProcess(pid))
}

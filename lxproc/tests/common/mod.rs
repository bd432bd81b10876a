#![allow(dead_code)]

use std::path::Path;

use lxproc::image::{KernelImage, layout::Layout, memory::Memory, symbols::SymbolTable};

pub const BASE: u64 = 0xffff_8880_0000_0000;

pub const LAYOUT: &str = "\
# struct list_head
list_head.next 0
list_head.prev 8

# struct resource
resource.start   0x00
resource.end     0x08
resource.name    0x10
resource.parent  0x20
resource.sibling 0x28
resource.child   0x30

# struct task_struct
task_struct.pid     0x00
task_struct.comm    0x08
task_struct.tasks   0x18
task_struct.nsproxy 0x28
task_struct.thread_group 0x30

nsproxy.mnt_ns     8
mnt_namespace.list 16

# struct mount
mount.mnt_parent     0x00
mount.mnt_mountpoint 0x08
mount.mnt            0x10
mount.mnt_list       0x28
mount.mnt_devname    0x38

vfsmount.mnt_root  0x00
vfsmount.mnt_sb    0x08
vfsmount.mnt_flags 0x10

super_block.s_flags 0x08
super_block.s_type  0x10
file_system_type.name 0

dentry.d_parent    0x00
dentry.d_name.name 0x10 # d_name is a struct qstr
";

const RESOURCE_SIZE: usize = 0x38;
const TASK_SIZE: usize = 0x40;
const MOUNT_SIZE: usize = 0x40;

/// Lays out kernel structs in one flat buffer that becomes the image memory.
pub struct FakeKernel {
    data: Vec<u8>,
    symbols: SymbolTable,
    init_task: Option<u64>,
}

impl FakeKernel {
    pub fn new() -> Self {
        Self {
            // Nothing is allocated at BASE itself.
            data: vec![0; 64],
            symbols: SymbolTable::default(),
            init_task: None,
        }
    }

    pub fn build(self) -> KernelImage {
        let layout = Layout::parse(Path::new("test.layout"), LAYOUT).expect("bad test layout");
        KernelImage::new(Memory::from_bytes(BASE, self.data), self.symbols, layout)
    }

    pub fn alloc(&mut self, size: usize) -> u64 {
        let offset = self.data.len().next_multiple_of(8);
        self.data.resize(offset + size.max(8), 0);
        BASE + offset as u64
    }

    fn offset(&self, addr: u64) -> usize {
        (addr - BASE) as usize
    }

    pub fn put_bytes(&mut self, addr: u64, bytes: &[u8]) {
        let off = self.offset(addr);
        self.data[off..off + bytes.len()].copy_from_slice(bytes);
    }

    pub fn put_u64(&mut self, addr: u64, value: u64) {
        self.put_bytes(addr, &value.to_le_bytes());
    }

    pub fn put_u32(&mut self, addr: u64, value: u32) {
        self.put_bytes(addr, &value.to_le_bytes());
    }

    pub fn get_u64(&self, addr: u64) -> u64 {
        let off = self.offset(addr);
        u64::from_le_bytes(self.data[off..off + 8].try_into().unwrap())
    }

    pub fn cstr(&mut self, s: &str) -> u64 {
        let addr = self.alloc(s.len() + 1);
        self.put_bytes(addr, s.as_bytes());
        addr
    }

    pub fn symbol(&mut self, name: &str, addr: u64) {
        self.symbols.insert(name, addr);
    }

    /// A `char *` variable pointing at `value`.
    pub fn string_symbol(&mut self, name: &str, value: &str) {
        let var = self.alloc(8);
        let s = self.cstr(value);
        self.put_u64(var, s);
        self.symbol(name, var);
    }

    /// A `char []` variable holding `value`.
    pub fn array_symbol(&mut self, name: &str, value: &str) {
        let s = self.cstr(value);
        self.symbol(name, s);
    }

    pub fn list_init(&mut self, head: u64) {
        self.put_u64(head, head);
        self.put_u64(head + 8, head);
    }

    pub fn list_add_tail(&mut self, head: u64, node: u64) {
        let prev = self.get_u64(head + 8);
        self.put_u64(node, head);
        self.put_u64(node + 8, prev);
        self.put_u64(prev, node);
        self.put_u64(head + 8, node);
    }

    pub fn resource(&mut self, start: u64, end: u64, name: &str) -> u64 {
        let res = self.alloc(RESOURCE_SIZE);
        let name = self.cstr(name);
        self.put_u64(res, start);
        self.put_u64(res + 0x08, end);
        self.put_u64(res + 0x10, name);
        res
    }

    /// Appends `child` to the end of `parent`'s child list.
    pub fn add_child(&mut self, parent: u64, child: u64) {
        self.put_u64(child + 0x20, parent);
        let mut link = parent + 0x30;
        while self.get_u64(link) != 0 {
            link = self.get_u64(link) + 0x28;
        }
        self.put_u64(link, child);
    }

    fn task_struct(&mut self, pid: i32, comm: &str, nsproxy: u64) -> u64 {
        let task = self.alloc(TASK_SIZE);
        self.put_u32(task, pid as u32);
        self.put_bytes(task + 0x08, &comm.as_bytes()[..comm.len().min(15)]);
        self.put_u64(task + 0x28, nsproxy);
        self.list_init(task + 0x30);
        task
    }

    /// Registers a thread-group leader; the first one becomes `init_task`.
    pub fn task(&mut self, pid: i32, comm: &str, nsproxy: u64) -> u64 {
        let task = self.task_struct(pid, comm, nsproxy);
        match self.init_task {
            None => {
                self.list_init(task + 0x18);
                self.symbol("init_task", task);
                self.init_task = Some(task);
            }
            Some(init) => self.list_add_tail(init + 0x18, task + 0x18),
        }
        task
    }

    /// Adds a thread to `leader`'s thread group, sharing its namespaces.
    pub fn thread(&mut self, leader: u64, pid: i32, comm: &str) -> u64 {
        let nsproxy = self.get_u64(leader + 0x28);
        let thread = self.task_struct(pid, comm, nsproxy);
        self.list_add_tail(leader + 0x30, thread + 0x30);
        thread
    }

    /// Returns `(nsproxy, mnt_namespace)`.
    pub fn namespace(&mut self) -> (u64, u64) {
        let ns = self.alloc(0x20);
        self.list_init(ns + 16);
        let nsproxy = self.alloc(0x10);
        self.put_u64(nsproxy + 8, ns);
        (nsproxy, ns)
    }

    /// A dentry; `parent == None` makes a filesystem root.
    pub fn dentry(&mut self, parent: Option<u64>, name: &str) -> u64 {
        let dentry = self.alloc(0x18);
        let name = self.cstr(name);
        self.put_u64(dentry, parent.unwrap_or(dentry));
        self.put_u64(dentry + 0x10, name);
        dentry
    }

    pub fn superblock(&mut self, fstype: &str, s_flags: u64) -> u64 {
        let fs_type = self.alloc(8);
        let name = self.cstr(fstype);
        self.put_u64(fs_type, name);

        let sb = self.alloc(0x18);
        self.put_u64(sb + 0x08, s_flags);
        self.put_u64(sb + 0x10, fs_type);
        sb
    }

    /// Adds a mount to the tail of `ns`'s list. `parent == None` makes the
    /// namespace root, which is its own parent.
    pub fn mount(
        &mut self,
        ns: u64,
        parent: Option<u64>,
        mountpoint: u64,
        devname: &str,
        sb: u64,
        mnt_flags: u32,
    ) -> u64 {
        let mount = self.alloc(MOUNT_SIZE);
        let devname = self.cstr(devname);
        self.put_u64(mount, parent.unwrap_or(mount));
        self.put_u64(mount + 0x08, mountpoint);
        self.put_u64(mount + 0x18, sb);
        self.put_u32(mount + 0x20, mnt_flags);
        self.put_u64(mount + 0x38, devname);
        self.list_add_tail(ns + 16, mount + 0x28);
        mount
    }
}

// Byte streams between the simulator and the terminal bridge.
//
// The bridge is a separate process that maps the same shared memory segment,
// drains the output ring to the screen and appends keystrokes to the input
// ring. The layout below has to match it byte for byte. Each index is only
// ever advanced by one side, and there is no lock over the buffer as a whole.

use std::ops::Deref;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::{io, ptr};

pub const IO_BUF_SIZE: usize = 4096;

#[repr(C)]
pub struct SharedIo {
    out_head: AtomicU32, // simulator -> terminal
    out_tail: AtomicU32,
    in_head: AtomicU32, // terminal -> simulator
    in_tail: AtomicU32,
    out_buf: [AtomicU8; IO_BUF_SIZE],
    in_buf: [AtomicU8; IO_BUF_SIZE],
}

const _: () = assert!(size_of::<SharedIo>() == 4 * size_of::<u32>() + 2 * IO_BUF_SIZE);

impl SharedIo {
    fn new() -> SharedIo {
        SharedIo {
            out_head: AtomicU32::new(0),
            out_tail: AtomicU32::new(0),
            in_head: AtomicU32::new(0),
            in_tail: AtomicU32::new(0),
            out_buf: std::array::from_fn(|_| AtomicU8::new(0)),
            in_buf: std::array::from_fn(|_| AtomicU8::new(0)),
        }
    }

    // Written by the display, drained by the terminal.
    pub fn output(&self) -> Ring<'_> {
        Ring{head: &self.out_head, tail: &self.out_tail, buf: &self.out_buf}
    }

    // Filled by the terminal, read by the keyboard.
    pub fn input(&self) -> Ring<'_> {
        Ring{head: &self.in_head, tail: &self.in_tail, buf: &self.in_buf}
    }
}

////////////////////////////////////////////////////////////////////////////////

// One circular buffer. Full when advancing head would reach tail, so at most
// CAPACITY - 1 bytes are ever queued.
#[derive(Clone, Copy)]
pub struct Ring<'a> {
    head: &'a AtomicU32,
    tail: &'a AtomicU32,
    buf: &'a [AtomicU8; IO_BUF_SIZE],
}

impl Ring<'_> {
    pub const CAPACITY: usize = IO_BUF_SIZE;

    // The other side can scribble anything into the indices; keep them in
    // bounds.
    pub fn head(&self) -> usize {
        self.head.load(Ordering::Acquire) as usize % Self::CAPACITY
    }

    pub fn tail(&self) -> usize {
        self.tail.load(Ordering::Acquire) as usize % Self::CAPACITY
    }

    pub fn len(&self) -> usize {
        (self.head() + Self::CAPACITY - self.tail()) % Self::CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.head() == self.tail()
    }

    pub fn is_full(&self) -> bool {
        (self.head() + 1) % Self::CAPACITY == self.tail()
    }

    // Producer side. Returns false, leaving the ring untouched, when full.
    pub fn push(&self, val: u8) -> bool {
        let head = self.head();
        let next = (head + 1) % Self::CAPACITY;
        if next == self.tail() {
            return false;
        }
        self.buf[head].store(val, Ordering::Relaxed);
        self.head.store(next as u32, Ordering::Release);
        true
    }

    // Consumer side.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail();
        if self.head() == tail {
            return None;
        }
        let val = self.buf[tail].load(Ordering::Relaxed);
        self.tail.store(((tail + 1) % Self::CAPACITY) as u32, Ordering::Release);
        Some(val)
    }

    pub fn write(&self, vals: &[u8]) -> usize {
        vals.iter().take_while(|val| self.push(**val)).count()
    }

    pub fn drain(&self) -> Vec<u8> {
        std::iter::from_fn(|| self.pop()).collect()
    }
}

////////////////////////////////////////////////////////////////////////////////

enum Backing {
    Private(Box<SharedIo>),
    #[cfg(unix)]
    Mapped(ptr::NonNull<SharedIo>),
}

// Owner of the ring pair: either the named POSIX shared memory segment the
// terminal bridge attaches to, or a private copy of the same layout for
// headless runs and tests.
pub struct IoRegion {
    backing: Backing,
}

// The mapping is only reached through atomics.
unsafe impl Send for IoRegion {}
unsafe impl Sync for IoRegion {}

impl IoRegion {
    pub const DEFAULT_SHM_NAME: &'static str = "/asoc_shm";

    pub fn private() -> IoRegion {
        IoRegion{backing: Backing::Private(Box::new(SharedIo::new()))}
    }

    // Creates the segment if needed, sizes it, maps it and clears both rings.
    #[cfg(unix)]
    pub fn open_shared(name: &str) -> io::Result<IoRegion> {
        let cname = std::ffi::CString::new(name)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        let size = size_of::<SharedIo>();

        unsafe {
            let fd = libc::shm_open(cname.as_ptr(), libc::O_CREAT | libc::O_RDWR, 0o666 as libc::mode_t);
            if fd == -1 {
                return Err(io::Error::last_os_error());
            }
            if libc::ftruncate(fd, size as libc::off_t) == -1 {
                let err = io::Error::last_os_error();
                libc::close(fd);
                return Err(err);
            }

            let addr = libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            );
            libc::close(fd);
            if addr == libc::MAP_FAILED {
                return Err(io::Error::last_os_error());
            }

            ptr::write_bytes(addr as *mut u8, 0, size);
            let mapped = ptr::NonNull::new(addr as *mut SharedIo)
                .ok_or_else(|| io::Error::other("mmap returned null"))?;
            Ok(IoRegion{backing: Backing::Mapped(mapped)})
        }
    }

    #[cfg(not(unix))]
    pub fn open_shared(_name: &str) -> io::Result<IoRegion> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "shared memory needs a unix host"))
    }

    pub fn is_shared(&self) -> bool {
        !matches!(self.backing, Backing::Private(_))
    }
}

impl Deref for IoRegion {
    type Target = SharedIo;

    fn deref(&self) -> &SharedIo {
        match &self.backing {
            Backing::Private(boxed) => &**boxed,
            #[cfg(unix)]
            Backing::Mapped(ptr) => unsafe { ptr.as_ref() },
        }
    }
}

impl Drop for IoRegion {
    fn drop(&mut self) {
        // The segment itself stays around for the terminal bridge.
        #[cfg(unix)]
        if let Backing::Mapped(ptr) = self.backing {
            unsafe {
                libc::munmap(ptr.as_ptr() as *mut libc::c_void, size_of::<SharedIo>());
            }
        }
    }
}

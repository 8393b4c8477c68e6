//! Unix implementation of the platform capability port
//!
//! Fault hooks and the exit observer go through `libc` directly; raw stack
//! capture and symbol resolution use the `backtrace` crate's unsynchronized
//! primitives, which are safe here because the crash path is single-threaded
//! by contract.

use std::ffi::c_void;

use blackbox_core::ports::{Platform, ResolvedSymbol};

use crate::manager;

/// Synchronous fault signals observed by the subsystem.
const FAULT_SIGNALS: [libc::c_int; 5] = [
    libc::SIGSEGV,
    libc::SIGBUS,
    libc::SIGILL,
    libc::SIGFPE,
    libc::SIGABRT,
];

/// Signal handler entry: report through the global manager, then restore the
/// default disposition and re-raise so the OS performs its normal teardown.
/// The re-raise also serves as the unconditional-abort escalation when a
/// second fault arrives during handling.
extern "C" fn fault_handler(signo: libc::c_int) {
    manager::fault_signal_entry(signo);
    unsafe {
        libc::signal(signo, libc::SIG_DFL);
        libc::raise(signo);
    }
}

/// Unix (Linux/macOS) platform adapter.
#[derive(Debug, Default)]
pub struct UnixPlatform;

impl UnixPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for UnixPlatform {
    fn install_fault_handler(&self) -> anyhow::Result<()> {
        for signo in FAULT_SIGNALS {
            let previous = unsafe { libc::signal(signo, fault_handler as libc::sighandler_t) };
            if previous == libc::SIG_ERR {
                anyhow::bail!("failed to install handler for signal {signo}");
            }
        }
        Ok(())
    }

    fn install_exit_observer(&self, observer: extern "C" fn()) -> anyhow::Result<()> {
        let rc = unsafe { libc::atexit(observer) };
        if rc != 0 {
            anyhow::bail!("atexit registration failed with code {rc}");
        }
        Ok(())
    }

    fn debugger_attached(&self) -> bool {
        // Linux: a nonzero TracerPid in /proc/self/status means a tracer
        // (debugger) owns this process. Elsewhere, assume none.
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|status| {
                status
                    .lines()
                    .find(|line| line.starts_with("TracerPid:"))
                    .and_then(|line| line.split_whitespace().nth(1))
                    .and_then(|pid| pid.parse::<u32>().ok())
            })
            .is_some_and(|pid| pid != 0)
    }

    fn raw_backtrace(&self, out: &mut [usize]) -> usize {
        let mut count = 0;
        unsafe {
            backtrace::trace_unsynchronized(|frame| {
                if count >= out.len() {
                    return false;
                }
                out[count] = frame.ip() as usize;
                count += 1;
                true
            });
        }
        count
    }

    fn resolve_symbol(&self, addr: usize) -> Option<ResolvedSymbol> {
        let mut resolved: Option<ResolvedSymbol> = None;
        unsafe {
            backtrace::resolve_unsynchronized(addr as *mut c_void, |symbol| {
                if resolved.is_some() {
                    return;
                }
                let Some(name) = symbol.name() else {
                    return;
                };
                let filename = symbol
                    .filename()
                    .and_then(|path| path.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                resolved = Some(ResolvedSymbol {
                    function: name.to_string(),
                    filename,
                    lineno: symbol.lineno().unwrap_or(0),
                    symbol_addr: symbol.addr().map(|a| a as usize).unwrap_or(addr),
                });
            });
        }
        resolved
    }

    fn hostname(&self) -> Option<String> {
        let mut buf = [0u8; 256];
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
        if rc != 0 {
            return None;
        }
        let end = buf.iter().position(|b| *b == 0).unwrap_or(buf.len());
        Some(String::from_utf8_lossy(&buf[..end]).into_owned())
    }
}

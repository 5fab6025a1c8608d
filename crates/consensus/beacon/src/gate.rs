use reth_chainspec::Hardfork;
use std::{
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::sync::{Mutex, MutexGuard};

/// The VM-side state the gate serializes access to: the executor itself plus the small amount of
/// bookkeeping `run`'s per-block callback carries between invocations.
pub(crate) struct GateState<Vm> {
    pub(crate) vm: Vm,
    pub(crate) hardfork: Hardfork,
}

/// Single-writer execution gate: a `tokio::sync::Mutex` guarding the VM and its bookkeeping, plus
/// a best-effort `running` flag so non-blocking callers can bail out without contending the lock,
/// and a cooperative `shutdown` flag the run loop checks between blocks.
pub(crate) struct ExecutionGate<Vm> {
    state: Mutex<GateState<Vm>>,
    running: AtomicBool,
    shutdown: AtomicBool,
}

impl<Vm> ExecutionGate<Vm> {
    pub(crate) fn new(vm: Vm, hardfork: Hardfork) -> Self {
        Self {
            state: Mutex::new(GateState { vm, hardfork }),
            running: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Best-effort, racy probe: whether a caller currently holds the gate. Used only to let
    /// non-blocking callers return early without awaiting the lock.
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub(crate) async fn acquire(&self) -> GateGuard<'_, Vm> {
        let guard = self.state.lock().await;
        self.running.store(true, Ordering::Release);
        GateGuard { guard: Some(guard), running: &self.running }
    }
}

/// RAII handle on the locked [`GateState`]; clears the `running` flag on drop regardless of how
/// the guard's scope is exited.
pub(crate) struct GateGuard<'a, Vm> {
    guard: Option<MutexGuard<'a, GateState<Vm>>>,
    running: &'a AtomicBool,
}

impl<Vm> Deref for GateGuard<'_, Vm> {
    type Target = GateState<Vm>;
    fn deref(&self) -> &Self::Target {
        self.guard.as_ref().expect("guard present until drop")
    }
}

impl<Vm> DerefMut for GateGuard<'_, Vm> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard.as_mut().expect("guard present until drop")
    }
}

impl<Vm> Drop for GateGuard<'_, Vm> {
    fn drop(&mut self) {
        self.guard = None;
        self.running.store(false, Ordering::Release);
    }
}

//! Process-scoped state: the exit-hook registry and the fail-fast boundary.
//!
//! There is no global registry. A `Runtime` value owns the hooks for the
//! lifetime of the program and runs them when the program exits through
//! it, or when it is dropped.

use crate::error::{Result, RuntimeError};
use slotmap::{DefaultKey, SlotMap};

/// Stable handle to a registered exit hook.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExitHookKey(DefaultKey);

type Hook = Box<dyn FnOnce()>;

/// Hooks run once each, in registration order.
#[derive(Default)]
pub struct ExitRegistry {
    hooks: SlotMap<DefaultKey, Hook>,
    order: Vec<DefaultKey>,
}

impl ExitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, hook: F) -> ExitHookKey
    where
        F: FnOnce() + 'static,
    {
        let key = self.hooks.insert(Box::new(hook));
        self.order.push(key);
        ExitHookKey(key)
    }

    /// Drop a hook without running it. Returns false for unknown or
    /// already-run keys.
    pub fn cancel(&mut self, key: ExitHookKey) -> bool {
        if self.hooks.remove(key.0).is_none() {
            return false;
        }
        self.order.retain(|k| *k != key.0);
        true
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run and forget every pending hook.
    pub fn run(&mut self) {
        let order = std::mem::take(&mut self.order);
        let mut ran = 0usize;
        for key in order {
            if let Some(hook) = self.hooks.remove(key) {
                hook();
                ran += 1;
            }
        }
        tracing::debug!(hooks = ran, "exit hooks run");
    }
}

impl Drop for ExitRegistry {
    fn drop(&mut self) {
        if !self.hooks.is_empty() {
            self.run();
        }
    }
}

impl core::fmt::Debug for ExitRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExitRegistry")
            .field("pending", &self.hooks.len())
            .finish()
    }
}

#[derive(Debug)]
pub struct Runtime {
    program_name: String,
    exit_hooks: ExitRegistry,
}

impl Runtime {
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            exit_hooks: ExitRegistry::new(),
        }
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn at_exit<F>(&mut self, hook: F) -> ExitHookKey
    where
        F: FnOnce() + 'static,
    {
        self.exit_hooks.register(hook)
    }

    pub fn exit_hooks(&mut self) -> &mut ExitRegistry {
        &mut self.exit_hooks
    }

    /// Diagnostic line printed by `fail`.
    pub fn failure_message(&self, err: &RuntimeError) -> String {
        format!("{}: {}", self.program_name, err)
    }

    /// Run the exit hooks and terminate with `status`.
    pub fn exit(&mut self, status: i32) -> ! {
        self.exit_hooks.run();
        std::process::exit(status)
    }

    /// Report a contract violation and terminate with status 1.
    pub fn fail(&mut self, err: &RuntimeError) -> ! {
        tracing::error!(program = %self.program_name, error = %err, "runtime failure");
        eprintln!("{}", self.failure_message(err));
        self.exit(1)
    }

    pub fn unwrap_or_fail<T>(&mut self, result: Result<T>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => self.fail(&e),
        }
    }
}

//! Destination of the `print` builtin.
//!
//! Scripts print to stdout by default; embedders and tests swap in a buffer
//! through `InterpreterBuilder::print_handler`.
//!
//! Enum dispatch instead of a trait object: the set of handlers is fixed.

use parking_lot::Mutex;

/// Collects output in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Where printed lines go.
pub enum PrintHandlerImpl {
    Stdout,
    Buffer(BufferPrintHandler),
    /// Discard everything.
    Silent,
}

impl PrintHandlerImpl {
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    /// Captured output; empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(h) => h.output(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Print handler shared between an interpreter and its embedder.
#[allow(clippy::disallowed_types, reason = "Arc is the implementation of SharedPrintHandler")]
pub type SharedPrintHandler = std::sync::Arc<PrintHandlerImpl>;

#[allow(clippy::disallowed_types, reason = "Arc is the implementation of SharedPrintHandler")]
pub fn stdout_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Stdout)
}

#[allow(clippy::disallowed_types, reason = "Arc is the implementation of SharedPrintHandler")]
pub fn buffer_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

#[allow(clippy::disallowed_types, reason = "Arc is the implementation of SharedPrintHandler")]
pub fn silent_handler() -> SharedPrintHandler {
    std::sync::Arc::new(PrintHandlerImpl::Silent)
}

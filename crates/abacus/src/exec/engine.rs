//! Safe execution of one resolved operation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::ops::{catalog, FailureKind, OpRequest, OperationResult};
use crate::resolve::NameResolver;
use crate::workbook::Workbook;

/// Executes operations, converting every failure mode into an
/// `OperationResult` — nothing propagates past this boundary.
///
/// The engine never retries; retry policy belongs to the agent loop.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    op_timeout: Option<Duration>,
}

impl Engine {
    /// Create an engine with no per-operation deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with an optional per-operation deadline.
    pub fn with_timeout(op_timeout: Option<Duration>) -> Self {
        Self { op_timeout }
    }

    /// Locate the operation named by a tool call and validate its
    /// argument shape.
    pub fn prepare(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<OpRequest, OperationResult> {
        catalog::parse(name, arguments)
    }

    /// Invoke a resolved operation against the workbook snapshot.
    ///
    /// A panic inside the operation body is contained and reported as
    /// `Failure(InternalError, …)`; with a deadline configured, the
    /// operation runs on a worker thread and a deadline miss is reported
    /// as `Failure(Timeout, …)`.
    pub fn run(
        &self,
        book: &Arc<Workbook>,
        resolver: &NameResolver,
        request: &OpRequest,
    ) -> OperationResult {
        match self.op_timeout {
            None => guarded(request.name(), || catalog::dispatch(book, resolver, request)),
            Some(limit) => {
                let (tx, rx) = mpsc::channel();
                let book = Arc::clone(book);
                let resolver = resolver.clone();
                let request = request.clone();
                let name = request.name();
                std::thread::spawn(move || {
                    let result = guarded(request.name(), || {
                        catalog::dispatch(&book, &resolver, &request)
                    });
                    // The receiver may already have given up on us.
                    let _ = tx.send(result);
                });
                match rx.recv_timeout(limit) {
                    Ok(result) => result,
                    Err(_) => OperationResult::failure(
                        FailureKind::Timeout,
                        format!("operation '{name}' exceeded its {}ms deadline", limit.as_millis()),
                    ),
                }
            }
        }
    }
}

/// Run an operation body, converting a panic into an internal-error
/// failure instead of unwinding into the caller.
fn guarded(name: &str, body: impl FnOnce() -> OperationResult) -> OperationResult {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload);
            warn!(operation = name, %message, "operation panicked; contained");
            OperationResult::failure(
                FailureKind::InternalError,
                format!("operation '{name}' failed internally: {message}"),
            )
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

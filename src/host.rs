use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::handler::{Args, Handler, HandlerDescriptor};

/// Lifecycle of the single hosted handler instance. Ready and Failed are
/// terminal for the process lifetime; a restart begins again at Unloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Error)]
pub enum HostError {
    /// The configured handler name is not registered. Fatal at startup.
    #[error("handler '{0}' is not registered")]
    LoadResolution(String),

    /// The handler's load() failed. Fatal for this process instance.
    #[error("handler load failed: {0}")]
    LoadExecution(String),

    /// An invocation arrived while the handler was not Ready.
    #[error("host is not ready to serve (state: {0:?})")]
    NotReady(LifecycleState),

    /// generate() failed for one request. The instance stays Ready.
    #[error("handler execution failed: {0}")]
    HandlerFailure(String),

    /// generate() exceeded the per-request deadline.
    #[error("invocation timed out after {0:?}")]
    Timeout(Duration),
}

/// One invocation as seen by the host: an immutable argument mapping plus
/// the opaque caller identity, built fresh for every request.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub args: Args,
    pub caller: Option<String>,
}

/// Gatekeeper between the network layer and the handler.
///
/// Owns exactly one handler instance. `load` drives the one-time
/// Unloaded -> Loading -> Ready|Failed transition; `invoke` refuses to
/// dispatch unless the state is Ready. Once Ready, concurrent invocations
/// are dispatched in parallel with no additional locking since handlers are
/// stateless across calls.
pub struct RuntimeHost {
    descriptor: HandlerDescriptor,
    handler: Arc<dyn Handler>,
    state: RwLock<LifecycleState>,
    invoke_timeout: Duration,
}

impl RuntimeHost {
    pub fn new(
        descriptor: HandlerDescriptor,
        handler: Arc<dyn Handler>,
        invoke_timeout: Duration,
    ) -> Self {
        Self {
            descriptor,
            handler,
            state: RwLock::new(LifecycleState::Unloaded),
            invoke_timeout,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    pub fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }

    /// Run the handler's one-time initialization. Must complete before any
    /// invocation is dispatched; invocations arriving meanwhile get
    /// `NotReady`. On failure the host transitions to Failed and must not
    /// serve.
    pub async fn load(&self) -> Result<(), HostError> {
        {
            let mut state = self.state.write();
            if *state != LifecycleState::Unloaded {
                return Err(HostError::LoadExecution(format!(
                    "load called in state {:?}",
                    *state
                )));
            }
            *state = LifecycleState::Loading;
        }

        info!(handler = %self.descriptor, "loading handler");
        let started = Instant::now();

        match self.handler.load().await {
            Ok(()) => {
                *self.state.write() = LifecycleState::Ready;
                info!(
                    handler = %self.descriptor,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "handler ready"
                );
                Ok(())
            }
            Err(e) => {
                *self.state.write() = LifecycleState::Failed;
                error!(handler = %self.descriptor, error = %e, "handler load failed");
                Err(HostError::LoadExecution(e.to_string()))
            }
        }
    }

    /// Dispatch one invocation to the handler.
    ///
    /// A failing invocation is reported to its caller only; the host stays
    /// Ready for everyone else.
    pub async fn invoke(&self, request: &InvocationRequest) -> Result<Value, HostError> {
        let state = self.state();
        if state != LifecycleState::Ready {
            return Err(HostError::NotReady(state));
        }

        match tokio::time::timeout(self.invoke_timeout, self.handler.generate(&request.args)).await
        {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(e)) => {
                warn!(
                    handler = %self.descriptor,
                    caller = request.caller.as_deref().unwrap_or("-"),
                    error = %e,
                    "handler execution failed"
                );
                Err(HostError::HandlerFailure(e.to_string()))
            }
            Err(_) => {
                warn!(
                    handler = %self.descriptor,
                    caller = request.caller.as_deref().unwrap_or("-"),
                    timeout_ms = self.invoke_timeout.as_millis() as u64,
                    "invocation timed out"
                );
                Err(HostError::Timeout(self.invoke_timeout))
            }
        }
    }
}

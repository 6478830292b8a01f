//! Tokio runtime and mock server bootstrap shared by BDD scenarios.

use std::future::Future;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Cloneable handle on the scenario's runtime, storable in a [`Slot`].
#[derive(Clone)]
pub struct SharedRuntime(Rc<Runtime>);

impl SharedRuntime {
    /// Drives `future` to completion on the scenario runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Starts the runtime and every server in `servers` on first use.
///
/// Later calls return the existing runtime and leave started servers, with
/// their mounted mocks, untouched.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn ensure_runtime_and_servers(
    runtime: &Slot<SharedRuntime>,
    servers: &[&Slot<MockServer>],
) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime(Rc::new(Runtime::new()?)));
    }
    let shared = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime slot lost its value"))?;

    for server in servers.iter().filter(|slot| slot.with_ref(|_| ()).is_none()) {
        server.set(shared.block_on(MockServer::start()));
    }

    Ok(shared)
}

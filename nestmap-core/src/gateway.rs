use std::rc::Rc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::engine::{MapEngine, MapSurface, SurfaceOptions};

/// Errors surfaced by gateway initialisation and surface creation.
///
/// These are the only errors allowed to change the top-level rendering
/// state of a surface; the host shows a "map unavailable" fallback with a
/// retry affordance instead of propagating them into the render tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No provider credential is configured.
    #[error("no map provider credential is configured")]
    MissingCredential,
    /// The provider rejected the configured credential.
    #[error("the map provider rejected the credential: {reason}")]
    Auth {
        /// Provider-supplied rejection detail.
        reason: String,
    },
    /// The provider reported an exhausted quota or billing limit.
    #[error("the map provider quota is exhausted: {reason}")]
    QuotaExceeded {
        /// Provider-supplied limit detail.
        reason: String,
    },
    /// The provider could not be reached.
    #[error("failed to reach the map provider: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },
    /// A surface was requested before initialisation completed.
    #[error("the map engine is not initialised")]
    NotInitialised,
}

/// Loads the third-party map engine.
///
/// Implementations perform the credential handshake and hand back the
/// process-wide engine handle. The gateway guarantees at most one load runs
/// at a time.
#[async_trait(?Send)]
pub trait EngineLoader {
    /// Load the engine, classifying failures per [`GatewayError`].
    async fn load(&self) -> Result<Rc<dyn MapEngine>, GatewayError>;
}

/// Once-only initializer and owner of the loaded map engine handle.
///
/// `initialise` loads the engine exactly once; concurrent callers await the
/// same in-flight load rather than triggering parallel loads. A failed load
/// leaves the gateway empty so a later call can retry. There is no global
/// state: the host creates one gateway per process and shares it.
pub struct MapGateway {
    loader: Box<dyn EngineLoader>,
    engine: OnceCell<Rc<dyn MapEngine>>,
}

impl std::fmt::Debug for MapGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapGateway")
            .field("initialised", &self.is_initialised())
            .finish()
    }
}

impl MapGateway {
    /// Create a gateway around the given loader. Nothing loads until
    /// [`initialise`](Self::initialise) is first called.
    #[must_use]
    pub fn new(loader: Box<dyn EngineLoader>) -> Self {
        Self {
            loader,
            engine: OnceCell::new(),
        }
    }

    /// Load the engine if it has not loaded yet and return the shared
    /// handle.
    ///
    /// Concurrent callers share one in-flight load. On failure the cell
    /// stays empty, so the next call retries the load.
    pub async fn initialise(&self) -> Result<Rc<dyn MapEngine>, GatewayError> {
        self.engine
            .get_or_try_init(|| self.loader.load())
            .await
            .cloned()
    }

    /// Shared engine handle, or [`GatewayError::NotInitialised`] when no
    /// load has completed.
    pub fn engine(&self) -> Result<Rc<dyn MapEngine>, GatewayError> {
        self.engine
            .get()
            .cloned()
            .ok_or(GatewayError::NotInitialised)
    }

    /// Whether a load has completed successfully.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Create a surface on the loaded engine.
    ///
    /// Fails with [`GatewayError::NotInitialised`] when called before a
    /// successful [`initialise`](Self::initialise).
    pub fn create_surface(
        &self,
        container: &str,
        options: &SurfaceOptions,
    ) -> Result<Rc<dyn MapSurface>, GatewayError> {
        let engine = self.engine()?;
        Ok(engine.create_surface(container, options))
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capability the owner supplies at session creation.
///
/// The session holds it non-owning and queries it when a connect attempt
/// fails, to choose between the fallback strategy and the
/// pairing-required recovery path.
pub trait SessionOwner: Send + Sync {
    /// Whether the owner is currently mid-pairing with the remote device.
    fn is_pairing(&self) -> bool;
}

/// Shared-flag owner for callers with no richer state of their own.
#[derive(Debug, Default)]
pub struct PairingFlag(AtomicBool);

impl PairingFlag {
    pub fn new(pairing: bool) -> Arc<Self> {
        Arc::new(Self(AtomicBool::new(pairing)))
    }

    pub fn set(&self, pairing: bool) {
        self.0.store(pairing, Ordering::Relaxed);
    }
}

impl SessionOwner for PairingFlag {
    fn is_pairing(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

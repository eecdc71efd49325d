//! Process-wide default host.
//!
//! [`StorageAdapter::new`](super::StorageAdapter::new) binds to the host
//! registered here. The first registration wins; later ones are refused.
//! When nothing was registered the platform default is installed on first
//! use: the browser window with the `web` feature on wasm32, otherwise a
//! pair of in-memory stores.

use std::sync::Arc;

use super::host::{SharedHost, StorageHost};

#[cfg(not(target_arch = "wasm32"))]
static HOST: std::sync::OnceLock<SharedHost> = std::sync::OnceLock::new();

#[cfg(target_arch = "wasm32")]
thread_local! {
    static HOST: std::cell::OnceCell<SharedHost> = const { std::cell::OnceCell::new() };
}

/// Register `host` as the process-wide default
///
/// Returns `false`, leaving the current host in place, when a host is
/// already registered or the default has already been installed.
pub fn register_host<H: StorageHost + 'static>(host: H) -> bool {
    let host: SharedHost = Arc::new(host);
    let registered = set_host(host);
    if !registered {
        tracing::debug!(target: "wsk::storage", "Default storage host already registered");
    }
    registered
}

/// Whether a default host is in place
pub fn is_registered() -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        HOST.get().is_some()
    }
    #[cfg(target_arch = "wasm32")]
    {
        HOST.with(|cell| cell.get().is_some())
    }
}

/// The process-wide default host, installing the platform default if needed
pub fn default_host() -> SharedHost {
    #[cfg(not(target_arch = "wasm32"))]
    {
        HOST.get_or_init(platform_default).clone()
    }
    #[cfg(target_arch = "wasm32")]
    {
        HOST.with(|cell| cell.get_or_init(platform_default).clone())
    }
}

fn set_host(host: SharedHost) -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        HOST.set(host).is_ok()
    }
    #[cfg(target_arch = "wasm32")]
    {
        HOST.with(|cell| cell.set(host).is_ok())
    }
}

fn platform_default() -> SharedHost {
    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    {
        Arc::new(super::host::WindowHost)
    }
    #[cfg(not(all(feature = "web", target_arch = "wasm32")))]
    {
        Arc::new(super::host::NativeHost::in_memory())
    }
}

// SPDX-License-Identifier: MIT

//! Corrupted-mutex sentinel defense (spec §4.7.1 point 3, §5, scenario
//! S6). Native drivers in the source hand back raw connection-handle
//! pointers that can be stale after a use-after-free; before acquiring
//! any lock stored inside such a handle, its backing address must be
//! above one platform page. Rust drivers never produce a stale handle
//! this way, but the check is kept as the faithful re-expression of the
//! source's defense and is exercised directly by scenario S6.

/// One platform page; the minimum plausible address for a live
/// allocation's lock.
pub const MIN_PLAUSIBLE_ADDRESS: usize = 4096;

pub fn is_plausible_address(addr: usize) -> bool {
    addr >= MIN_PLAUSIBLE_ADDRESS
}

/// Run before a freshly connected handle is adopted as the persistent
/// connection (spec §4.7.1 point 3, scenario S6). Returns `false` without
/// acquiring the handle's lock if the sentinel check fails.
pub fn handle_connection_success<C>(handle: &ConnectionHandle<C>) -> bool {
    is_plausible_address(handle.lock_address())
}

/// Wraps a driver-specific connection value together with the address of
/// its own internal lock, used solely for the sentinel check above.
pub struct ConnectionHandle<C> {
    pub conn: C,
    lock_address: usize,
    _anchor: Box<u8>,
}

impl<C> ConnectionHandle<C> {
    pub fn new(conn: C) -> Self {
        let anchor = Box::new(0u8);
        let lock_address = anchor.as_ref() as *const u8 as usize;
        Self {
            conn,
            lock_address,
            _anchor: anchor,
        }
    }

    pub fn lock_address(&self) -> usize {
        self.lock_address
    }
}

#[cfg(test)]
impl<C> ConnectionHandle<C> {
    /// Build a handle whose sentinel address is forged, for exercising
    /// the corrupted-handle rejection path (scenario S6).
    pub fn with_forged_address(conn: C, forged_address: usize) -> Self {
        let mut handle = Self::new(conn);
        handle.lock_address = forged_address;
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_allocations_are_plausible() {
        let handle = ConnectionHandle::new(42);
        assert!(is_plausible_address(handle.lock_address()));
    }

    #[test]
    fn s6_forged_low_address_is_implausible() {
        let handle = ConnectionHandle::with_forged_address(42, 0x100);
        assert!(!is_plausible_address(handle.lock_address()));
    }

    #[test]
    fn s6_handle_connection_success_rejects_corrupted_handle() {
        let handle = ConnectionHandle::with_forged_address(42, 0x100);
        assert!(!handle_connection_success(&handle));
    }

    #[test]
    fn handle_connection_success_accepts_real_handle() {
        let handle = ConnectionHandle::new(42);
        assert!(handle_connection_success(&handle));
    }
}

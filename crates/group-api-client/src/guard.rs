//! Rejects overlapping identical mutating requests.

use crate::{ApiError, ApiResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Tracks in-flight requests by `METHOD path`.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<String>>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `method path`, failing if it is already claimed. The claim is
    /// released when the returned ticket drops.
    pub fn acquire(&self, method: &str, path: &str) -> ApiResult<InFlightTicket> {
        let key = format!("{} {}", method, path);
        let mut active = self.active.lock();
        if !active.insert(key.clone()) {
            return Err(ApiError::DuplicateRequest {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        Ok(InFlightTicket {
            key,
            active: Arc::clone(&self.active),
        })
    }

    pub fn in_flight(&self) -> usize {
        self.active.lock().len()
    }
}

/// RAII claim on an in-flight request.
#[derive(Debug)]
pub struct InFlightTicket {
    key: String,
    active: Arc<Mutex<HashSet<String>>>,
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.active.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_identical_claim_is_rejected() {
        let guard = InFlightGuard::new();
        let _first = guard.acquire("POST", "/api/groups/g1/join").unwrap();

        let err = guard.acquire("POST", "/api/groups/g1/join").unwrap_err();
        assert!(matches!(err, ApiError::DuplicateRequest { .. }));
    }

    #[test]
    fn different_keys_do_not_conflict() {
        let guard = InFlightGuard::new();
        let _join = guard.acquire("POST", "/api/groups/g1/join").unwrap();
        let _leave = guard.acquire("POST", "/api/groups/g1/leave").unwrap();
        let _other = guard.acquire("POST", "/api/groups/g2/join").unwrap();
        assert_eq!(guard.in_flight(), 3);
    }

    #[test]
    fn claim_released_on_drop() {
        let guard = InFlightGuard::new();
        {
            let _ticket = guard.acquire("DELETE", "/api/groups/g1").unwrap();
            assert_eq!(guard.in_flight(), 1);
        }
        assert_eq!(guard.in_flight(), 0);
        assert!(guard.acquire("DELETE", "/api/groups/g1").is_ok());
    }
}

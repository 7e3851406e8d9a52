use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag. Cloning shares the flag; tasks poll it at
/// their suspension points rather than being interrupted mid-operation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
  cancelled: Arc<AtomicBool>,
}

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }
}

#[test]
fn cancel_is_visible_through_clones() {
  let token = CancelToken::new();
  let observer = token.clone();
  assert!(!observer.is_cancelled());
  token.cancel();
  assert!(observer.is_cancelled());
}

//! Fetch-on-activation state shared by every screen.
//!
//! A screen calls `begin` when it is activated, awaits the request, then
//! hands the result to `apply` together with the ticket it was given.
//! Only the most recently issued ticket may write state; anything older
//! is dropped, so a slow response can never overwrite a newer one.

use tracing::{
  debug,
  error,
  warn
};

use crate::error::{
  ApiError,
  ApiResult
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestGate {
  latest: u64
}

impl RequestGate {
  pub fn issue(&mut self) -> Ticket {
    self.latest += 1;
    Ticket(self.latest)
  }

  pub fn is_current(
    &self,
    ticket: Ticket
  ) -> bool {
    ticket.0 == self.latest
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum LoadOutcome {
  Applied(usize),
  Failed,
  Discarded
}

/// Logs a failed read the way every loader does: shape problems are
/// warnings, everything else is an error.
pub fn log_load_failure(
  resource: &str,
  err: &ApiError
) {
  match err {
    | ApiError::UnexpectedShape {
      ..
    } => {
      warn!(resource, error = %err, "unexpected response shape; treating as empty");
    }
    | _ => {
      error!(resource, error = %err, "failed to fetch");
    }
  }
}

#[derive(Debug)]
pub struct Collection<T> {
  resource: &'static str,
  items:    Vec<T>,
  loading:  bool,
  gate:     RequestGate
}

impl<T> Collection<T> {
  pub fn new(
    resource: &'static str
  ) -> Self {
    Self {
      resource,
      items: Vec::new(),
      loading: false,
      gate: RequestGate::default()
    }
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn begin(&mut self) -> Ticket {
    self.loading = true;
    let ticket = self.gate.issue();
    debug!(resource = self.resource, ?ticket, "load started");
    ticket
  }

  pub fn apply(
    &mut self,
    ticket: Ticket,
    result: ApiResult<Vec<T>>
  ) -> LoadOutcome {
    if !self.gate.is_current(ticket) {
      debug!(resource = self.resource, ?ticket, "discarding superseded response");
      return LoadOutcome::Discarded;
    }

    self.loading = false;
    match result {
      | Ok(items) => {
        let count = items.len();
        self.items = items;
        debug!(
          resource = self.resource,
          count, "load applied"
        );
        LoadOutcome::Applied(count)
      }
      | Err(err) => {
        log_load_failure(
          self.resource,
          &err
        );
        self.items.clear();
        LoadOutcome::Failed
      }
    }
  }
}

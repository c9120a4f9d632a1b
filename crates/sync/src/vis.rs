use foundation::Lifecycle;
use mapservice::ServiceError;
use serde::Serialize;

/// Aggregate state of the whole visualization for one map session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisState {
    lifecycle: Lifecycle,
    error: Option<ServiceError>,
}

impl VisState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ok(&self) -> bool {
        self.lifecycle.is_ok()
    }

    pub fn is_error(&self) -> bool {
        self.lifecycle.is_error()
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    pub fn error(&self) -> Option<&ServiceError> {
        self.error.as_ref()
    }

    pub fn set_ok(&mut self) {
        self.error = None;
        self.lifecycle = Lifecycle::Ok;
    }

    pub fn set_error(&mut self, error: ServiceError) {
        self.error = Some(error);
        self.lifecycle = Lifecycle::Error;
    }
}

use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// [`Logger`] adapter over `tracing`, tagging every event with its component.
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "checkout", component = self.component, "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "checkout", component = self.component, "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "checkout", component = self.component, "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "checkout", component = self.component, "{}", message);
    }
}

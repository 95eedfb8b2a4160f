use std::sync::{Arc, Mutex};

use anyhow::anyhow;

/// Shared record of which tasks ran, in order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action that appends `name` to this log and succeeds.
    pub fn recorder(
        &self,
        name: &str,
    ) -> impl Fn() -> anyhow::Result<()> + Send + Sync + 'static {
        let entries = Arc::clone(&self.entries);
        let name = name.to_string();
        move || {
            entries.lock().unwrap().push(name.clone());
            Ok(())
        }
    }

    /// Action that appends `name` to this log and then fails.
    pub fn failing(
        &self,
        name: &str,
    ) -> impl Fn() -> anyhow::Result<()> + Send + Sync + 'static {
        let entries = Arc::clone(&self.entries);
        let name = name.to_string();
        move || {
            entries.lock().unwrap().push(name.clone());
            Err(anyhow!("task {name} exploded"))
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

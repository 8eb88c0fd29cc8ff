//! Terminal chain operations.

use serde_json::Value;
use std::sync::Arc;

use crate::error::{ClientResult, UrlError};
use crate::http::Transport;
use crate::routing::table::RouteRecord;
use crate::routing::url::build_url;

/// A leaf bound to one (verb, template) pair and the arguments collected on
/// the way to it.
#[derive(Clone)]
pub struct Leaf {
    transport: Arc<dyn Transport>,
    record: Arc<RouteRecord>,
    args: Vec<Value>,
}

impl Leaf {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        record: Arc<RouteRecord>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            transport,
            record,
            args,
        }
    }

    /// Lower-cased verb, e.g. `get`.
    pub fn name(&self) -> &str {
        &self.record.method
    }

    pub fn record(&self) -> &RouteRecord {
        &self.record
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Request path this leaf would call, without sending anything.
    pub fn path(&self) -> Result<String, UrlError> {
        build_url(&self.record.source, &self.args)
    }

    /// Perform the call. Path errors are raised before any I/O.
    pub async fn invoke(&self, payload: Option<Value>) -> ClientResult<Value> {
        let path = self.path()?;

        tracing::debug!(
            verb = %self.record.verb,
            template = %self.record.source,
            path = %path,
            "Invoking leaf"
        );

        let result = self
            .transport
            .request(&self.record.verb, &path, payload.as_ref())
            .await?;
        Ok(result)
    }
}

impl std::fmt::Debug for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaf")
            .field("verb", &self.record.verb)
            .field("template", &self.record.source.source())
            .field("args", &self.args)
            .finish()
    }
}

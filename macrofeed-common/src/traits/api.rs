//! macrofeed-common/src/traits/api.rs
//!
//! The backend as seen by the dashboard. The REST client in `macrofeed-core`
//! is the production implementation; tests substitute mocks or scripted fakes.

use async_trait::async_trait;

use crate::Error;
use crate::models::{MacroId, UpdateRecord};

#[async_trait]
pub trait FeedApi: Send + Sync {
    /// GET /macros
    async fn list_macros(&self) -> Result<Vec<MacroId>, Error>;

    /// GET /updates/{macro}, newest first.
    async fn list_updates(&self, macro_id: &MacroId) -> Result<Vec<UpdateRecord>, Error>;

    /// POST /clear/{macro}
    async fn clear_updates(&self, macro_id: &MacroId) -> Result<(), Error>;

    /// GET /updates/{macro}/{id}
    async fn get_update(&self, macro_id: &MacroId, update_id: i64) -> Result<UpdateRecord, Error>;

    /// POST /clear-all
    async fn clear_all(&self) -> Result<(), Error>;

    /// GET /health at the server root. `Ok(true)` when the server reports "ok".
    async fn health(&self) -> Result<bool, Error>;
}

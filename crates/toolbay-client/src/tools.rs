//! Tool catalog: the browse list, single-tool lookup and listing upload.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use toolbay_gateway::Gateway;
use toolbay_shared::types::{Tool, ToolUpload};

use crate::error::Result;

/// Holds the tools shown in a browse or "my tools" table.
#[derive(Clone)]
pub struct ToolCatalogModel {
    gateway: Arc<dyn Gateway>,
    tools: Arc<RwLock<Vec<Tool>>>,
}

impl ToolCatalogModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            tools: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Tools listed by one user, replacing the held list. A failed fetch
    /// logs and leaves the list empty.
    pub async fn load_for_user(&self, user_id: i64) -> Vec<Tool> {
        let fetched = match self.gateway.fetch_tools_for_user(user_id).await {
            Ok(list) => list,
            Err(error) => {
                warn!(user_id, %error, "Failed to load tools");
                Vec::new()
            }
        };
        let mut held = self.tools.write().await;
        *held = fetched.clone();
        fetched
    }

    /// One tool for the detail page. Read path: a failure logs and the
    /// page renders "not found".
    pub async fn fetch(&self, tool_id: i64) -> Option<Tool> {
        match self.gateway.fetch_tool(tool_id).await {
            Ok(tool) => Some(tool),
            Err(error) => {
                warn!(tool_id, %error, "Failed to load tool");
                None
            }
        }
    }

    /// List a new tool. Write path: failures propagate, nothing is held
    /// locally until a reload.
    pub async fn upload(&self, payload: &ToolUpload) -> Result<Tool> {
        let tool = self.gateway.upload_tool(payload).await?;
        info!(tool_id = tool.id, "Tool listed");
        Ok(tool)
    }

    /// Snapshot of the held list.
    pub async fn tools(&self) -> Vec<Tool> {
        self.tools.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{self, MockGateway};

    #[tokio::test]
    async fn test_load_for_user_replaces_list() {
        let gateway = MockGateway::new();
        gateway.set_tools_for_user(
            1,
            vec![support::tool(3, "Drill", None), support::tool(4, "Ladder", None)],
        );

        let model = ToolCatalogModel::new(gateway);
        assert_eq!(model.load_for_user(1).await.len(), 2);
        assert_eq!(model.tools().await.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_returns_tool() {
        let gateway = MockGateway::new();
        gateway.set_tool(support::tool(3, "Drill", None));

        let model = ToolCatalogModel::new(gateway);
        let tool = model.fetch(3).await.unwrap();
        assert_eq!(tool.name, "Drill");
    }

    #[tokio::test]
    async fn test_fetch_swallows_failure() {
        let gateway = MockGateway::new();
        gateway.fail_on("fetch_tool");

        let model = ToolCatalogModel::new(gateway);
        assert!(model.fetch(3).await.is_none());
    }

    fn payload() -> ToolUpload {
        ToolUpload {
            name: "Drill".to_string(),
            description: None,
            rental_price: Some(1000.0),
            deposit_price: None,
            lookup_status: None,
            lookup_category: "POWER".to_string(),
            images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_upload_returns_created_tool() {
        let gateway = MockGateway::new();
        let model = ToolCatalogModel::new(gateway);
        let tool = model.upload(&payload()).await.unwrap();
        assert_eq!(tool.name, "Drill");
    }

    #[tokio::test]
    async fn test_upload_propagates_failure() {
        let gateway = MockGateway::new();
        gateway.fail_on("upload_tool");

        let model = ToolCatalogModel::new(gateway);
        assert!(model.upload(&payload()).await.is_err());
    }
}

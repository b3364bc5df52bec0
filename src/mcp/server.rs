//! MCP Server handler for GitLab external status checks.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    mcp::{CreateParams, DeleteParams, ListParams, SetStatusParams, UpdateParams},
    CreateExternalStatusCheckOptions, GitLabClient, GitLabError, List, ListOptions,
    MergeRequestRef, MergeStatusCheck, ProjectId, ProjectStatusCheck,
    SetExternalStatusCheckStatusOptions, UpdateExternalStatusCheckOptions,
};

/// GitLab external status checks MCP Server.
///
/// Implements the MCP ServerHandler trait, providing tools to manage
/// external status checks through the Model Context Protocol.
///
/// # Tools
///
/// - `list_status_checks` - List a project's checks, or their status on a merge request
/// - `set_status_check_status` - Record a check's status for a merge request commit
/// - `create_status_check` - Define a new check on a project
/// - `update_status_check` - Change a check's name, URL or branch scoping
/// - `delete_status_check` - Remove a check
#[derive(Clone)]
pub struct StatusCheckServer {
    client: Arc<GitLabClient>,
}

impl StatusCheckServer {
    /// Create a new StatusCheckServer from environment variables.
    ///
    /// Uses `GITLAB_TOKEN` for authentication and optionally `GITLAB_API_URL`
    /// for the API root.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITLAB_TOKEN` is not set.
    pub fn from_env() -> crate::Result<Self> {
        let client = GitLabClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Create a new StatusCheckServer with an existing client.
    pub fn new(client: GitLabClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Convert GitLabError to McpError.
    fn to_mcp_error(err: GitLabError) -> McpError {
        if err.is_not_found() {
            return McpError::resource_not_found(err.to_string(), None);
        }
        match &err {
            GitLabError::ConfigMissing(msg) => McpError::invalid_params(msg.clone(), None),
            GitLabError::InvalidArgument(_) | GitLabError::MissingField { .. } => {
                McpError::invalid_params(err.to_string(), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    /// Resolve the `project` argument; only integers and strings are accepted.
    fn resolve_project(value: &serde_json::Value) -> Result<ProjectId, McpError> {
        ProjectId::try_from(value).map_err(Self::to_mcp_error)
    }

    fn to_text<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Handle the `list_status_checks` tool.
    ///
    /// Returns a page of project checks, or of merge request check statuses
    /// when `merge_request_iid` is given, as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an MCP error if `project` is neither an integer nor a string,
    /// or if the underlying API call fails.
    pub async fn handle_list(&self, params: ListParams) -> Result<CallToolResult, McpError> {
        let project = Self::resolve_project(&params.project)?;
        let options = ListOptions {
            page: Some(params.page.unwrap_or(1)),
            per_page: Some(params.per_page.unwrap_or(20).min(100)),
        };

        match params.merge_request_iid {
            Some(iid) => {
                let query = MergeRequestRef::new(project, iid);
                let page = MergeStatusCheck::list_page(&self.client, &query, &options)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::to_text(&page)
            }
            None => {
                let page = ProjectStatusCheck::list_page(&self.client, &project, &options)
                    .await
                    .map_err(Self::to_mcp_error)?;
                Self::to_text(&page)
            }
        }
    }

    /// Handle the `set_status_check_status` tool.
    pub async fn handle_set_status(
        &self,
        params: SetStatusParams,
    ) -> Result<CallToolResult, McpError> {
        let project = Self::resolve_project(&params.project)?;
        let options = SetExternalStatusCheckStatusOptions {
            sha: Some(params.sha),
            external_status_check_id: Some(params.external_status_check_id),
            status: params.status,
        };
        let meta = self
            .client
            .external_status_checks()
            .set_external_status_check_status(project, params.merge_request_iid, &options)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::to_text(&meta)
    }

    /// Handle the `create_status_check` tool.
    pub async fn handle_create(&self, params: CreateParams) -> Result<CallToolResult, McpError> {
        let project = Self::resolve_project(&params.project)?;
        let options = CreateExternalStatusCheckOptions {
            name: Some(params.name),
            external_url: Some(params.external_url),
            protected_branch_ids: params.protected_branch_ids,
        };
        let meta = self
            .client
            .external_status_checks()
            .create_external_status_check(project, &options)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::to_text(&meta)
    }

    /// Handle the `update_status_check` tool.
    pub async fn handle_update(&self, params: UpdateParams) -> Result<CallToolResult, McpError> {
        let project = Self::resolve_project(&params.project)?;
        let options = UpdateExternalStatusCheckOptions {
            name: params.name,
            external_url: params.external_url,
            protected_branch_ids: params.protected_branch_ids,
        };
        if options.is_empty() {
            return Err(McpError::invalid_params(
                "Nothing to update. Set name, external_url or protected_branch_ids.",
                None,
            ));
        }
        let meta = self
            .client
            .external_status_checks()
            .update_external_status_check(project, params.check_id, &options)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::to_text(&meta)
    }

    /// Handle the `delete_status_check` tool.
    pub async fn handle_delete(&self, params: DeleteParams) -> Result<CallToolResult, McpError> {
        let project = Self::resolve_project(&params.project)?;
        let meta = self
            .client
            .external_status_checks()
            .delete_external_status_check(project, params.check_id)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::to_text(&meta)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, McpError> {
    serde_json::from_value(args).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

impl ServerHandler for StatusCheckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "glstatus".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "GitLab external status checks MCP Server - List, create, update and delete \
                 status checks, and report their status on merge requests."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "list_status_checks",
                "List external status checks. \
                 Without merge_request_iid: the checks defined on the project. \
                 With merge_request_iid: each check's status on that merge request.",
                Self::schema::<ListParams>(),
            ),
            Tool::new(
                "set_status_check_status",
                "Record the status (passed or failed) of an external status check \
                 for the head commit of a merge request.",
                Self::schema::<SetStatusParams>(),
            ),
            Tool::new(
                "create_status_check",
                "Create an external status check on a project, optionally scoped \
                 to protected branches.",
                Self::schema::<CreateParams>(),
            ),
            Tool::new(
                "update_status_check",
                "Update an external status check. Only the fields given are changed.",
                Self::schema::<UpdateParams>(),
            ),
            Tool::new(
                "delete_status_check",
                "Delete an external status check from a project.",
                Self::schema::<DeleteParams>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::json!({}));

        match request.name.as_ref() {
            "list_status_checks" => self.handle_list(parse_args(args)?).await,
            "set_status_check_status" => self.handle_set_status(parse_args(args)?).await,
            "create_status_check" => self.handle_create(parse_args(args)?).await,
            "update_status_check" => self.handle_update(parse_args(args)?).await,
            "delete_status_check" => self.handle_delete(parse_args(args)?).await,
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        }
    }

    fn server_for(mock_server: &MockServer) -> StatusCheckServer {
        let client = GitLabClient::new("test-token", &mock_server.uri()).unwrap();
        StatusCheckServer::new(client)
    }

    #[test]
    fn schema_generates_for_all_params() {
        assert!(!StatusCheckServer::schema::<ListParams>().is_empty());
        assert!(!StatusCheckServer::schema::<SetStatusParams>().is_empty());
        assert!(!StatusCheckServer::schema::<CreateParams>().is_empty());
        assert!(!StatusCheckServer::schema::<UpdateParams>().is_empty());
        assert!(!StatusCheckServer::schema::<DeleteParams>().is_empty());
    }

    #[test]
    fn server_implements_handler() {
        // This compiles only if StatusCheckServer implements ServerHandler correctly.
        fn assert_server_handler<T: ServerHandler>() {}
        assert_server_handler::<StatusCheckServer>();
    }

    #[tokio::test]
    async fn handle_list_project_checks_returns_page() {
        let mock_server = MockServer::start().await;

        let response = serde_json::json!([
            {
                "id": 1,
                "name": "Compliance",
                "project_id": 6,
                "external_url": "https://example.com/compliance",
                "protected_branches": []
            }
        ]);

        Mock::given(method("GET"))
            .and(path("/projects/my-group%2Fmy-project/external_status_checks"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "20"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-total", "1")
                    .insert_header("x-total-pages", "1")
                    .set_body_json(&response),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = server_for(&mock_server);
        let params = ListParams {
            project: serde_json::json!("my-group/my-project"),
            merge_request_iid: None,
            page: None,
            per_page: None,
        };

        let result = server.handle_list(params).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));

        let page: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(page["items"].as_array().unwrap().len(), 1);
        assert_eq!(page["items"][0]["name"], "Compliance");
        assert_eq!(page["page"], 1);
        assert_eq!(page["per_page"], 20);
        assert_eq!(page["has_more"], false);
    }

    #[tokio::test]
    async fn handle_list_merge_request_statuses() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/42/merge_requests/7/status_checks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 2, "name": "Lint", "external_url": "https://example.com/lint", "status": "failed"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = server_for(&mock_server);
        let params = ListParams {
            project: serde_json::json!(42),
            merge_request_iid: Some(7),
            page: None,
            per_page: None,
        };

        let result = server.handle_list(params).await.unwrap();
        let page: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(page["items"][0]["status"], "failed");
    }

    #[tokio::test]
    async fn handle_list_rejects_unsupported_project_type() {
        let mock_server = MockServer::start().await;

        // Nothing may reach the server
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let server = server_for(&mock_server);
        let params = ListParams {
            project: serde_json::json!({"id": 1}),
            merge_request_iid: None,
            page: None,
            per_page: None,
        };

        let err = server.handle_list(params).await.unwrap_err();
        assert!(err.message.contains("integer or a string"));
    }

    #[tokio::test]
    async fn handle_update_sends_only_given_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/projects/6/external_status_checks/1"))
            .and(body_json(serde_json::json!({"external_url": "https://example.com/v2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = server_for(&mock_server);
        let params = UpdateParams {
            project: serde_json::json!(6),
            check_id: 1,
            name: None,
            external_url: Some("https://example.com/v2".to_string()),
            protected_branch_ids: None,
        };

        let result = server.handle_update(params).await.unwrap();
        let meta: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(meta["status"], 200);
    }

    #[tokio::test]
    async fn handle_update_without_fields_is_rejected() {
        let mock_server = MockServer::start().await;
        let server = server_for(&mock_server);

        let params = UpdateParams {
            project: serde_json::json!(6),
            check_id: 1,
            name: None,
            external_url: None,
            protected_branch_ids: None,
        };

        let err = server.handle_update(params).await.unwrap_err();
        assert!(err.message.contains("Nothing to update"));
    }

    #[tokio::test]
    async fn handle_delete_not_found_maps_to_resource_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/projects/6/external_status_checks/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "404 Not found"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = server_for(&mock_server);
        let params = DeleteParams {
            project: serde_json::json!(6),
            check_id: 99,
        };

        let err = server.handle_delete(params).await.unwrap_err();
        let expected = McpError::resource_not_found("", None);
        assert_eq!(err.code.0, expected.code.0);
        assert!(err.message.contains("404 Not found"));
    }
}

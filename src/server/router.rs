use crate::server::{CreativeOrientationServer, PeerProgress};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, InitializeRequestParam,
        InitializeResult, ListToolsResult, PaginatedRequestParam,
        ProtocolVersion, ServerCapabilities, ServerInfo, Tool, ToolsCapability,
    },
    service::{RequestContext, RoleServer},
};
use tracing::info;

/// Every tool this server exposes, in listing order.
pub fn tool_catalog() -> Vec<Tool> {
    vec![
        Tool {
            name: "creative_orientation_check".into(),
            title: Some("Creative Orientation Check".into()),
            description: Some(
                "Detect reactive, problem-solving language and suggest creative reframes".into(),
            ),
            input_schema: crate::schemas::creative_orientation_check_schema(),
            icons: None,
            annotations: None,
            output_schema: Some(crate::schemas::creative_orientation_check_output_schema()),
            meta: None,
        },
        Tool {
            name: "creative_phase".into(),
            title: Some("Creative Phase".into()),
            description: Some(
                "Guide one phase of the creative process: germination, assimilation, or completion"
                    .into(),
            ),
            input_schema: crate::schemas::creative_phase_schema(),
            icons: None,
            annotations: None,
            output_schema: None, // Redirect and artifact shapes differ
            meta: None,
        },
        Tool {
            name: "create_tension_chart".into(),
            title: Some("Create Tension Chart".into()),
            description: Some(
                "Create a structural tension chart from a desired outcome, current reality, and due date"
                    .into(),
            ),
            input_schema: crate::schemas::create_tension_chart_schema(),
            icons: None,
            annotations: None,
            output_schema: None,
            meta: None,
        },
        Tool {
            name: "get_tension_chart".into(),
            title: Some("Get Tension Chart".into()),
            description: Some("Load a saved structural tension chart by id".into()),
            input_schema: crate::schemas::get_tension_chart_schema(),
            icons: None,
            annotations: None,
            output_schema: None,
            meta: None,
        },
        Tool {
            name: "assess_structural_tension".into(),
            title: Some("Assess Structural Tension".into()),
            description: Some(
                "Score the clarity of a vision and a current reality and report their tension"
                    .into(),
            ),
            input_schema: crate::schemas::assess_structural_tension_schema(),
            icons: None,
            annotations: None,
            output_schema: Some(crate::schemas::assess_structural_tension_output_schema()),
            meta: None,
        },
        Tool {
            name: "detailed_help".into(),
            title: Some("Detailed Help".into()),
            description: Some("Get detailed help for a specific tool".into()),
            input_schema: crate::schemas::detailed_help_schema(),
            icons: None,
            annotations: None,
            output_schema: Some(crate::schemas::detailed_help_output_schema()),
            meta: None,
        },
    ]
}

impl ServerHandler for CreativeOrientationServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                logging: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "creative-orientation".to_string(),
                title: Some("Creative Orientation".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Creative-orientation coaching: check language for reactive bias, walk through \
                 creative phases, and keep structural tension charts."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        let mut info = self.get_info();
        info.protocol_version = request.protocol_version.clone();
        Ok(info)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("tools/list requested");
        Ok(ListToolsResult {
            tools: tool_catalog(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let peer = context.peer;
        match request.name.as_ref() {
            "creative_orientation_check" => {
                let progress = PeerProgress::new(peer, "creative_orientation_check");
                self.handle_orientation_check(request, &progress)
                    .await
                    .map_err(|e| e.into())
            }
            "creative_phase" => {
                let progress = PeerProgress::new(peer, "creative_phase");
                self.handle_creative_phase(request, &progress)
                    .await
                    .map_err(|e| e.into())
            }
            "create_tension_chart" => {
                let progress = PeerProgress::new(peer, "create_tension_chart");
                self.handle_create_tension_chart(request, &progress)
                    .await
                    .map_err(|e| e.into())
            }
            "get_tension_chart" => self
                .handle_get_tension_chart(request)
                .await
                .map_err(|e| e.into()),
            "assess_structural_tension" => self
                .handle_assess_structural_tension(request)
                .await
                .map_err(|e| e.into()),

            // Help
            "detailed_help" => self
                .handle_detailed_help(request)
                .await
                .map_err(|e| e.into()),
            _ => Err(McpError {
                code: rmcp::model::ErrorCode::METHOD_NOT_FOUND,
                message: format!("Unknown tool: {}", request.name).into(),
                data: None,
            }),
        }
    }
}

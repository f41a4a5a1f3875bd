//! MCP Server implementation for the knowledge graph
//!
//! Implements the Model Context Protocol (JSON-RPC 2.0, one message per line)
//! directly over stdin/stdout without external SDK dependencies.
//!
//! Each request runs as its own task; responses are written by a single
//! writer task, so frames never interleave on stdout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::handlers::{
    Dispatcher, Operation, CREATE_ENTITIES, CREATE_RELATIONS, READ_GRAPH, SEARCH_NODES,
};
use super::jsonrpc::{
    parse_frame, JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND,
};
use crate::config::Config;
use crate::core::persistence::PersistenceManager;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "memsync";

/// MCP Server handler
pub struct MemoryServer {
    dispatcher: Dispatcher,
    initialized: AtomicBool,
}

impl MemoryServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" => {
                    self.initialized.store(true, Ordering::SeqCst);
                    info!("MCP client initialized");
                }
                "notifications/cancelled" => debug!("MCP request cancelled"),
                other => debug!(method = other, "Ignoring unknown notification"),
            }
            return None;
        }

        let id = request.response_id();
        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "tools/list" => Ok(self.handle_list_tools()),
            "tools/call" => self.handle_call_tool(&request.params).await,
            "ping" => Ok(json!({})),
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err((code, msg)) => JsonRpcResponse::error(id, code, msg),
        })
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn handle_list_tools(&self) -> Value {
        json!({
            "tools": [
                {
                    "name": CREATE_ENTITIES,
                    "description": "Create multiple new entities in the knowledge graph",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "entities": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "name": { "type": "string" },
                                        "entityType": { "type": "string" },
                                        "observations": {
                                            "type": "array",
                                            "items": { "type": "string" }
                                        }
                                    },
                                    "required": ["name", "entityType", "observations"]
                                }
                            }
                        },
                        "required": ["entities"]
                    }
                },
                {
                    "name": CREATE_RELATIONS,
                    "description": "Create multiple new relations between entities",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "relations": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "from": { "type": "string" },
                                        "to": { "type": "string" },
                                        "relationType": { "type": "string" }
                                    },
                                    "required": ["from", "to", "relationType"]
                                }
                            }
                        },
                        "required": ["relations"]
                    }
                },
                {
                    "name": READ_GRAPH,
                    "description": "Read the entire knowledge graph",
                    "inputSchema": {
                        "type": "object",
                        "properties": {},
                        "additionalProperties": false
                    }
                },
                {
                    "name": SEARCH_NODES,
                    "description": "Search for nodes in the knowledge graph",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "query": { "type": "string" }
                        },
                        "required": ["query"]
                    }
                }
            ]
        })
    }

    async fn handle_call_tool(&self, params: &Value) -> Result<Value, (i64, String)> {
        let name = params["name"]
            .as_str()
            .ok_or((INVALID_PARAMS, "Missing tool name".to_string()))?;

        let operation =
            Operation::parse(name, &params["arguments"]).map_err(|e| (INVALID_PARAMS, e.to_string()))?;

        match self.dispatcher.dispatch(operation).await {
            Ok(payload) => {
                let text = serde_json::to_string_pretty(&payload)
                    .unwrap_or_else(|_| payload.to_string());
                Ok(json!({
                    "content": [{
                        "type": "text",
                        "text": text
                    }]
                }))
            }
            Err(e) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": e.to_string()
                }],
                "isError": true
            })),
        }
    }
}

/// Serve newline-delimited JSON-RPC from `reader`, answering on `writer`
///
/// Returns once `reader` hits EOF and every in-flight request has answered.
pub async fn serve<R, W>(server: Arc<MemoryServer>, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<String>(64);

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            writer.write_all(frame.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        anyhow::Ok(())
    });

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        debug!(frame = %line.chars().take(100).collect::<String>(), "MCP received");

        let request = match parse_frame(&line) {
            Ok(request) => request,
            Err(response) => {
                warn!(code = ?response.error_code(), "Rejected JSON-RPC frame");
                tx.send(serde_json::to_string(&response)?).await?;
                continue;
            }
        };

        let server = Arc::clone(&server);
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_request(&request).await {
                match serde_json::to_string(&response) {
                    Ok(json) => {
                        if tx.send(json).await.is_err() {
                            warn!("MCP writer closed before response was sent");
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to encode response"),
                }
            }
        });
    }

    // The writer drains once the last in-flight request drops its sender
    drop(tx);
    writer_task.await??;
    Ok(())
}

/// Run the MCP server with STDIO transport
pub async fn run_mcp_server(config: Config) -> Result<()> {
    let persistence = PersistenceManager::from_config(&config)?;
    let server = Arc::new(MemoryServer::new(Dispatcher::new(persistence)));

    info!(
        local_path = %config.local.path.display(),
        remote = !config.remote.base_url.is_empty(),
        "Memory server started"
    );

    serve(server, tokio::io::stdin(), tokio::io::stdout()).await?;

    info!("Memory server stopping");
    Ok(())
}

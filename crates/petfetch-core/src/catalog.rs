//! Static description of the pet image server's MCP tools.
//!
//! The image server is nominally an MCP server on stdio. petfetch only
//! drives one call per process, but the summary of what the server exposes
//! is useful when wiring it into other MCP clients.

use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

/// One tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolParam {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One tool exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ToolParam],
}

/// The server and its tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerSpec {
    pub name: &'static str,
    pub transport: &'static str,
    pub tools: &'static [ToolSpec],
}

const KIND_PARAM: ToolParam = ToolParam {
    name: "kind",
    ty: "string",
    required: true,
    description: "Kind of pet: cat, dog, fox or bird",
};

/// The pet image server petfetch talks to.
pub const PET_SERVER: ServerSpec = ServerSpec {
    name: "pet-images",
    transport: "stdio",
    tools: &[
        ToolSpec {
            name: "get_pet_image",
            description: "Return the URL of a random image of the given kind of pet",
            params: &[KIND_PARAM],
        },
        ToolSpec {
            name: "list_pet_kinds",
            description: "List the kinds of pet the server has images for",
            params: &[],
        },
    ],
};

impl ServerSpec {
    pub fn tool(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Line-oriented summary for the console.
    pub fn render_summary(&self, command: &Path) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "MCP server: {} ({})", self.name, self.transport);
        let _ = writeln!(out, "  command: {}", command.display());
        let _ = writeln!(out, "  tools: {}", self.tools.len());
        for tool in self.tools {
            let _ = writeln!(out);
            let _ = writeln!(out, "  {}", tool.name);
            let _ = writeln!(out, "    {}", tool.description);
            if tool.params.is_empty() {
                let _ = writeln!(out, "    (no parameters)");
            }
            for param in tool.params {
                let required = if param.required { "required" } else { "optional" };
                let _ = writeln!(
                    out,
                    "    - {}: {} ({required}) {}",
                    param.name, param.ty, param.description
                );
            }
        }
        out
    }
}

//! Built-in catalogue of backend-served tools
//!
//! Each entry is tagged with the backend that serves it. Configuration may add
//! more tools and backends on top of these.

use steward_domain::{ToolDefinition, ToolParameter};

fn param(name: &str, description: &str, required: bool) -> ToolParameter {
    ToolParameter::new(name, description, required)
}

fn typed(name: &str, description: &str, required: bool, param_type: &str) -> ToolParameter {
    ToolParameter::new(name, description, required).with_type(param_type)
}

fn query_tool(name: &str, description: &str, backend: &str) -> ToolDefinition {
    ToolDefinition::new(name, description)
        .with_parameter(param("query", "Search query", true))
        .with_backend(backend)
}

/// Default external tools, grouped by backend in a stable order
pub fn default_external_tools() -> Vec<ToolDefinition> {
    vec![
        // docker
        ToolDefinition::new("list_containers", "List all docker containers. Returns JSON.")
            .with_parameter(typed("all", "Include stopped containers", false, "boolean"))
            .with_backend("docker"),
        ToolDefinition::new("inspect_container", "Get detailed info about a container.")
            .with_parameter(param("container_id", "Container name or id", true))
            .with_backend("docker"),
        ToolDefinition::new("get_logs", "Get logs from a container.")
            .with_parameter(param("container_id", "Container name or id", true))
            .with_parameter(typed("tail", "Number of trailing lines", false, "integer"))
            .with_backend("docker"),
        // search
        query_tool("brave_web_search", "Search the internet for information.", "brave"),
        query_tool(
            "duckduckgo_search",
            "Search the web using DuckDuckGo (privacy-focused).",
            "duckduckgo",
        )
        .with_remote_name("search"),
        query_tool(
            "wikipedia_search",
            "Search Wikipedia for factual information.",
            "wikipedia",
        )
        .with_remote_name("search"),
        query_tool(
            "search_papers",
            "Search academic papers from ArXiv, PubMed, and other sources.",
            "paper_search",
        ),
        query_tool("search_repositories", "Search for GitHub repositories.", "github"),
        // youtube
        ToolDefinition::new("get_transcript", "Get the transcript of a YouTube video.")
            .with_parameter(param("url", "Video URL", true))
            .with_backend("youtube"),
        // playwright
        ToolDefinition::new("playwright_navigate", "Navigate to a URL in a browser.")
            .with_parameter(param("url", "Page URL", true))
            .with_backend("playwright"),
        ToolDefinition::new("playwright_screenshot", "Take a screenshot of the current page.")
            .with_backend("playwright"),
        ToolDefinition::new(
            "playwright_get_content",
            "Get the text content of the current page.",
        )
        .with_backend("playwright"),
        // sqlite
        ToolDefinition::new(
            "query_database",
            "Execute SQL queries on SQLite databases using natural language.",
        )
        .with_parameter(param("query", "Question or SQL statement", true))
        .with_backend("sqlite"),
        ToolDefinition::new("create_table", "Create a new table in the database.")
            .with_parameter(param("table_name", "Table name", true))
            .with_parameter(param("schema", "Column definitions", true))
            .with_backend("sqlite"),
        // obsidian
        ToolDefinition::new("create_note", "Create a new note in Obsidian.")
            .with_parameter(param("title", "Note title", true))
            .with_parameter(param("content", "Markdown body", true))
            .with_parameter(param("folder", "Target folder", false))
            .with_backend("obsidian"),
        ToolDefinition::new("read_note", "Read a note from Obsidian.")
            .with_parameter(param("title", "Note title", true))
            .with_backend("obsidian"),
        query_tool("search_notes", "Search for notes in Obsidian.", "obsidian"),
        ToolDefinition::new("append_to_note", "Append content to an existing note.")
            .with_parameter(param("title", "Note title", true))
            .with_parameter(param("content", "Markdown to append", true))
            .with_backend("obsidian"),
        ToolDefinition::new("delete_note", "Delete a note from Obsidian.")
            .with_parameter(param("title", "Note title", true))
            .with_backend("obsidian"),
        // filesystem
        ToolDefinition::new("fs_read_file", "Read a file from the workspace.")
            .with_parameter(typed("path", "File path", true, "path"))
            .with_backend("filesystem"),
        ToolDefinition::new("fs_write_file", "Write content to a file in the workspace.")
            .with_parameter(typed("path", "File path", true, "path"))
            .with_parameter(param("content", "File content", true))
            .with_backend("filesystem"),
        ToolDefinition::new("fs_list_files", "List files in the workspace.")
            .with_parameter(typed("directory", "Directory, default '.'", false, "path"))
            .with_backend("filesystem"),
        // coding
        ToolDefinition::new(
            "run_coding_task",
            "Delegate a complex coding or software development task.",
        )
        .with_parameter(param("goal", "The coding objective", true))
        .with_backend("coding"),
        // system
        ToolDefinition::new(
            "run_system_repair",
            "Diagnose and repair system issues (Linux, Network, Packages).",
        )
        .with_parameter(param("issue", "Description of the system issue", true))
        .with_backend("system"),
        ToolDefinition::new(
            "get_system_stats",
            "Get current system statistics (CPU, RAM, Disk).",
        )
        .with_backend("system"),
    ]
}

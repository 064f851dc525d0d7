use crate::commands;
use crate::mcp;
use crate::session::Overrides;
use std::fs;
use std::path::{Path, PathBuf};

/// MCP config template for editors using the mcpServers format (Cursor, Claude)
const MCP_SERVERS_JSON_TEMPLATE: &str = r#"{
  "mcpServers": {
    "jenkins": {
      "command": "jenkins",
      "args": ["mcp-server"]
    }
  }
}
"#;

/// MCP config template for VSCode (.vscode/mcp.json)
const VSCODE_CONFIG_TEMPLATE: &str = r#"{
  "servers": {
    "jenkins": {
      "type": "stdio",
      "command": "jenkins",
      "args": ["mcp-server"]
    }
  }
}
"#;

/// Editors we can write an MCP client config for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editor {
    Cursor,
    Vscode,
    Claude,
}

impl Editor {
    fn name(&self) -> &'static str {
        match self {
            Editor::Cursor => "Cursor",
            Editor::Vscode => "VSCode",
            Editor::Claude => "Claude",
        }
    }

    /// Project-level config file for the editor
    fn config_path(&self, project: &Path) -> PathBuf {
        match self {
            Editor::Cursor => project.join(".cursor/mcp.json"),
            Editor::Vscode => project.join(".vscode/mcp.json"),
            Editor::Claude => project.join(".mcp.json"),
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Editor::Vscode => VSCODE_CONFIG_TEMPLATE,
            Editor::Cursor | Editor::Claude => MCP_SERVERS_JSON_TEMPLATE,
        }
    }
}

/// Outcome of writing one editor config
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyConfigured(PathBuf),
    /// A config exists without a jenkins entry; it is left untouched
    NeedsManualEdit(PathBuf),
}

/// Write the MCP config file for an editor unless one already exists.
pub fn generate_config(editor: Editor, project: &Path) -> Result<InitOutcome, String> {
    let config_path = editor.config_path(project);

    if config_path.exists() {
        let existing = fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read existing config: {}", e))?;
        if existing.contains("\"jenkins\"") {
            return Ok(InitOutcome::AlreadyConfigured(config_path));
        }
        return Ok(InitOutcome::NeedsManualEdit(config_path));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {} directory: {}", editor.name(), e))?;
    }
    fs::write(&config_path, editor.template())
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(InitOutcome::Created(config_path))
}

fn report(editor: Editor, outcome: &InitOutcome) {
    match outcome {
        InitOutcome::Created(path) => {
            eprintln!("✓ Created {} config at {}", editor.name(), path.display())
        }
        InitOutcome::AlreadyConfigured(path) => {
            eprintln!("✓ {} config already has jenkins at {}", editor.name(), path.display())
        }
        InitOutcome::NeedsManualEdit(path) => {
            eprintln!("⚠ {} config exists at {}", editor.name(), path.display());
            eprintln!("  Please manually add jenkins to the config.");
        }
    }
}

/// Write editor configs when any are requested, otherwise resolve the
/// session once and serve MCP over stdio.
pub async fn execute(overrides: &Overrides, editors: &[Editor]) -> Result<(), String> {
    if !editors.is_empty() {
        let project =
            std::env::current_dir().map_err(|e| format!("Failed to get current directory: {}", e))?;
        for editor in editors {
            let outcome = generate_config(*editor, &project)?;
            report(*editor, &outcome);
        }
        return Ok(());
    }

    let client = commands::connect(overrides)?;
    mcp::run_stdio_server(client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_cursor_config_new() {
        let temp_dir = TempDir::new().unwrap();

        let outcome = generate_config(Editor::Cursor, temp_dir.path()).unwrap();

        let config_path = temp_dir.path().join(".cursor/mcp.json");
        assert_eq!(outcome, InitOutcome::Created(config_path.clone()));
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("\"mcpServers\""));
        assert!(content.contains("\"command\": \"jenkins\""));
        assert!(content.contains("\"mcp-server\""));
    }

    #[test]
    fn test_generate_vscode_config_new() {
        let temp_dir = TempDir::new().unwrap();

        generate_config(Editor::Vscode, temp_dir.path()).unwrap();

        let content = fs::read_to_string(temp_dir.path().join(".vscode/mcp.json")).unwrap();
        assert!(content.contains("\"servers\""));
        assert!(content.contains("\"type\": \"stdio\""));
    }

    #[test]
    fn test_generated_configs_are_valid_json() {
        let temp_dir = TempDir::new().unwrap();

        for editor in [Editor::Cursor, Editor::Vscode, Editor::Claude] {
            generate_config(editor, temp_dir.path()).unwrap();
            let content = fs::read_to_string(editor.config_path(temp_dir.path())).unwrap();
            assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
        }
    }

    #[test]
    fn test_existing_config_with_jenkins_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(".mcp.json");
        let existing = r#"{"mcpServers": {"jenkins": {"command": "/opt/bin/jenkins"}}}"#;
        fs::write(&config_path, existing).unwrap();

        let outcome = generate_config(Editor::Claude, temp_dir.path()).unwrap();

        assert_eq!(outcome, InitOutcome::AlreadyConfigured(config_path.clone()));
        assert_eq!(fs::read_to_string(&config_path).unwrap(), existing);
    }

    #[test]
    fn test_existing_config_without_jenkins_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let cursor_dir = temp_dir.path().join(".cursor");
        fs::create_dir_all(&cursor_dir).unwrap();
        let config_path = cursor_dir.join("mcp.json");
        fs::write(&config_path, r#"{"mcpServers": {}}"#).unwrap();

        let outcome = generate_config(Editor::Cursor, temp_dir.path()).unwrap();

        assert_eq!(outcome, InitOutcome::NeedsManualEdit(config_path.clone()));
        assert_eq!(fs::read_to_string(&config_path).unwrap(), r#"{"mcpServers": {}}"#);
    }

    #[test]
    fn test_editor_config_paths() {
        let project = PathBuf::from("/test");
        assert_eq!(Editor::Cursor.config_path(&project), PathBuf::from("/test/.cursor/mcp.json"));
        assert_eq!(Editor::Vscode.config_path(&project), PathBuf::from("/test/.vscode/mcp.json"));
        assert_eq!(Editor::Claude.config_path(&project), PathBuf::from("/test/.mcp.json"));
    }
}

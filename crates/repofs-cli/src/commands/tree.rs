//! `repofs tree` command - List the file tree.

use anyhow::Result;
use repofs::{ContentsApi, FileTreeNode};
use serde::Serialize;

use super::utils::Session;
use crate::output;

/// JSON output for the tree command.
#[derive(Debug, Serialize)]
struct TreeOutput<'a> {
    root: &'a str,
    files: usize,
    entries: &'a [FileTreeNode],
}

/// Run the tree command.
pub fn run(session: &Session, path: Option<&str>, json: bool) -> Result<()> {
    let nodes = session.rt.block_on(execute(&session.client, path))?;
    let files = nodes.iter().map(FileTreeNode::file_count).sum();

    if json {
        return output::json(&TreeOutput {
            root: path.unwrap_or(""),
            files,
            entries: &nodes,
        });
    }

    for line in output::tree_lines(&nodes) {
        output::essential(&line);
    }
    output::info(&format!(
        "{files} file{}",
        if files == 1 { "" } else { "s" }
    ));
    Ok(())
}

/// List the tree under `path`.
pub async fn execute<C: ContentsApi>(client: &C, path: Option<&str>) -> Result<Vec<FileTreeNode>> {
    Ok(client.tree(path).await?)
}

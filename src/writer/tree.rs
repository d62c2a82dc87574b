/*!
 * Directory tree built from scanned relative paths
 */

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::FileRecord;

/// A directory or file in the rendered tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// Entry name
    pub name: String,
    /// Root-relative path
    pub path: String,
    /// Whether this entry is a directory
    pub is_dir: bool,
    /// Children, directories and files interleaved in name order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

#[derive(Default)]
struct Builder {
    children: BTreeMap<String, Builder>,
    is_file: bool,
}

impl Builder {
    fn into_entries(self, prefix: &str) -> Vec<TreeEntry> {
        self.children
            .into_iter()
            .map(|(name, node)| {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", prefix, name)
                };
                let is_dir = !node.is_file;
                TreeEntry {
                    children: node.into_entries(&path),
                    name,
                    path,
                    is_dir,
                }
            })
            .collect()
    }
}

/// Build the tree of directories leading to the scanned files
pub fn build_tree(records: &[FileRecord]) -> Vec<TreeEntry> {
    let mut root = Builder::default();
    for record in records {
        let mut node = &mut root;
        for part in record.relative_path.split('/') {
            node = node.children.entry(part.to_string()).or_default();
        }
        node.is_file = true;
    }
    root.into_entries("")
}

/// Render the tree as indented text with box-drawing guides
pub fn render_tree(root_name: &str, entries: &[TreeEntry]) -> String {
    let mut out = format!("{}/\n", root_name);
    render_level(entries, "", &mut out);
    out
}

fn render_level(entries: &[TreeEntry], indent: &str, out: &mut String) {
    for (index, entry) in entries.iter().enumerate() {
        let last = index + 1 == entries.len();
        let (branch, next_indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        out.push_str(indent);
        out.push_str(branch);
        out.push_str(&entry.name);
        if entry.is_dir {
            out.push('/');
        }
        out.push('\n');

        if entry.is_dir {
            render_level(&entry.children, &format!("{}{}", indent, next_indent), out);
        }
    }
}

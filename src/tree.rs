//! In-memory directory tree: a contiguous arena indexed by fid, per the
//! spec's recommendation over the source's map-keyed-by-fid representation.
//! The tree is acyclic and immutable once built, so this is `Send`-safe
//! with no reference counting or interior mutability required.

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub start: u64,
    pub length: u64,
    pub children: Vec<u64>,
}

impl Node {
    pub fn is_file(&self) -> bool {
        self.start != 0 || self.length != 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Option<Node>>,
}

impl Tree {
    /// A tree containing only the synthetic root (fid 0, name ".").
    pub fn with_root() -> Self {
        let root = Node {
            name: ".".to_string(),
            start: 0,
            length: 0,
            children: Vec::new(),
        };
        Tree {
            nodes: vec![Some(root)],
        }
    }

    /// Insert a node at `fid` and attach it to `parent`'s children. The
    /// parent MUST already exist (entries arrive in DFS preorder, so a
    /// parent's fid is always emitted before any of its descendants').
    pub fn insert(&mut self, fid: u64, parent: u64, name: String, start: u64, length: u64) {
        let idx = fid as usize;
        if self.nodes.len() <= idx {
            self.nodes.resize(idx + 1, None);
        }
        self.nodes[idx] = Some(Node {
            name,
            start,
            length,
            children: Vec::new(),
        });
        if let Some(Some(parent_node)) = self.nodes.get_mut(parent as usize) {
            parent_node.children.push(fid);
        }
    }

    pub fn get(&self, fid: u64) -> Option<&Node> {
        self.nodes.get(fid as usize).and_then(|slot| slot.as_ref())
    }

    /// Resolve a `/`-separated path to a fid, starting from the root.
    /// Empty segments (from a leading/trailing/doubled slash, or the
    /// literal path "." or "") are skipped rather than treated as errors;
    /// the format itself does not specially handle them.
    pub fn resolve(&self, path: &str) -> Option<u64> {
        let mut current = 0u64;
        for segment in path.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            let node = self.get(current)?;
            let mut found = None;
            for &child_fid in &node.children {
                if let Some(child) = self.get(child_fid) {
                    if child.name == segment {
                        found = Some(child_fid);
                        break;
                    }
                }
            }
            current = found?;
        }
        Some(current)
    }
}

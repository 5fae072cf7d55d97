//! Stacks: reusable category → skill bundles, loaded on demand and memoized per run.

use crate::config::ProjectLayout;
use crate::error::CompileError;
use crate::types::OrderedMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct StackDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    skills: OrderedMap<String>,
}

/// A named bundle of skills grouped by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub id: String,
    pub name: String,
    /// category → skill id, in declaration order
    pub skills: OrderedMap<String>,
}

impl Stack {
    /// Parse a stack document requested as `stack_id`.
    ///
    /// The requested id always wins over an id declared inside the document.
    pub fn parse(stack_id: &str, content: &str, origin: &Path) -> Result<Self, CompileError> {
        let document: StackDocument = serde_yaml::from_str(content)
            .map_err(|e| CompileError::load(origin, format!("Invalid stack: {}", e)))?;

        if let Some(declared) = &document.id {
            if declared != stack_id {
                tracing::warn!(
                    "Stack id mismatch in {}: requested={}, declared={}",
                    origin.display(),
                    stack_id,
                    declared
                );
            }
        }

        Ok(Self {
            id: stack_id.to_string(),
            name: document.name.unwrap_or_else(|| stack_id.to_string()),
            skills: document.skills,
        })
    }
}

/// Memo of loaded stacks, keyed by stack id. Append-only for the life of one run.
#[derive(Debug, Default)]
pub struct StackCache {
    stacks: HashMap<String, Stack>,
}

impl StackCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stack_id: &str) -> Option<&Stack> {
        self.stacks.get(stack_id)
    }

    pub fn insert(&mut self, stack: Stack) {
        self.stacks.insert(stack.id.clone(), stack);
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

/// Reads `stacks/{id}.yaml` through a [`StackCache`]
pub struct StackLoader {
    layout: ProjectLayout,
    cache: StackCache,
}

impl StackLoader {
    pub fn new(layout: &ProjectLayout) -> Self {
        Self::with_cache(layout, StackCache::new())
    }

    pub fn with_cache(layout: &ProjectLayout, cache: StackCache) -> Self {
        Self {
            layout: layout.clone(),
            cache,
        }
    }

    /// Load a stack, reading from disk only on a cache miss. Missing or malformed files are fatal.
    pub fn load(&mut self, stack_id: &str) -> Result<&Stack, CompileError> {
        if self.cache.get(stack_id).is_none() {
            let path = self.layout.stack_path(stack_id);
            let content = std::fs::read_to_string(&path).map_err(|e| {
                CompileError::load(&path, format!("Failed to read stack '{}': {}", stack_id, e))
            })?;
            let stack = Stack::parse(stack_id, &content, &path)?;
            tracing::debug!(
                stack = stack_id,
                skills = stack.skills.len(),
                "Loaded stack from {}",
                path.display()
            );
            self.cache.insert(stack);
        }

        self.cache.get(stack_id).ok_or_else(|| {
            CompileError::Reference(format!("Stack '{}' missing from cache", stack_id))
        })
    }

    pub fn cache(&self) -> &StackCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use tempfile::TempDir;

    fn layout_with_stack(temp: &TempDir, id: &str, content: &str) -> ProjectLayout {
        let layout = ProjectLayout::new(temp.path(), &OutputConfig::default());
        let path = layout.stack_path(id);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
        layout
    }

    #[test]
    fn test_parse_keeps_category_order() {
        let stack = Stack::parse(
            "web",
            "name: Web\nskills:\n  ui: react\n  data: postgres\n  api: hono\n",
            Path::new("web.yaml"),
        )
        .unwrap();
        assert_eq!(stack.name, "Web");
        let categories: Vec<&str> = stack.skills.keys().collect();
        assert_eq!(categories, vec!["ui", "data", "api"]);
    }

    #[test]
    fn test_requested_id_wins() {
        let stack = Stack::parse("web", "id: other\nskills: {}\n", Path::new("web.yaml")).unwrap();
        assert_eq!(stack.id, "web");
        assert_eq!(stack.name, "web");
    }

    #[test]
    fn test_load_memoizes() {
        let temp = TempDir::new().unwrap();
        let layout = layout_with_stack(&temp, "web", "skills:\n  ui: react\n");
        let mut loader = StackLoader::new(&layout);

        let first = loader.load("web").unwrap().clone();
        assert_eq!(loader.cache().len(), 1);

        // A cached stack is served without touching disk
        std::fs::remove_file(layout.stack_path("web")).unwrap();
        let second = loader.load("web").unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(loader.cache().len(), 1);
    }

    #[test]
    fn test_load_missing_stack_is_load_error() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path(), &OutputConfig::default());
        let mut loader = StackLoader::new(&layout);
        let err = loader.load("nope").unwrap_err();
        assert!(matches!(err, CompileError::Load { .. }));
        assert!(loader.cache().is_empty());
    }

    #[test]
    fn test_load_malformed_stack_is_load_error() {
        let temp = TempDir::new().unwrap();
        let layout = layout_with_stack(&temp, "bad", "skills: [not, a, map]\n");
        let mut loader = StackLoader::new(&layout);
        assert!(matches!(
            loader.load("bad").unwrap_err(),
            CompileError::Load { .. }
        ));
    }
}

//! Per-file input metadata.

use rustc_hash::FxHashMap;

/// Resolution metadata attached to a source module specifier by the module
/// resolver (not user configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
    /// Unresolvable/external absolute specifier; the reference is used
    /// as-is with no interop rewriting.
    Absolute,
    /// Absolute specifier whose default binding is read off the bare module
    /// object.
    AbsoluteDefault,
}

/// Identity and resolution metadata of the file being formatted.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub filename: String,
    module_types: FxHashMap<String, ModuleType>,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>) -> Self {
        SourceFile {
            filename: filename.into(),
            module_types: FxHashMap::default(),
        }
    }

    /// Record resolver metadata for a source module specifier.
    pub fn mark_module_type(&mut self, source: impl Into<String>, module_type: ModuleType) {
        self.module_types.insert(source.into(), module_type);
    }

    pub fn module_type(&self, source: &str) -> Option<ModuleType> {
        self.module_types.get(source).copied()
    }

    pub fn is_module_type(&self, source: &str, module_type: ModuleType) -> bool {
        self.module_type(source) == Some(module_type)
    }

    /// Module identifier derived from file identity: the relative filename
    /// with path separators normalized and the extension stripped.
    pub fn default_module_name(&self) -> String {
        let normalized = self.filename.replace('\\', "/");
        let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);
        match trimmed.rfind('.') {
            // keep dots inside directory components
            Some(dot) if !trimmed[dot..].contains('/') => trimmed[..dot].to_string(),
            _ => trimmed.to_string(),
        }
    }
}

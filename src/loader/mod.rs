//! Decoder capabilities.
//!
//! A [`CheckpointLoader`] turns a file into a [`Node`] graph. Loaders are
//! injected into a [`LoaderRegistry`] which the analyzer consults per file;
//! a file no registered loader handles is reported as an unsupported
//! environment instead of being decoded.

mod safetensors;
pub mod test_factory;

pub use safetensors::{SafetensorsLoader, MAX_HEADER_LEN};

use crate::error::{InspectError, Result};
use crate::graph::Node;
use std::fmt;
use std::path::Path;

/// Something that can decode checkpoint files into an object graph
pub trait CheckpointLoader: Send + Sync {
    /// Human-readable decoder name
    fn name(&self) -> &'static str;

    /// Container format identifier written to reports
    fn format_type(&self) -> &'static str;

    /// Lower-case file extensions handled, without the dot
    fn extensions(&self) -> &'static [&'static str];

    /// Decode the file at `path`. Tensor data stays on the host.
    ///
    /// # Errors
    /// Returns [`InspectError::Decode`] for malformed input.
    fn load(&self, path: &Path) -> Result<Node>;

    /// Whether this loader handles `path`, judged by extension
    fn handles(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}

/// Formats recognized by extension that have no bundled decoder
const KNOWN_UNAVAILABLE: &[(&[&str], &str)] = &[
    (&["pt", "pth", "bin", "ckpt"], "PyTorch pickle"),
    (&["gguf"], "GGUF"),
    (&["onnx"], "ONNX"),
];

/// Set of injected decoder capabilities
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn CheckpointLoader>>,
}

impl LoaderRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled decoders
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new().with_loader(SafetensorsLoader)
    }

    /// Add a loader. Earlier registrations win on overlapping extensions.
    pub fn register(&mut self, loader: impl CheckpointLoader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with_loader(mut self, loader: impl CheckpointLoader + 'static) -> Self {
        self.register(loader);
        self
    }

    /// Number of registered loaders
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Whether no loader is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Pick the loader for `path`.
    ///
    /// # Errors
    /// Returns [`InspectError::UnsupportedEnvironment`] with remediation hints
    /// when no registered loader handles the file.
    pub fn resolve(&self, path: &Path) -> Result<&dyn CheckpointLoader> {
        if let Some(loader) = self.loaders.iter().find(|l| l.handles(path)) {
            return Ok(loader.as_ref());
        }

        let ext = extension_of(path);
        let format = ext
            .as_deref()
            .and_then(|ext| {
                KNOWN_UNAVAILABLE
                    .iter()
                    .find(|(exts, _)| exts.contains(&ext))
                    .map(|(_, label)| (*label).to_string())
            })
            .or_else(|| ext.as_ref().map(|e| format!(".{e}")))
            .unwrap_or_else(|| "extension-less".to_string());

        Err(InspectError::UnsupportedEnvironment {
            suggestions: self.suggestions_for(&format),
            format,
            path: path.to_path_buf(),
        })
    }

    fn suggestions_for(&self, format: &str) -> Vec<String> {
        let mut suggestions = Vec::new();
        if format == "PyTorch pickle" {
            suggestions.push(
                "Convert the checkpoint to SafeTensors (e.g. safetensors.torch.save_file) \
                 and inspect the .safetensors file"
                    .to_string(),
            );
            suggestions.push(
                "Register a pickle decoder implementing CheckpointLoader with the LoaderRegistry"
                    .to_string(),
            );
        }
        let supported: Vec<String> = self
            .loaders
            .iter()
            .flat_map(|l| l.extensions().iter().map(|e| format!(".{e}")))
            .collect();
        if supported.is_empty() {
            suggestions.push("No decoders are registered".to_string());
        } else {
            suggestions.push(format!("Supported extensions: {}", supported.join(", ")));
        }
        suggestions
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.loaders.iter().map(|l| l.name()))
            .finish()
    }
}

/// File size in bytes, or 0 when the file cannot be stat'ed
#[must_use]
pub fn probe_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map_or(0, |m| m.len())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

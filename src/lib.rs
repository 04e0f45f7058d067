//! ckpt-inspector: structure analyzer for model checkpoints.
//!
//! Given a decoded checkpoint graph, produces a flat inventory of every
//! tensor's metadata (name, dtype, shape, element count, byte size, device)
//! plus a map of the non-tensor metadata, without ever reading tensor
//! values. A failure to read one tensor is recorded on that tensor and does
//! not abort the analysis.
//!
//! # Quick Start
//!
//! ```
//! use ckpt_inspector::prelude::*;
//!
//! let root = Node::mapping([
//!     ("a", Node::mapping([("w", TensorMeta::new("F32", vec![4, 4]).into())])),
//!     ("note", Node::from("x")),
//! ]);
//!
//! let report = analyze_graph(&root, 0, "safetensors", &InspectOptions::default()).unwrap();
//! assert_eq!(report.tensors[0].name, "a.w");
//! assert_eq!(report.total_parameters, 16);
//! ```
//!
//! # Modules
//!
//! - [`graph`]: Loaded checkpoint graph and the tensor capability trait
//! - [`inspect`]: Descriptor extraction, traversal, reports, summaries
//! - [`loader`]: Decoder capabilities and the bundled SafeTensors decoder
//! - [`error`]: Fatal error types

pub mod error;
pub mod graph;
pub mod inspect;
pub mod loader;
pub mod prelude;

pub use error::{InspectError, Result};

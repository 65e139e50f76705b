//! # Sweep Code Chunker
//!
//! Structural decomposition of source text into non-overlapping,
//! line-number-preserving segments aligned to language constructs.
//!
//! ## Philosophy
//!
//! The chunker is not a parser. It is a robust heuristic scan that finds
//! *approximate* construct boundaries, good enough to keep each fragment
//! under a size budget without splitting a method, class, or markup element
//! across fragments when avoidable. On any input it cannot make sense of, it
//! degrades to a single whole-file chunk rather than failing.
//!
//! ## Architecture
//!
//! ```text
//! Source Text + Language Tag
//!     │
//!     ├──> Boundary Scan (per language)
//!     │    ├─> brace depth, string/comment awareness
//!     │    ├─> declaration openers (class/method/function/element)
//!     │    └─> contiguous segments in original line coordinates
//!     │
//!     ├──> Post-pass
//!     │    ├─> fold comment-only / undersized chunks forward
//!     │    └─> accumulate leftovers into an "other" chunk
//!     │
//!     └──> Coverage check → Chunk[] (or whole-file fallback)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sweep_code_chunker::{LanguageTag, StructuralChunker};
//!
//! let chunker = StructuralChunker::default();
//! let code = "class Greeter {\n    void hello() {\n    }\n}\n";
//!
//! for chunk in chunker.chunk(code, LanguageTag::Java) {
//!     println!("{} [{}-{}]", chunk.label, chunk.start_line, chunk.end_line);
//! }
//! ```

mod chunker;
mod config;
mod error;
mod java;
mod language;
mod markup;
mod merge;
mod php;
mod scan;
mod segment;
mod types;

pub use chunker::{ChunkingStats, StructuralChunker};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use language::LanguageTag;
pub use types::{Chunk, ChunkKind};

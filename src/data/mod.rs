//! Data layer: core types, parsing, filtering, and export.
//!
//! Architecture:
//! ```text
//!  results/*.vec
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse each file → VectorTable (one run)
//!   └──────────┘
//!        │  concat
//!        ▼
//!   ┌─────────────┐
//!   │ VectorTable  │  Vec<DataPoint>
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  metric regexes → matching rows
//!   └──────────┘
//!        │
//!        ▼
//!   group by (run, metric) → module → series     (export: optional CSV)
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;

// src/checker/mod.rs
// =============================================================================
// This module contains all page analysis and link checking logic.
//
// Submodules:
// - tree: Walks the parsed HTML once (title, version, headings, login form, hrefs)
// - link: Resolves hrefs and classifies them as internal or external
// - probe: Makes HTTP requests to check if links are alive
// - report: Runs one task per link and merges everything into one report
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod link;
mod probe;
mod report;
mod tree;

// Re-export public items from submodules
// This lets users write `checker::audit_page()` instead of
// `checker::report::audit_page()`
pub use probe::{HttpProbe, LinkProbe};
pub use report::{audit_page, AnalysisResult};
#[cfg(test)]
pub use tree::analyze_html;

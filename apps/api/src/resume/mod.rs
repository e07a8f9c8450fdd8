// Resume intake: extraction, heuristic scoring, and the context store that
// later grounds chat turns.

pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod scoring;
pub mod store;

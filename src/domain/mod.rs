// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the system. No Burn types, no file I/O, no ML code —
// everything here is testable without a tensor backend.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A raw labelled sentence from a dataset file
pub mod sentence;

// Core abstractions (traits) that other layers implement
pub mod traits;

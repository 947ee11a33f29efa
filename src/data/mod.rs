// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw dataset JSON files to GPU-ready tensor
// batches. The pipeline flows in this order:
//
//   {train,valid,test}_data.json
//       │
//       ▼
//   JsonSentenceLoader  → reads one split, parses records
//       │
//       ▼
//   SentenceEncoder     → tokenises and pads each sentence
//       │
//       ▼
//   SentenceDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   SentenceBatcher     → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader          → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads dataset JSON files from disk
pub mod loader;

/// Tokenises sentences into fixed-length padded sequences
pub mod encode;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

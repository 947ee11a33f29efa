// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish a goal (a full
// fine-tuning run, or a standalone test-set evaluation).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern

// The full fine-tuning workflow (train, validate, test)
pub mod train_use_case;

// Standalone evaluation of the best checkpoint
pub mod eval_use_case;

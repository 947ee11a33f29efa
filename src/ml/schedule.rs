// ============================================================
// Layer 5 — Warmup + Cosine Learning Rate Schedule
// ============================================================
// Two phases over the whole training run:
//
//   Phase 1 (warmup): linear ramp 0 → peak_lr over the first
//   epoch's worth of steps. Starting at 0 avoids the early
//   instability of fine-tuning a pretrained encoder — without
//   warmup the run frequently fails to converge at all.
//
//   Phase 2 (decay): cosine curve peak_lr → 0 over every
//   remaining step.
//
// The trainer reads the rate, applies one optimiser step,
// then advances the schedule — so the rate it logs afterwards
// reflects the update that has already been applied.
//
// Reference: Loshchilov & Hutter (2017) SGDR

use std::f64::consts::PI;

/// Step-indexed warmup + cosine decay schedule.
#[derive(Debug, Clone)]
pub struct WarmupCosineSchedule {
    peak_lr:      f64,
    warmup_steps: usize,
    total_steps:  usize,
    current_step: usize,
}

impl WarmupCosineSchedule {
    /// `warmup_steps` is typically one epoch's step count and
    /// `total_steps` is epochs × steps-per-epoch.
    pub fn new(peak_lr: f64, warmup_steps: usize, total_steps: usize) -> Self {
        Self { peak_lr, warmup_steps, total_steps, current_step: 0 }
    }

    /// The learning rate for the current step.
    pub fn lr(&self) -> f64 {
        if self.current_step < self.warmup_steps {
            if self.warmup_steps == 0 {
                return self.peak_lr;
            }
            // Linear ramp: step 0 gives exactly 0.
            return self.peak_lr * self.current_step as f64 / self.warmup_steps as f64;
        }

        let decay_steps = self.total_steps.saturating_sub(self.warmup_steps);
        if decay_steps == 0 {
            return 0.0;
        }

        let decay_step = self.current_step - self.warmup_steps;
        if decay_step >= decay_steps {
            // Past the end of training: stay at the endpoint.
            return 0.0;
        }

        let progress = decay_step as f64 / decay_steps as f64;
        self.peak_lr * 0.5 * (1.0 + (PI * progress).cos())
    }

    /// Advance to the next step.
    pub fn step(&mut self) {
        self.current_step += 1;
    }
}

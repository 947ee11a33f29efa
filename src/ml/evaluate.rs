// ============================================================
// Layer 5 — Evaluation Metrics
// ============================================================
// Accuracy is the argmax of the logit vector compared against
// the integer ground-truth label, averaged per batch (step
// tracking) or over a whole split (validation / test). Ties in
// the argmax resolve however the backend resolves them.
//
// The classification report mirrors the usual per-class
// breakdown: precision TP/(TP+FP), recall TP/(TP+FN), their
// harmonic mean F1, and support (true samples per class),
// plus macro and support-weighted averages.
//
// Reference: Burn Book §5 (Metrics)

use burn::prelude::*;

/// Fraction of samples in one batch whose predicted class
/// (argmax over logits) matches the label.
pub fn batch_accuracy<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> f64 {
    let total = labels.dims()[0];
    if total == 0 {
        return 0.0;
    }

    // argmax(1) returns shape [batch, 1] — squeeze to [batch]
    // before comparing with labels which is [batch]
    let preds = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = preds.equal(labels).int().sum().into_scalar().elem::<i64>();
    correct as f64 / total as f64
}

/// Predicted class indices for one batch of logits.
pub fn predicted_labels<B: Backend>(logits: Tensor<B, 2>) -> Vec<usize> {
    let preds = logits.argmax(1).flatten::<1>(0, 1);
    int_tensor_to_labels(preds)
}

/// Ground-truth class indices from a label tensor.
pub fn int_tensor_to_labels<B: Backend>(t: Tensor<B, 1, Int>) -> Vec<usize> {
    t.into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .unwrap_or_default()
        .into_iter()
        .map(|v| v as usize)
        .collect()
}

/// Split-level accuracy over collected labels.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

// ─── Confusion Matrix ─────────────────────────────────────────────────────────

/// Square count matrix where element [t][p] is the number of
/// samples with true class t predicted as class p.
pub struct ConfusionMatrix {
    n_classes: usize,
    counts:    Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[usize], y_pred: &[usize]) -> Self {
        let n_classes = y_true
            .iter()
            .chain(y_pred.iter())
            .max()
            .map(|&m| m + 1)
            .unwrap_or(0);

        let mut counts = vec![vec![0usize; n_classes]; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            counts[t][p] += 1;
        }
        Self { n_classes, counts }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of true samples of this class.
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    /// TP / (TP + FP) — zero when the class was never predicted.
    pub fn precision(&self, class: usize) -> f64 {
        let predicted: usize = (0..self.n_classes).map(|t| self.counts[t][class]).sum();
        if predicted == 0 {
            return 0.0;
        }
        self.counts[class][class] as f64 / predicted as f64
    }

    /// TP / (TP + FN) — zero when the class has no true samples.
    pub fn recall(&self, class: usize) -> f64 {
        let support = self.support(class);
        if support == 0 {
            return 0.0;
        }
        self.counts[class][class] as f64 / support as f64
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self, class: usize) -> f64 {
        let p = self.precision(class);
        let r = self.recall(class);
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    pub fn total(&self) -> usize {
        (0..self.n_classes).map(|c| self.support(c)).sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: usize = (0..self.n_classes).map(|c| self.counts[c][c]).sum();
        correct as f64 / total as f64
    }
}

// ─── Classification Report ────────────────────────────────────────────────────

/// Per-class precision / recall / F1 / support breakdown with
/// macro and support-weighted averages, formatted as a table.
pub fn classification_report(y_true: &[usize], y_pred: &[usize]) -> String {
    let cm    = ConfusionMatrix::from_labels(y_true, y_pred);
    let total = cm.total();

    let mut report = String::new();
    report.push_str(&format!(
        "{:>12} {:>10} {:>10} {:>10} {:>10}\n",
        "", "precision", "recall", "f1-score", "support"
    ));
    report.push('\n');

    for class in 0..cm.n_classes() {
        report.push_str(&format!(
            "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
            class,
            cm.precision(class),
            cm.recall(class),
            cm.f1(class),
            cm.support(class)
        ));
    }
    report.push('\n');

    report.push_str(&format!(
        "{:>12} {:>32.2} {:>10}\n",
        "accuracy",
        cm.accuracy(),
        total
    ));

    let n = cm.n_classes().max(1) as f64;
    let macro_p: f64 = (0..cm.n_classes()).map(|c| cm.precision(c)).sum::<f64>() / n;
    let macro_r: f64 = (0..cm.n_classes()).map(|c| cm.recall(c)).sum::<f64>() / n;
    let macro_f: f64 = (0..cm.n_classes()).map(|c| cm.f1(c)).sum::<f64>() / n;
    report.push_str(&format!(
        "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "macro avg", macro_p, macro_r, macro_f, total
    ));

    let weight = |c: usize| cm.support(c) as f64 / total.max(1) as f64;
    let w_p: f64 = (0..cm.n_classes()).map(|c| weight(c) * cm.precision(c)).sum();
    let w_r: f64 = (0..cm.n_classes()).map(|c| weight(c) * cm.recall(c)).sum();
    let w_f: f64 = (0..cm.n_classes()).map(|c| weight(c) * cm.f1(c)).sum();
    report.push_str(&format!(
        "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}\n",
        "weighted avg", w_p, w_r, w_f, total
    ));

    report
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_accuracy_three_of_four() {
        let device = Default::default();
        // argmax per row: [0, 0, 1, 0] against labels [0, 1, 1, 0]
        let logits = Tensor::<TestBackend, 1>::from_floats(
            [2.0, 0.1, 3.0, 1.0, 0.2, 4.0, 5.0, 0.5].as_slice(),
            &device,
        )
        .reshape([4, 2]);
        let labels =
            Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 1, 0].as_slice(), &device);

        assert_eq!(batch_accuracy(logits, labels), 0.75);
    }

    #[test]
    fn test_predicted_labels_argmax() {
        let device = Default::default();
        let logits = Tensor::<TestBackend, 1>::from_floats(
            [0.1, 0.9, 0.8, 0.2].as_slice(),
            &device,
        )
        .reshape([2, 2]);
        assert_eq!(predicted_labels(logits), vec![1, 0]);
    }

    #[test]
    fn test_split_accuracy() {
        assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 0, 1, 0]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let cm = ConfusionMatrix::from_labels(&[0, 1, 1, 0], &[0, 0, 1, 0]);
        assert_eq!(cm.n_classes(), 2);
        assert_eq!(cm.support(0), 2);
        assert_eq!(cm.support(1), 2);
        assert_eq!(cm.accuracy(), 0.75);
    }

    #[test]
    fn test_precision_recall_f1() {
        // true [0,1,1,0], pred [0,0,1,0]:
        //   class 0: TP=2, FP=1, FN=0 → precision 2/3, recall 1.0
        //   class 1: TP=1, FP=0, FN=1 → precision 1.0, recall 0.5
        let cm = ConfusionMatrix::from_labels(&[0, 1, 1, 0], &[0, 0, 1, 0]);

        assert!((cm.precision(0) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(cm.recall(0), 1.0);
        assert!((cm.f1(0) - 0.8).abs() < 1e-12);

        assert_eq!(cm.precision(1), 1.0);
        assert_eq!(cm.recall(1), 0.5);
        assert!((cm.f1(1) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unpredicted_class_has_zero_precision() {
        // Class 1 never predicted: precision and F1 must be 0, not NaN.
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 0]);
        assert_eq!(cm.precision(1), 0.0);
        assert_eq!(cm.f1(1), 0.0);
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = classification_report(&[0, 1, 1, 0], &[0, 0, 1, 0]);
        assert!(report.contains("precision"));
        assert!(report.contains("f1-score"));
        assert!(report.contains("accuracy"));
        assert!(report.contains("macro avg"));
        assert!(report.contains("weighted avg"));
        assert!(report.contains("0.75"));
    }
}

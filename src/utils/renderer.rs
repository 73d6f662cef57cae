use burn::train::renderer::{MetricState, MetricsRenderer, TrainingProgress};
use derive_new::new;

/// A metrics renderer that keeps training output off the terminal
///
/// Progress goes to the `log` facade at debug level so headless runs stay
/// quiet unless the caller opts in.
#[derive(new)]
pub struct Quiet {}

impl MetricsRenderer for Quiet {
    fn update_train(&mut self, _state: MetricState) {}

    fn update_valid(&mut self, _state: MetricState) {}

    fn render_train(&mut self, item: TrainingProgress) {
        log::debug!(
            "train epoch {}/{} iteration {}",
            item.epoch,
            item.epoch_total,
            item.iteration
        );
    }

    fn render_valid(&mut self, item: TrainingProgress) {
        log::debug!(
            "valid epoch {}/{} iteration {}",
            item.epoch,
            item.epoch_total,
            item.iteration
        );
    }
}

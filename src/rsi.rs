/// Relative Strength Index with Wilder's smoothing.
///
/// Output is aligned with the input: the first `window` entries are `None`
/// because there is not enough history to seed the averages.
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    window: usize,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn calculate(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; closes.len()];
        let n = self.window;

        if n == 0 || closes.len() < n + 1 {
            return result;
        }

        // gains[i] / losses[i] describe the move from closes[i] to closes[i + 1]
        let (gains, losses): (Vec<f64>, Vec<f64>) = closes
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let mut avg_gain = gains[..n].iter().sum::<f64>() / n as f64;
        let mut avg_loss = losses[..n].iter().sum::<f64>() / n as f64;
        result[n] = Some(Self::index(avg_gain, avg_loss));

        for i in n..gains.len() {
            avg_gain = (avg_gain * (n - 1) as f64 + gains[i]) / n as f64;
            avg_loss = (avg_loss * (n - 1) as f64 + losses[i]) / n as f64;
            result[i + 1] = Some(Self::index(avg_gain, avg_loss));
        }

        result
    }

    /// Most recent value, `None` while the series is still warming up.
    pub fn latest(&self, closes: &[f64]) -> Option<f64> {
        self.calculate(closes).last().copied().flatten()
    }

    fn index(avg_gain: f64, avg_loss: f64) -> f64 {
        // Zero average loss, flat series included, pins the index at 100
        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

use super::noise::NoiseParams;

pub const INITIAL_COVARIANCE: f64 = 1.0;
pub const INITIAL_PROCESS_NOISE: f64 = 0.1;
pub const INITIAL_MEASUREMENT_NOISE: f64 = 1.0;

/// Single-state Kalman filter without control input.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarKalmanFilter {
    pub estimate: f64,
    pub covariance: f64,
    pub process_noise: f64,
    pub measurement_noise: f64,
}

impl ScalarKalmanFilter {
    /// Seeds the filter with a first raw measurement.
    pub fn seeded(measurement: f64) -> Self {
        Self {
            estimate: measurement,
            covariance: INITIAL_COVARIANCE,
            process_noise: INITIAL_PROCESS_NOISE,
            measurement_noise: INITIAL_MEASUREMENT_NOISE,
        }
    }

    pub fn tune(&mut self, noise: NoiseParams) {
        self.process_noise = noise.process;
        self.measurement_noise = noise.measurement;
    }

    /// `P += Q`
    pub fn predict(&mut self) {
        self.covariance += self.process_noise;
    }

    /// Kalman gain with an explicit covariance in the denominator.
    /// A zero innovation variance yields zero gain.
    pub fn gain_against(&self, denominator_covariance: f64) -> f64 {
        let innovation = denominator_covariance + self.measurement_noise;
        if innovation <= 0.0 || !innovation.is_finite() {
            return 0.0;
        }
        self.covariance / innovation
    }

    pub fn gain(&self) -> f64 {
        self.gain_against(self.covariance)
    }

    /// `x += K (z - x)`, `P *= 1 - K`
    pub fn correct(&mut self, measurement: f64, gain: f64) {
        self.estimate += gain * (measurement - self.estimate);
        self.covariance *= 1.0 - gain;
    }

    /// Full predict/gain/correct cycle on this channel alone.
    pub fn update(&mut self, measurement: f64) -> f64 {
        self.predict();
        let gain = self.gain();
        self.correct(measurement, gain);
        self.estimate
    }
}

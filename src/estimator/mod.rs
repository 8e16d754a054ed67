mod bank;
mod filter;
mod noise;

pub use bank::PositionVelocityEstimator;

#[cfg(test)]
mod tests {
    use super::filter::ScalarKalmanFilter;
    use super::noise::position_noise;
    use super::*;
    use crate::config::GainCoupling;
    use crate::fix::{Coordinate, FixSample};
    use approx::assert_relative_eq;

    fn sample(lat: f64, lng: f64, speed: f32) -> FixSample {
        FixSample {
            satellites: 10,
            latitude: Coordinate::from_degrees(lat),
            longitude: Coordinate::from_degrees(lng),
            speed_kmh: speed,
            hdop: 0.9,
            pdop: 1.5,
            fix_ok: true,
            ..Default::default()
        }
    }

    #[test]
    fn first_sample_seeds_every_channel() {
        let mut est = PositionVelocityEstimator::new(GainCoupling::Independent);
        assert!(est.smoothed().is_none());

        let out = est.update(&sample(35.0, 139.0, 3.0));
        assert_relative_eq!(out.latitude, 35.0);
        assert_relative_eq!(out.longitude, 139.0);
        assert_relative_eq!(out.speed_kmh, 3.0);

        let lat = est.latitude().unwrap();
        assert_relative_eq!(lat.estimate, 35.0);
        assert_eq!(lat.covariance, 1.0);
        assert_eq!(est.updates(), 1);
    }

    #[test]
    fn second_sample_moves_partway() {
        let mut est = PositionVelocityEstimator::new(GainCoupling::Independent);
        est.update(&sample(35.0, 139.0, 3.0));
        let out = est.update(&sample(35.001, 139.001, 5.0));

        assert!(out.latitude > 35.0 && out.latitude < 35.001);
        assert!(out.longitude > 139.0 && out.longitude < 139.001);
        assert!(out.speed_kmh > 3.0 && out.speed_kmh < 5.0);
        assert!(est.latitude().unwrap().covariance < 1.0 + 1.0);
    }

    #[test]
    fn trusts_measurements_more_with_better_geometry() {
        let mut good = PositionVelocityEstimator::new(GainCoupling::Independent);
        let mut poor = PositionVelocityEstimator::new(GainCoupling::Independent);
        good.update(&sample(35.0, 139.0, 0.0));
        poor.update(&sample(35.0, 139.0, 0.0));

        let better = good.update(&FixSample {
            satellites: 20,
            hdop: 0.6,
            ..sample(35.001, 139.0, 0.0)
        });
        let worse = poor.update(&FixSample {
            satellites: 5,
            hdop: 5.0,
            ..sample(35.001, 139.0, 0.0)
        });
        assert!(better.latitude > worse.latitude);
    }

    #[test]
    fn stationary_track_converges() {
        let mut est = PositionVelocityEstimator::new(GainCoupling::Independent);
        est.update(&sample(35.0, 139.0, 0.0));
        let target = sample(35.0005, 139.0005, 0.0);
        let mut last = f64::INFINITY;
        for _ in 0..200 {
            let out = est.update(&target);
            let err = (out.latitude - target.latitude_deg()).abs();
            assert!(err <= last);
            last = err;
        }
        assert!(last < 1e-6);
    }

    #[test]
    fn zero_satellites_keep_estimates_finite() {
        let mut est = PositionVelocityEstimator::new(GainCoupling::Independent);
        est.update(&sample(35.0, 139.0, 1.0));
        let out = est.update(&FixSample {
            satellites: 0,
            hdop: 99.99,
            pdop: 99.99,
            ..sample(35.1, 139.1, 2.0)
        });
        assert!(out.latitude.is_finite());
        assert!(out.longitude.is_finite());
        assert!(out.speed_kmh.is_finite());
        assert!(est.speed().unwrap().covariance.is_finite());
    }

    #[test]
    fn independent_channels_match_single_filters() {
        let mut est = PositionVelocityEstimator::new(GainCoupling::Independent);
        let first = sample(35.0, 139.0, 0.0);
        let second = sample(35.002, 139.004, 12.0);
        est.update(&first);
        est.update(&second);

        let mut lng = ScalarKalmanFilter::seeded(first.longitude_deg());
        lng.tune(position_noise(second.satellites, second.hdop, second.speed_kmh));
        lng.update(second.longitude_deg());
        assert_eq!(est.longitude().unwrap(), &lng);
    }

    #[test]
    fn legacy_coupling_uses_latitude_covariance() {
        let mut legacy = PositionVelocityEstimator::new(GainCoupling::Legacy);
        let mut independent = PositionVelocityEstimator::new(GainCoupling::Independent);
        let first = sample(35.0, 139.0, 0.0);
        let second = sample(35.002, 139.004, 12.0);
        for est in [&mut legacy, &mut independent] {
            est.update(&first);
            est.update(&second);
        }
        assert_eq!(legacy.latitude(), independent.latitude());

        // The corrected latitude covariance is smaller than the predicted
        // longitude one, so the legacy gain is larger.
        let target = second.longitude_deg();
        let legacy_lng = legacy.longitude().unwrap();
        let independent_lng = independent.longitude().unwrap();
        assert!(
            (target - legacy_lng.estimate).abs() < (target - independent_lng.estimate).abs()
        );
        assert!(legacy_lng.covariance < independent_lng.covariance);
    }

    #[test]
    fn legacy_gain_divides_by_corrected_latitude_covariance() {
        let mut legacy = PositionVelocityEstimator::new(GainCoupling::Legacy);
        let first = sample(35.0, 139.0, 0.0);
        let second = sample(35.002, 139.004, 12.0);
        legacy.update(&first);
        legacy.update(&second);

        let noise = position_noise(second.satellites, second.hdop, second.speed_kmh);
        let mut lat = ScalarKalmanFilter::seeded(first.latitude_deg());
        lat.tune(noise);
        lat.update(second.latitude_deg());

        let mut lng = ScalarKalmanFilter::seeded(first.longitude_deg());
        lng.tune(noise);
        lng.predict();
        let gain = lng.gain_against(lat.covariance);
        lng.correct(second.longitude_deg(), gain);

        assert_eq!(legacy.longitude().unwrap(), &lng);
    }

    #[test]
    fn reset_reseeds_on_next_update() {
        let mut est = PositionVelocityEstimator::new(GainCoupling::Independent);
        est.update(&sample(35.0, 139.0, 0.0));
        est.update(&sample(35.001, 139.0, 0.0));
        est.reset();
        assert!(!est.is_seeded());

        let out = est.update(&sample(36.0, 140.0, 0.0));
        assert_relative_eq!(out.latitude, 36.0);
        assert_eq!(est.latitude().unwrap().covariance, 1.0);
    }
}

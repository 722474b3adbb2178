#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::Time;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.delta, Duration::default());
        assert!(time.delta_seconds().abs() < f32::EPSILON);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();

        sleep(Duration::from_millis(10));

        let delta = time.update();
        assert!(delta >= Duration::from_millis(10));
        assert_eq!(delta, time.delta);
    }

    #[test]
    fn test_delta_seconds() {
        let mut time = Time::new();

        let sleep_duration = Duration::from_millis(10);
        sleep(sleep_duration);
        time.update();

        // Loose bound for slow CI machines
        let expected = sleep_duration.as_secs_f32();
        assert!((time.delta_seconds() - expected).abs() < 0.1);
    }
}

use approx::assert_abs_diff_eq;
use image::{GrayImage, Luma};
use ndarray::Array2;
use profiler::{
    BeamProfiler, Frame, ProfilerSettings, Screen, DEFAULT_NUM_POINTS, PROFILER_HUD_KEY,
};
use profiler_harness::{
    run_session, DummyGaussian, DummyGaussianConfig, FrameSource, ImageFileSource, SourceError,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn active_profiler(screen: &mut Screen) -> BeamProfiler {
    let mut profiler = BeamProfiler::new(ProfilerSettings::default()).unwrap();
    profiler.set_active(true, screen);
    profiler
}

fn clean_camera() -> DummyGaussian {
    DummyGaussian::new(DummyGaussianConfig {
        rows: 120,
        cols: 160,
        sigma_x: 5.0,
        sigma_y: 4.0,
        pedestal: 0.0,
        noise_std: 0.0,
        wander_radius: 15.0,
        wander_period: 8,
        ..Default::default()
    })
    .unwrap()
}

/// Yields a good frame then a NaN-poisoned one, alternately
struct FlakySensor {
    calls: usize,
}

impl FrameSource for FlakySensor {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        self.calls += 1;
        let mut data = Array2::<f64>::zeros((16, 16));
        data[[8, 8]] = 100.0;
        if self.calls % 2 == 0 {
            data[[0, 0]] = f64::NAN;
        }
        Ok(Frame::mono(data))
    }

    fn id_string(&self) -> String {
        "Flaky sensor".to_string()
    }
}

/// Fails outright after a fixed number of frames
struct ShortSensor {
    remaining: usize,
}

impl FrameSource for ShortSensor {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        if self.remaining == 0 {
            return Err(SourceError::InvalidConfig("sensor disconnected".to_string()));
        }
        self.remaining -= 1;
        Ok(Frame::mono(Array2::ones((8, 8))))
    }

    fn id_string(&self) -> String {
        "Short sensor".to_string()
    }
}

#[test]
fn test_session_tracks_wandering_beam() {
    init_logging();
    let mut camera = clean_camera();
    let mut screen = Screen::new();
    let mut profiler = active_profiler(&mut screen);

    let summary = run_session(&mut camera, &mut profiler, &mut screen, 8).unwrap();

    assert_eq!(summary.delivered, 8);
    assert_eq!(summary.analyzed, 8);
    assert_eq!(summary.dropped, 0);
    assert_eq!(summary.estimates.len(), 8);

    for (index, estimate) in summary.estimates.iter().enumerate() {
        let (x, y) = camera.center_at(index as u64);
        assert_abs_diff_eq!(estimate.centroid_x, x, epsilon = 0.05);
        assert_abs_diff_eq!(estimate.centroid_y, y, epsilon = 0.05);
    }

    assert!(screen.overlay.visible);
    assert_eq!(screen.overlay.ellipse.len(), DEFAULT_NUM_POINTS);
    assert!(screen.hud.get(PROFILER_HUD_KEY).is_some());
    assert_eq!(profiler.last_estimate(), summary.estimates.last());
}

#[test]
fn test_inactive_profiler_skips_frames() {
    init_logging();
    let mut camera = clean_camera();
    let mut screen = Screen::new();
    let mut profiler = BeamProfiler::new(ProfilerSettings::default()).unwrap();

    let summary = run_session(&mut camera, &mut profiler, &mut screen, 5).unwrap();

    assert_eq!(summary.delivered, 5);
    assert_eq!(summary.skipped, 5);
    assert_eq!(summary.analyzed, 0);
    assert!(summary.estimates.is_empty());
    assert!(screen.hud.is_empty());
    assert!(screen.overlay.ellipse.is_empty());
}

#[test]
fn test_bad_frames_are_dropped_and_session_continues() {
    init_logging();
    let mut sensor = FlakySensor { calls: 0 };
    let mut screen = Screen::new();
    let mut profiler = active_profiler(&mut screen);

    let summary = run_session(&mut sensor, &mut profiler, &mut screen, 6).unwrap();

    assert_eq!(summary.delivered, 6);
    assert_eq!(summary.analyzed, 3);
    assert_eq!(summary.dropped, 3);
    for estimate in &summary.estimates {
        assert_abs_diff_eq!(estimate.centroid_x, 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.centroid_y, 8.0, epsilon = 1e-9);
    }
    // Last frame was dropped, so the display still shows the previous one
    assert_eq!(screen.overlay.centroid, Some((8.0, 8.0)));
}

#[test]
fn test_source_failure_ends_session() {
    init_logging();
    let mut sensor = ShortSensor { remaining: 2 };
    let mut screen = Screen::new();
    let mut profiler = active_profiler(&mut screen);

    let result = run_session(&mut sensor, &mut profiler, &mut screen, 5);
    assert!(matches!(result, Err(SourceError::InvalidConfig(_))));
}

#[test]
fn test_image_file_session() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("beam.png");

    let mut img = GrayImage::new(48, 32);
    for y in 10..15 {
        for x in 20..25 {
            img.put_pixel(x, y, Luma([200]));
        }
    }
    img.save(&path).unwrap();

    let mut source = ImageFileSource::open(&path).unwrap();
    assert!(source.id_string().contains("beam.png"));

    let mut screen = Screen::new();
    let mut profiler = active_profiler(&mut screen);
    let summary = run_session(&mut source, &mut profiler, &mut screen, 3).unwrap();

    assert_eq!(summary.analyzed, 3);
    let estimate = summary.estimates[0];
    assert_abs_diff_eq!(estimate.centroid_x, 22.0, epsilon = 1e-9);
    assert_abs_diff_eq!(estimate.centroid_y, 12.0, epsilon = 1e-9);
    assert_eq!(estimate.baseline, 0.0);
    assert_eq!(summary.estimates[0], summary.estimates[2]);
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use nalgebra::Point2;
use nframes::{
    classify::Classifier,
    config::{FailurePolicy, FrameStyle, Settings, WindowSettings},
    dispatch::Dispatcher,
    error::Error,
    loader::parse_records,
    planner::{compute_window, plan_frames},
    render::FrameRenderer,
    shared::ViewWindow,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Fresh scratch directory under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nbody-frames-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn settings_for(dir: &Path, csv: &str, workers: usize) -> Settings {
    let input = dir.join("positions.csv");
    fs::write(&input, csv).unwrap();
    Settings {
        input,
        output_dir: dir.join("frames"),
        style: FrameStyle {
            size: 64,
            ..FrameStyle::default()
        },
        workers,
        ..Settings::default()
    }
}

fn frame_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Six bodies per step: ids 0, 2 and 4 are the black holes.
fn six_body_csv(steps: &[u64]) -> String {
    let layout = [
        (2.0, 1.0),
        (0.0, 0.0),
        (2.0, 2.0),
        (4.0, 0.0),
        (1.0, 2.0),
        (2.0, 4.0),
    ];
    let mut csv = String::new();
    for &step in steps {
        for (id, (x, y)) in layout.iter().enumerate() {
            let shift = step as f64 * 0.1;
            csv.push_str(&format!("{},{},{},{},1.0e30\n", step, id, x + shift, y - shift));
        }
    }
    csv
}

#[test]
fn two_steps_six_bodies() {
    let dir = scratch("two-steps");
    let settings = settings_for(&dir, &six_body_csv(&[0, 1]), 2);

    let report = nframes::run(&settings).unwrap();

    assert_eq!(
        frame_names(&settings.output_dir),
        vec!["frame_00000.png", "frame_00001.png"]
    );
    assert!(report.failed.is_empty());
    assert_eq!(report.rendered.len(), 2);
    for frame in &report.rendered {
        assert_eq!(frame.ordinary_drawn, 3);
        assert_eq!(frame.distinguished_drawn, 3);
        let image = image::open(&frame.path).unwrap();
        assert_eq!((image.width(), image.height()), (64, 64));
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn infinite_row_is_dropped() {
    let dir = scratch("infinite");
    let mut csv = six_body_csv(&[0]);
    csv.push_str("3,1,inf,0.5\n");
    csv.push_str("4,1,1.0,1.0\n4,3,-inf,1.0\n");
    let settings = settings_for(&dir, &csv, 1);

    let dataset = parse_records(csv.as_bytes(), ',').unwrap();
    assert_eq!(dataset.dropped(), 2);
    let classifier = Classifier::positional(6);
    let tasks = plan_frames(&dataset, &classifier, &WindowSettings::default());
    let steps: Vec<u64> = tasks.iter().map(|t| t.step).collect();
    // step 3 lost its only row and produces no frame
    assert_eq!(steps, vec![0, 4]);
    assert_eq!(tasks[1].ordinary.len(), 1);

    nframes::run(&settings).unwrap();
    assert_eq!(
        frame_names(&settings.output_dir),
        vec!["frame_00000.png", "frame_00004.png"]
    );
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn only_black_holes_get_fallback_window() {
    let csv = "7,0,10.0,10.0\n7,2,-5.0,3.0\n8,5,1.0,1.0\n";
    let dataset = parse_records(csv.as_bytes(), ',').unwrap();
    let tasks = plan_frames(&dataset, &Classifier::positional(6), &WindowSettings::default());
    assert_eq!(tasks[0].step, 7);
    assert_eq!(tasks[0].window, ViewWindow::FALLBACK);
    assert_ne!(tasks[1].window, ViewWindow::FALLBACK);
}

#[test]
fn window_ignores_row_order() {
    let mut points: Vec<Point2<f64>> = (0..500)
        .map(|i| {
            let t = i as f64 * 0.37;
            Point2::new(t.sin() * 1.0e18 + 5.0e18, (t * 1.3).cos() * 3.0e17)
        })
        .collect();
    let settings = WindowSettings::default();
    let expected = compute_window(&points, &settings);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        points.shuffle(&mut rng);
        assert_eq!(compute_window(&points, &settings), expected);
    }
}

#[test]
fn worker_count_does_not_change_output() {
    let steps: Vec<u64> = (0..12).collect();
    let csv = six_body_csv(&steps);

    let single = scratch("single-worker");
    let many = scratch("many-workers");
    let one = settings_for(&single, &csv, 1);
    let four = settings_for(&many, &csv, 4);
    nframes::run(&one).unwrap();
    nframes::run(&four).unwrap();

    let names = frame_names(&one.output_dir);
    assert_eq!(names.len(), 12);
    assert_eq!(names, frame_names(&four.output_dir));
    for name in &names {
        let a = fs::read(one.output_dir.join(name)).unwrap();
        let b = fs::read(four.output_dir.join(name)).unwrap();
        assert_eq!(a, b, "{name} differs");
    }
    fs::remove_dir_all(&single).unwrap();
    fs::remove_dir_all(&many).unwrap();
}

#[test]
fn existing_output_dir_is_reused() {
    let dir = scratch("reuse");
    let settings = settings_for(&dir, &six_body_csv(&[0]), 1);
    nframes::run(&settings).unwrap();
    nframes::run(&settings).unwrap();
    assert_eq!(frame_names(&settings.output_dir), vec!["frame_00000.png"]);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_input_is_rejected() {
    let dir = scratch("empty");
    let settings = settings_for(&dir, "0,0,inf,inf\n\n", 1);
    assert!(matches!(nframes::run(&settings), Err(Error::EmptyDataset)));
    assert!(!settings.output_dir.exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_is_a_load_error() {
    let dir = scratch("missing");
    let settings = Settings {
        input: dir.join("nope.csv"),
        output_dir: dir.join("frames"),
        ..Settings::default()
    };
    assert!(matches!(nframes::run(&settings), Err(Error::Load(_))));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unwritable_frames_fail() {
    let dir = scratch("unwritable");
    let csv = six_body_csv(&[0, 1, 2]);
    let dataset = parse_records(csv.as_bytes(), ',').unwrap();
    let tasks = plan_frames(&dataset, &Classifier::positional(6), &WindowSettings::default());

    let out = dir.join("frames");
    fs::create_dir_all(&out).unwrap();
    // a directory squatting on the frame path makes that one write fail
    fs::create_dir_all(out.join("frame_00001.png")).unwrap();
    let renderer = FrameRenderer::new(&out, FrameStyle::default(), image::ImageFormat::Png);

    let err = Dispatcher::new(2, FailurePolicy::Abort)
        .dispatch(tasks.clone(), &renderer)
        .unwrap_err();
    assert!(matches!(err, Error::Render(ref e) if e.step == 1));

    let report = Dispatcher::new(2, FailurePolicy::KeepGoing)
        .dispatch(tasks, &renderer)
        .unwrap();
    let rendered: Vec<u64> = report.rendered.iter().map(|f| f.step).collect();
    assert_eq!(rendered, vec![0, 2]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].step, 1);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn explicit_black_hole_ids() {
    let dir = scratch("explicit");
    let mut settings = settings_for(&dir, &six_body_csv(&[0]), 1);
    settings.distinguished_ids = Some(vec![2]);
    let report = nframes::run(&settings).unwrap();
    assert_eq!(report.rendered[0].distinguished_drawn, 1);
    assert_eq!(report.rendered[0].ordinary_drawn, 5);
    fs::remove_dir_all(&dir).unwrap();
}

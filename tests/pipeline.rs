use std::fs::File;
use std::path::{Path, PathBuf};

use scope_fit::app::pipeline::{compute, run_analysis, run_analysis_to};
use scope_fit::data::{SynthSpec, generate_capture, write_capture};
use scope_fit::domain::{AnalysisConfig, ModelKind, Window};
use scope_fit::error::{EXIT_DATA, EXIT_INPUT, EXIT_RENDER};
use scope_fit::fit::FitError;
use scope_fit::plot::svg::render_svg_string;

fn write_synthetic(dir: &Path, spec: &SynthSpec) -> PathBuf {
    let path = dir.join("capture.csv");
    let series = generate_capture(spec).unwrap();
    write_capture(File::create(&path).unwrap(), &series).unwrap();
    path
}

/// Default windows and Lorentzian guess; a Gaussian guess near the bump,
/// since the fixed default guess targets a different time scale.
fn config_for(csv: PathBuf, spec: &SynthSpec) -> AnalysisConfig {
    let [a, x0, sigma] = spec.gauss_params();
    AnalysisConfig {
        csv_path: csv,
        gauss_guess: [0.9 * a, x0 + 10.0 * spec.dt, 1.5 * sigma],
        show: false,
        ..AnalysisConfig::default()
    }
}

#[test]
fn synthetic_capture_peaks_are_recovered() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SynthSpec::default();
    let config = config_for(write_synthetic(dir.path(), &spec), &spec);

    let out = compute(&config).unwrap();
    assert_eq!(out.series.len(), 2500);
    assert_eq!(out.error_bars.points.len(), 10);

    let gauss = out.gauss.outcome.as_ref().unwrap();
    let [a, x0, sigma] = spec.gauss_params();
    assert!((gauss.params[0] - a).abs() < 0.05 * a, "gauss={:?}", gauss.params);
    assert!((gauss.params[1] - x0).abs() < spec.dt, "gauss={:?}", gauss.params);
    assert!((gauss.params[2] - sigma).abs() < 0.1 * sigma, "gauss={:?}", gauss.params);
    assert!(gauss.std_errors.iter().all(|e| e.is_finite() && *e > 0.0));

    let lorentz = out.lorentz.outcome.as_ref().unwrap();
    let [a, x0, f] = spec.lorentz_params();
    assert!((lorentz.params[0] - a).abs() < 0.1 * a, "lorentz={:?}", lorentz.params);
    assert!((lorentz.params[1] - x0).abs() < 1e-4, "lorentz={:?}", lorentz.params);
    assert!((lorentz.params[2] - f).abs() < 0.1 * f, "lorentz={:?}", lorentz.params);
}

#[test]
fn failed_gaussian_does_not_block_lorentzian() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SynthSpec::default();
    let config = AnalysisConfig {
        gauss_window: Window::new(980, 981).unwrap(),
        ..config_for(write_synthetic(dir.path(), &spec), &spec)
    };

    let out = compute(&config).unwrap();
    assert_eq!(
        out.gauss.outcome,
        Err(FitError::TooFewPoints { points: 1, params: 3 })
    );
    assert!(out.gauss.chart().is_none());
    assert!(out.gauss.report().contains("fit failed: "));

    let lorentz = out.lorentz.outcome.as_ref().unwrap();
    assert_eq!(lorentz.model, ModelKind::Lorentzian);
    assert!(out.lorentz.chart().is_some());
}

#[test]
fn lorentz_window_is_baseline_corrected() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SynthSpec::default();
    let config = config_for(write_synthetic(dir.path(), &spec), &spec);

    let out = compute(&config).unwrap();
    let min = out.series.voltage().iter().copied().fold(f64::INFINITY, f64::min);
    let raw = &out.series.voltage()[2000..2500];
    for (corrected, raw) in out.lorentz.voltage.iter().zip(raw) {
        assert_eq!(*corrected, raw - min);
    }
}

#[test]
fn run_writes_figures_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SynthSpec::default();
    let figures = dir.path().join("figures");
    let report = dir.path().join("report.json");
    let config = AnalysisConfig {
        save_dir: Some(figures.clone()),
        export: Some(report.clone()),
        ..config_for(write_synthetic(dir.path(), &spec), &spec)
    };

    run_analysis(&config).unwrap();

    for name in ["figure1_overview.svg", "figure2_gauss.svg", "figure3_lorentz.svg"] {
        assert!(figures.join(name).is_file(), "missing {name}");
    }
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(json["rows"], 2500);
    assert_eq!(json["fits"].as_array().unwrap().len(), 2);
    assert_eq!(json["fits"][1]["model"], "lorentzian");
}

#[test]
fn figure_failure_still_reports_both_fits() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SynthSpec::default();
    let figures = dir.path().join("figures");
    let report = dir.path().join("report.json");
    // A directory where the Gaussian SVG should go makes that save fail.
    std::fs::create_dir_all(figures.join("figure2_gauss.svg")).unwrap();
    let config = AnalysisConfig {
        save_dir: Some(figures.clone()),
        export: Some(report.clone()),
        ..config_for(write_synthetic(dir.path(), &spec), &spec)
    };

    let mut console = Vec::new();
    let err = run_analysis_to(&config, &mut console).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_RENDER);

    let console = String::from_utf8(console).unwrap();
    assert!(console.contains("=== Gaussian fit ==="), "{console}");
    assert!(console.contains("=== Lorentzian fit ==="), "{console}");
    assert!(report.is_file());
    assert!(figures.join("figure1_overview.svg").is_file());
}

#[test]
fn overview_renders_both_axis_passes() {
    let dir = tempfile::tempdir().unwrap();
    let spec = SynthSpec::default();
    let config = config_for(write_synthetic(dir.path(), &spec), &spec);
    let out = compute(&config).unwrap();

    let svg = render_svg_string(&out.overview(&config).unwrap()).unwrap();
    let titles = svg
        .split(['<', '>'])
        .filter(|node| node.trim() == "Voltage vs. Time")
        .count();
    assert_eq!(titles, 2);
}

#[test]
fn error_taxonomy() {
    let dir = tempfile::tempdir().unwrap();

    let missing = AnalysisConfig {
        csv_path: dir.path().join("nope.csv"),
        show: false,
        ..AnalysisConfig::default()
    };
    assert_eq!(compute(&missing).unwrap_err().exit_code(), EXIT_INPUT);

    let header = dir.path().join("header.csv");
    std::fs::write(&header, "idx,a,b,time,voltage\n0,0,0,0.0,0.1\n").unwrap();
    let err = compute(&AnalysisConfig {
        csv_path: header,
        show: false,
        ..AnalysisConfig::default()
    })
    .unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert!(err.message().contains("line 1"), "{err}");

    let short = SynthSpec {
        rows: 1500,
        ..SynthSpec::default()
    };
    let err = compute(&AnalysisConfig {
        csv_path: write_synthetic(dir.path(), &short),
        show: false,
        ..AnalysisConfig::default()
    })
    .unwrap_err();
    assert_eq!(err.exit_code(), EXIT_DATA);
    assert!(err.message().contains("2000:2500"), "{err}");
}

//! End-to-end output of the qubit rotation program

use approx::assert_abs_diff_eq;
use qrot_core::format_array;
use qrot_demo::{run, DemoConfig};
use qrot_optim::OptimizationConfig;

fn output(config: &DemoConfig) -> String {
    let mut out = Vec::new();
    run(config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_line_layout() {
    let text = output(&DemoConfig::default());
    let lines: Vec<&str> = text.lines().collect();

    // value, grad, grad pair, initial cost, 20 progress lines, angles
    assert_eq!(lines.len(), 25);
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("Cost after step")).count(),
        20
    );
    assert!(lines[24].starts_with("Optimized rotation angles: "));
}

#[test]
fn test_printed_values() {
    let text = output(&DemoConfig::default());
    let lines: Vec<&str> = text.lines().collect();

    let value: f64 = lines[0].parse().unwrap();
    assert_abs_diff_eq!(value, 0.54_f64.cos() * 0.12_f64.cos(), epsilon = 1e-12);

    assert_eq!(lines[1], "[-0.51043865, -0.10267820]");
    assert_eq!(lines[2], "(-0.51043865, -0.10267820)");

    let initial: f64 = lines[3].parse().unwrap();
    assert_abs_diff_eq!(initial, 0.011_f64.cos() * 0.012_f64.cos(), epsilon = 1e-12);
}

#[test]
fn test_progress_lines() {
    let text = output(&DemoConfig::default());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[4], "Cost after step     5:  0.9961778");
    assert_eq!(lines[5], "Cost after step    10:  0.8974944");
    assert_eq!(lines[6], "Cost after step    15:  0.1440490");
    assert_eq!(lines[7], "Cost after step    20: -0.1536720");
    assert_eq!(lines[8], "Cost after step    25: -0.9152496");
    assert_eq!(lines[23], "Cost after step   100: -1.0000000");
}

#[test]
fn test_optimized_angles() {
    let text = output(&DemoConfig::default());
    let last = text.lines().last().unwrap();

    let values: Vec<f64> = last
        .trim_start_matches("Optimized rotation angles: [")
        .trim_end_matches(']')
        .split(", ")
        .map(|v| v.parse().unwrap())
        .collect();

    assert_eq!(values.len(), 2);
    assert_abs_diff_eq!(values[0], 0.0, epsilon = 1e-8);
    assert_abs_diff_eq!(values[1], std::f64::consts::PI, epsilon = 1e-8);
}

#[test]
fn test_leftover_angle_in_scientific_notation() {
    let mut out = Vec::new();
    let report = run(&DemoConfig::default(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let last = text.lines().last().unwrap();

    let params = &report.result.final_params;
    assert_eq!(
        last,
        format!("Optimized rotation angles: {}", format_array(params, 8))
    );

    // Residual first angle vanishes but is not exactly zero
    if params[0] != 0.0 && params[0].abs() < 1e-4 {
        assert!(last.ends_with("3.14159265e+00]"), "{}", last);
        assert!(!last.contains("0.00000000"), "{}", last);
    }
}

#[test]
fn test_repeatable() {
    assert_eq!(output(&DemoConfig::default()), output(&DemoConfig::default()));
}

#[test]
fn test_seeded_shots_repeatable() {
    let config = DemoConfig::default()
        .with_device("default.qubit")
        .with_shots(1000)
        .with_seed(2024)
        .with_optimization(OptimizationConfig::tutorial().with_steps(20));

    let first = output(&config);
    assert_eq!(first, output(&config));
    assert_eq!(first.lines().count(), 4 + 4 + 1);
}

#[test]
fn test_report_interval() {
    let config = DemoConfig::default()
        .with_optimization(OptimizationConfig::tutorial().with_report_every(10));
    let text = output(&config);

    assert_eq!(
        text.lines().filter(|l| l.starts_with("Cost after step")).count(),
        10
    );
}

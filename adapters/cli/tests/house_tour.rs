use std::process::Command;

fn snow_day() -> Command {
    Command::new(env!("CARGO_BIN_EXE_snow-day"))
}

#[test]
fn json_report_describes_a_finished_tour() {
    let output = snow_day()
        .args(["--seed", "11", "--json"])
        .output()
        .expect("failed to launch snow-day");
    assert!(output.status.success(), "snow-day exited with {}", output.status);

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a json report");
    assert_eq!(report["seed"], 11);
    assert_eq!(report["tally"]["defeats"], 2);
    assert_eq!(report["tally"]["victories"], 1);
    assert_eq!(report["snapshot"]["phase"], "Title");
    assert_eq!(report["snapshot"]["defeated_count"], 2);
}

#[test]
fn text_mode_prints_frames_and_a_summary() {
    let output = snow_day()
        .args(["--seed", "3", "--show-every", "300"])
        .output()
        .expect("failed to launch snow-day");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    assert!(stdout.contains("Rho & Rhaki's Crazy Adventure!"));
    assert!(stdout.contains("Room: "));
    assert!(stdout.contains("SNOW DAY VICTORY!"));
    assert!(stdout.contains("2 of 2 parents defeated, 1 victories"));
}

#[test]
fn broken_scripts_are_reported() {
    let dir = std::env::temp_dir().join(format!("snow-day-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("broken.script");
    std::fs::write(&path, "confirm\n4 rho.jump\n").expect("write script");

    let output = snow_day()
        .arg("--script")
        .arg(&path)
        .output()
        .expect("failed to launch snow-day");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2: unknown control `jump`"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

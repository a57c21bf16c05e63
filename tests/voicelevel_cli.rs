use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn voicelevel_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_voicelevel").expect("voicelevel test binary not built")
}

#[test]
fn voicelevel_help_mentions_name() {
    let output = Command::new(voicelevel_bin())
        .arg("--help")
        .output()
        .expect("run voicelevel --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("VoiceLevel"));
}

#[test]
fn voicelevel_list_input_devices_prints_message() {
    let output = Command::new(voicelevel_bin())
        .arg("--list-input-devices")
        .output()
        .expect("run voicelevel --list-input-devices");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("audio input devices")
            || combined.contains("Failed to list audio input devices")
    );
}

#[test]
fn voicelevel_rejects_invalid_thresholds() {
    let output = Command::new(voicelevel_bin())
        .args(["--level2-threshold", "0.0001", "--seconds", "1"])
        .output()
        .expect("run voicelevel with bad thresholds");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("strictly ascending"));
}

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stegpass"));
    cmd.env_remove("STEGPASS_PASSWORD").env_remove("STEGPASS_LOG");
    cmd
}

fn cover(path: &Path, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5) as u8, (y * 11) as u8, ((x ^ y) * 3) as u8])
    })
    .save(path)
    .unwrap();
}

#[test]
fn encode_and_decode_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("secret.png");
    cover(&input, 32, 32);

    bin()
        .env("STEGPASS_PASSWORD", "pw")
        .arg("encode")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-m")
        .arg("attack at dawn")
        .assert()
        .success()
        .stdout(predicate::str::contains("Message successfully encoded"));

    assert!(output.exists());

    bin()
        .env("STEGPASS_PASSWORD", "pw")
        .arg("decode")
        .arg("--image")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Decoded message: attack at dawn"));
}

#[test]
fn wrong_password_fails_without_revealing_message() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("secret.png");
    cover(&input, 32, 32);

    bin()
        .env("STEGPASS_PASSWORD", "correct")
        .args(["encode", "-m", "the plans are in the vault"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    bin()
        .env("STEGPASS_PASSWORD", "wrong")
        .arg("decode")
        .arg("-i")
        .arg(&output)
        .assert()
        .failure()
        .stdout(predicate::str::contains("the plans are in the vault").not())
        .stderr(predicate::str::contains("Incorrect password most likely"));
}

#[test]
fn short_message_with_wrong_password_is_not_printed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("secret.png");
    cover(&input, 10, 10);

    bin()
        .env("STEGPASS_PASSWORD", "pw")
        .args(["encode", "-m", "hi"])
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    bin()
        .env("STEGPASS_PASSWORD", "xx")
        .arg("decode")
        .arg("-i")
        .arg(&output)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Decoded message").not())
        .stderr(predicate::str::contains("Incorrect password most likely"));
}

#[test]
fn decode_plain_image_reports_no_message() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plain.png");
    RgbImage::new(16, 16).save(&input).unwrap();

    bin()
        .env("STEGPASS_PASSWORD", "pw")
        .arg("decode")
        .arg("-i")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No hidden message detected"));
}

#[test]
fn message_too_long_fails_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("secret.png");
    cover(&input, 4, 8);

    bin()
        .env("STEGPASS_PASSWORD", "pw")
        .arg("encode")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-m")
        .arg("far too long for a tiny image")
        .assert()
        .failure()
        .stderr(predicate::str::contains("message too long"));

    assert!(!output.exists());
}

#[test]
fn unreadable_image_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"definitely not a png").unwrap();

    bin()
        .env("STEGPASS_PASSWORD", "pw")
        .arg("decode")
        .arg("-i")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read image"));
}

#[test]
fn message_and_password_from_stdin() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    let output = dir.path().join("secret.png");
    cover(&input, 32, 32);

    bin()
        .arg("encode")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .write_stdin("piped message\npiped pw\n")
        .assert()
        .success();

    bin()
        .arg("decode")
        .arg("-i")
        .arg(&output)
        .write_stdin("piped pw\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Decoded message: piped message"));
}

#[test]
fn missing_password_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    cover(&input, 8, 8);

    bin()
        .arg("decode")
        .arg("-i")
        .arg(&input)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No password provided"));
}

#[test]
fn capacity_prints_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    cover(&input, 10, 10);

    let out = bin()
        .arg("capacity")
        .arg("-i")
        .arg(&input)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let info: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(info["width"], 10);
    assert_eq!(info["max_payload_bytes"], 28);
}

#[test]
fn capacity_prints_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cover.png");
    cover(&input, 10, 10);

    bin()
        .arg("capacity")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Max message     : 28 bytes"));
}

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Exit codes are truncated to a byte on unix.
fn code(status: i32) -> i32 {
    if cfg!(unix) { status & 0xff } else { status }
}

/// A script written to the temp directory, removed when dropped.
struct ScriptFile(PathBuf);

impl ScriptFile {
    fn arg(&self) -> &str {
        self.0.to_str().unwrap()
    }
}

impl Drop for ScriptFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

fn script_file(name: &str, contents: &[u8]) -> ScriptFile {
    let path = std::env::temp_dir().join(format!("tapeworm-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    ScriptFile(path)
}

fn tapeworm(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tapeworm"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_runs_script_file() {
    let path = script_file("hello.b", b"++++++++[>+++++++++<-]>.\n");
    let out = tapeworm(&[path.arg()], b"");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"H");
}

#[test]
fn test_echoes_stdin() {
    let path = script_file("cat.b", b",[.,]");
    let out = tapeworm(&[path.arg(), "--eof", "zero"], b"abc");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"abc");
}

#[test]
fn test_engine_error_becomes_exit_code() {
    let path = script_file("bad.b", b"+.@");
    let out = tapeworm(&[path.arg()], b"");
    assert_eq!(out.status.code(), Some(code(-4)));
    assert_eq!(out.stdout, vec![1]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("Illegal character: '@'"));
}

#[test]
fn test_unmatched_bracket_exit_code() {
    let path = script_file("open.b", b"[+");
    let out = tapeworm(&[path.arg()], b"");
    assert_eq!(out.status.code(), Some(code(-2)));
}

#[test]
fn test_no_arguments_is_usage_error() {
    let out = tapeworm(&[], b"");
    assert_eq!(out.status.code(), Some(code(-1)));
    assert!(!out.stderr.is_empty());
}

#[test]
fn test_two_arguments_is_usage_error() {
    let out = tapeworm(&["a.b", "b.b"], b"");
    assert_eq!(out.status.code(), Some(code(-1)));
}

#[test]
fn test_missing_file() {
    let out = tapeworm(&["/nonexistent/tapeworm/script.b"], b"");
    assert_eq!(out.status.code(), Some(code(-7)));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to open file"));
}

#[test]
fn test_eof_unchanged_flag() {
    let path = script_file("eof.b", b"+++,.");
    let out = tapeworm(&[path.arg(), "--eof", "unchanged"], b"");
    assert!(out.status.success());
    assert_eq!(out.stdout, vec![3]);
}

#[test]
fn test_default_eof_stores_max_byte() {
    let path = script_file("eof-default.b", b",.");
    let out = tapeworm(&[path.arg()], b"");
    assert!(out.status.success());
    assert_eq!(out.stdout, vec![255]);
}

#[test]
fn test_deeply_nested_script_runs() {
    const DEPTH: usize = 200_000;
    let mut script = vec![b'+'];
    script.extend(std::iter::repeat_n(b'[', DEPTH));
    script.push(b'-');
    script.extend(std::iter::repeat_n(b']', DEPTH));
    script.push(b'.');
    let path = script_file("deep.b", &script);
    let out = tapeworm(&[path.arg()], b"");
    assert!(out.status.success());
    assert_eq!(out.stdout, vec![0]);
}

#[test]
fn test_script_file_removed_on_drop() {
    let path = script_file("gone.b", b"+").0.clone();
    assert!(!path.exists());
}

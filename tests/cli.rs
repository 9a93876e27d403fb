//! The `hce` binary, driven through files in a scratch directory.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn hce() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hce"))
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hce-cli-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

// =============================================================================
// generate
// =============================================================================

#[test]
fn generate_writes_edgelist_and_position_files() {
    let dir = scratch("generate");
    let prefix = dir.join("rgg");

    let out = hce()
        .args(["generate", "80", "6", "--seed", "3"])
        .arg(&prefix)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let edges = fs::read_to_string(dir.join("rgg_edgelist.txt")).unwrap();
    let positions = fs::read_to_string(dir.join("rgg_position.txt")).unwrap();
    assert!(edges.lines().count() > 0);
    assert_eq!(positions.lines().count(), 80);
    for line in positions.lines() {
        assert_eq!(line.split_whitespace().count(), 3, "line {:?}", line);
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn generate_rejects_bad_degree() {
    let dir = scratch("bad-degree");
    let out = hce()
        .args(["generate", "10", "0"])
        .arg(dir.join("x"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("error:"));
    fs::remove_dir_all(&dir).unwrap();
}

// =============================================================================
// embed
// =============================================================================

#[test]
fn embed_generated_graph_to_file() {
    let dir = scratch("embed");
    let prefix = dir.join("rgg");
    let status = hce()
        .args(["generate", "60", "5", "--seed", "8"])
        .arg(&prefix)
        .status()
        .unwrap();
    assert!(status.success());

    let coords = dir.join("coords.txt");
    let out = hce()
        .arg("embed")
        .arg(dir.join("rgg_edgelist.txt"))
        .args(["-w", "ra1", "-a", "CA", "--reducer", "mds", "--fallback-angle", "0"])
        .arg("-o")
        .arg(&coords)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = fs::read_to_string(&coords).unwrap();
    let rows: Vec<Vec<&str>> = text.lines().map(|l| l.split_whitespace().collect()).collect();
    assert!(!rows.is_empty());
    for row in &rows {
        assert_eq!(row.len(), 3);
        let x: f64 = row[1].parse().unwrap();
        let y: f64 = row[2].parse().unwrap();
        assert!(x.is_finite() && y.is_finite());
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn embed_unknown_scheme_fails() {
    let dir = scratch("unknown-scheme");
    let input = dir.join("ring.txt");
    fs::write(&input, "0 1\n1 2\n2 3\n3 0\n").unwrap();
    let out = hce()
        .arg("embed")
        .arg(&input)
        .args(["-w", "RA9"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("RA9"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn embed_missing_file_fails() {
    let out = hce()
        .args(["embed", "/nonexistent/hce/edges.txt"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("i/o error"));
}

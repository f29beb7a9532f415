#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

pub fn hypergraph_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("hypergraphs")
        .join(name)
}

/// per process so parallel test binaries do not clash
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hgpart-{}-{name}", std::process::id()))
}

pub fn hgpart(args: &[&str]) -> Output {
    let out = Command::new(env!("CARGO_BIN_EXE_hgpart"))
        .args(args)
        .output()
        .expect("failed to run hgpart");
    if !out.status.success() {
        eprintln!("{}", String::from_utf8_lossy(&out.stderr));
    }
    out
}

pub fn read_parts(path: &PathBuf) -> Vec<i32> {
    std::fs::read_to_string(path)
        .expect("partition file")
        .lines()
        .map(|l| l.trim().parse().expect("part id"))
        .collect()
}

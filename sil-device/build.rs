//! Build script para embutir a revisão do código no banner de informações
//!
//! Usa `git rev-parse --short HEAD` quando disponível; caso contrário, `unknown`.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SIL_DEVICE_REVISION");

    // Revisão explícita tem prioridade (builds reprodutíveis/empacotamento)
    let revision = env::var("SIL_DEVICE_REVISION")
        .ok()
        .filter(|rev| !rev.trim().is_empty())
        .or_else(git_revision)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=SIL_DEVICE_REVISION={}", revision.trim());
}

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8(output.stdout).ok()
}

//! Workspace maintenance and developer workflow commands (`cargo xtask`).
//!
//! The `xtask` binary wraps the web toolchain and verification commands so
//! the repository exposes stable entrypoints regardless of local setup.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

const SITE_CARGO_FEATURE: &str = "csr";

fn main() -> ExitCode {
    let root = workspace_root();
    let mut args = env::args().skip(1);

    let Some(cmd) = args.next() else {
        print_usage();
        return ExitCode::from(2);
    };

    let rest: Vec<String> = args.collect();

    let result = match cmd.as_str() {
        "setup-web" => setup_web(&root),
        "dev" => dev(&root, rest),
        "build-web" => build_web(&root, rest),
        "check-web" => check_web(&root),
        "verify" => verify(&root),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown xtask command: {other}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask lives under workspace root")
        .to_path_buf()
}

fn site_dir(root: &Path) -> PathBuf {
    root.join("crates").join("site")
}

fn print_usage() {
    eprintln!(
        "Usage: cargo xtask <command> [args]\n\
         \n\
         Commands:\n\
           setup-web           Install wasm target and trunk (if missing)\n\
           dev [trunk args]    Start the trunk dev server in the foreground\n\
           build-web [args]    Build the static web bundle with trunk\n\
           check-web           Run site compile checks (CSR native + wasm)\n\
           verify              fmt check, clippy, tests, and web checks\n"
    );
}

fn setup_web(root: &Path) -> Result<(), String> {
    run(
        root,
        "rustup",
        vec!["target", "add", "wasm32-unknown-unknown"],
    )?;

    if command_available("trunk") {
        println!("trunk already installed");
        return Ok(());
    }

    run(root, "cargo", vec!["install", "trunk"])
}

fn dev(root: &Path, args: Vec<String>) -> Result<(), String> {
    ensure_command(
        "trunk",
        "Install it with `cargo xtask setup-web` (or `cargo install trunk`)",
    )?;
    let mut trunk_args = vec!["serve".to_string(), "--open".to_string()];
    trunk_args.extend(args);
    run_in(&site_dir(root), "trunk", trunk_args)
}

fn build_web(root: &Path, args: Vec<String>) -> Result<(), String> {
    ensure_command(
        "trunk",
        "Install it with `cargo xtask setup-web` (or `cargo install trunk`)",
    )?;
    let mut trunk_args = vec!["build".to_string(), "--release".to_string()];
    trunk_args.extend(args);
    run_in(&site_dir(root), "trunk", trunk_args)
}

fn check_web(root: &Path) -> Result<(), String> {
    run(
        root,
        "cargo",
        vec![
            "check",
            "-p",
            "site",
            "--features",
            SITE_CARGO_FEATURE,
        ],
    )?;
    run(
        root,
        "cargo",
        vec![
            "check",
            "-p",
            "site",
            "--features",
            SITE_CARGO_FEATURE,
            "--target",
            "wasm32-unknown-unknown",
        ],
    )
}

fn verify(root: &Path) -> Result<(), String> {
    run(root, "cargo", vec!["fmt", "--all", "--check"])?;
    run(
        root,
        "cargo",
        vec![
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    run(root, "cargo", vec!["test", "--workspace"])?;
    check_web(root)
}

fn command_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn ensure_command(program: &str, hint: &str) -> Result<(), String> {
    if command_available(program) {
        Ok(())
    } else {
        Err(format!("`{program}` is not available. {hint}"))
    }
}

fn run(root: &Path, program: &str, args: Vec<&str>) -> Result<(), String> {
    let args: Vec<String> = args.into_iter().map(str::to_string).collect();
    run_in(root, program, args)
}

fn run_in(dir: &Path, program: &str, args: Vec<String>) -> Result<(), String> {
    let pretty = format!("{program} {}", args.join(" "));
    println!("+ {pretty}");
    let status = Command::new(program)
        .args(&args)
        .current_dir(dir)
        .status()
        .map_err(|err| format!("failed to spawn `{pretty}`: {err}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`{pretty}` exited with {status}"))
    }
}

use std::{env, fs, path::PathBuf};

use clap_complete::shells::{Bash, Fish, PowerShell, Zsh};

include!("src/completions.rs");

const BIN: &str = "clipmark";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/completions.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");
    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = command();
    clap_complete::generate_to(Bash, &mut cmd, BIN, &completions_dir).unwrap();
    clap_complete::generate_to(Zsh, &mut cmd, BIN, &completions_dir).unwrap();
    clap_complete::generate_to(Fish, &mut cmd, BIN, &completions_dir).unwrap();
    clap_complete::generate_to(PowerShell, &mut cmd, BIN, &completions_dir).unwrap();
}

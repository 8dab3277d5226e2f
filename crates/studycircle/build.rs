use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;

// Pulls in the clap definitions alone; the handlers need crates that are
// not build-dependencies.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("create man directory");

    write_man_pages(cli::Cli::command(), &man_dir);
}

/// One page per visible command, named `studycircle-<sub>-<sub>.1`.
fn write_man_pages(root: clap::Command, man_dir: &Path) {
    let mut pending = vec![root];
    while let Some(cmd) = pending.pop() {
        let page_name = cmd.get_name().to_owned();

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd.clone())
            .render(&mut page)
            .unwrap_or_else(|e| panic!("render {page_name}.1: {e}"));
        let target = man_dir.join(format!("{page_name}.1"));
        fs::write(&target, page).unwrap_or_else(|e| panic!("write {}: {e}", target.display()));

        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{page_name}-{}", sub.get_name()))),
        );
    }
}

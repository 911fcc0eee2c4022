//! Build script for generating the `ukfast` man pages.
//!
//! Renders `ukfast.1` plus one `ukfast-<group>.1` page per product
//! subcommand into the build output directory.

use std::env;
use std::io::Write;

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

use cli::Cli;

fn render(command: clap::Command) -> Result<Vec<u8>, std::io::Error> {
    let mut buffer = Vec::new();
    Man::new(command).render(&mut buffer)?;
    Ok(buffer)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cargo:rerun-if-changed=build.rs")?;
    writeln!(stdout, "cargo:rerun-if-changed=src/cli/mod.rs")?;

    let out_dir = Utf8PathBuf::from(env::var("OUT_DIR")?);
    let dir = Dir::open_ambient_dir(&out_dir, ambient_authority())?;

    let root = Cli::command();
    dir.write("ukfast.1", render(root.clone())?)?;
    for group in root.get_subcommands() {
        let name = format!("ukfast-{}", group.get_name());
        let page = group.clone().display_name(name.clone());
        dir.write(format!("{name}.1"), render(page)?)?;
    }

    Ok(())
}

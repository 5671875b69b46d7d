//! Shell completion support for fuzzy-finder
//!
//! Completions are static: subcommands, flags and the shell names accepted by
//! `completions <SHELL>`. Preference keys for `--set` are not completed.

use clap::Command;
use clap_complete::Shell;
use std::io::Write;

/// Generate static shell completions into `buf`
pub fn generate_static<W: Write>(shell: Shell, cmd: &mut Command, buf: &mut W) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, buf);
}

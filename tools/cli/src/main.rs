//! MonoVault CLI - Interactive shell over an encrypted container.
//!
//! Prompts for a password, creates the container file if it does not
//! exist or mounts it otherwise, then runs a small shell over the
//! in-memory file table. Every mutating command persists the encrypted
//! region before returning.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use monovault_common::{Error, FileEntry};
use monovault_container::{join_path, parent_path, MountedContainer, DEFAULT_VAULT_FILE};

#[derive(Parser)]
#[command(name = "monovault")]
#[command(about = "MonoVault - password-protected single-file vault")]
#[command(version)]
struct Cli {
    /// Path to the container file.
    #[arg(short = 'f', long, default_value = DEFAULT_VAULT_FILE)]
    vault: PathBuf,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut container = open_container(&cli.vault)?;
    shell(&mut container)
}

/// Prompt for a password securely.
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// One stable message per mount failure stage. The header gives no way
/// to tell a wrong password from corruption, and with a full-size header
/// slot even a wrong password sails past the header check and fails at
/// the region stage (the garbage offset almost always points past EOF).
/// Raw errors carry those garbage offsets, so they never reach the user.
fn mount_failure_message(err: &Error) -> &'static str {
    match err {
        Error::WrongPasswordOrCorrupt => "Wrong password or corrupted vault.",
        _ => "Vault corrupted.",
    }
}

/// Create the container if absent, otherwise mount it, re-prompting on
/// failure.
fn open_container(path: &PathBuf) -> Result<MountedContainer> {
    loop {
        if !path.exists() {
            println!("No vault found at {}, creating a new one.", path.display());
            let password = prompt_password("Enter new password: ")?;
            let confirm = prompt_password("Confirm password: ")?;
            if password != confirm {
                println!("Passwords do not match.");
                continue;
            }

            match MountedContainer::create(path, &password) {
                Ok(container) => {
                    println!("Vault created. Mounted.\n");
                    return Ok(container);
                }
                Err(e) => {
                    println!("Failed to create vault: {}", e);
                    continue;
                }
            }
        }

        let password = prompt_password("Enter password: ")?;
        match MountedContainer::mount(path, &password) {
            Ok(container) => {
                println!("Vault mounted.\n");
                return Ok(container);
            }
            Err(e) => {
                println!("{}", mount_failure_message(&e));
                continue;
            }
        }
    }
}

/// Resolve a command argument against the current directory.
fn resolve(container: &MountedContainer, name: &str) -> String {
    if name == "/" {
        return "/".to_string();
    }
    if name == ".." {
        return parent_path(container.current_path())
            .unwrap_or("/")
            .to_string();
    }
    if let Some(stripped) = name.strip_prefix('/') {
        let mut path = String::from("/");
        for comp in stripped.split('/').filter(|c| !c.is_empty()) {
            path = join_path(&path, comp);
        }
        return path;
    }
    join_path(container.current_path(), name)
}

fn print_listing(entries: &[&FileEntry]) {
    for entry in entries {
        println!("{}\t({})", entry.name, entry.entry_type);
    }
}

fn print_tree(container: &MountedContainer, path: &str, level: usize) {
    let Ok(children) = container.list(path) else {
        return;
    };
    for child in children {
        println!("{}{}\t({})", "  ".repeat(level), child.name, child.entry_type);
        if child.is_directory() {
            print_tree(container, &child.path, level + 1);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  ls [dir]            list directory contents");
    println!("  cd <dir>            change directory (/, .. or name)");
    println!("  pwd                 print current directory");
    println!("  mkdir <name>        create a directory");
    println!("  rmdir <name>        remove a directory");
    println!("  touch <name>        create an empty file");
    println!("  write <name> <txt>  replace file contents");
    println!("  append <name> <txt> append to file contents");
    println!("  cat <name>          print file contents");
    println!("  rm <name>           remove a file");
    println!("  tree                print the full tree");
    println!("  info                show vault info");
    println!("  help                show this help");
    println!("  exit                quit");
}

/// One command dispatch. Errors are printed, never fatal to the shell.
fn dispatch(container: &mut MountedContainer, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(true);
    };
    let arg = parts.next();
    let rest = parts.collect::<Vec<_>>().join(" ");

    let outcome = match (cmd, arg) {
        ("exit" | "quit", _) => return Ok(false),
        ("help", _) => {
            print_help();
            Ok(())
        }
        ("pwd", _) => {
            println!("{}", container.current_path());
            Ok(())
        }
        ("ls", arg) => {
            let path = arg
                .map(|a| resolve(container, a))
                .unwrap_or_else(|| container.current_path().to_string());
            container.list(&path).map(|entries| print_listing(&entries))
        }
        ("tree", _) => {
            print_tree(container, "/", 0);
            Ok(())
        }
        ("info", _) => {
            let sb = container.superblock();
            println!("Vault: {}", container.path().display());
            println!("  fs_id: {}", container.fs_id());
            println!("  region offset: {}", container.volume_offset());
            println!(
                "  blocks: {} total, {} free",
                sb.total_blocks, sb.free_blocks
            );
            println!("  live entries: {}", container.table().live_count());
            Ok(())
        }
        ("cd", Some(name)) => {
            let path = resolve(container, name);
            container.change_dir(&path)
        }
        ("mkdir", Some(name)) => {
            let path = resolve(container, name);
            container.create_directory(&path)
        }
        ("rmdir" | "rm", Some(name)) => {
            let path = resolve(container, name);
            container.remove(&path)
        }
        ("touch", Some(name)) => {
            let path = resolve(container, name);
            container.create_file(&path)
        }
        ("write", Some(name)) => {
            let path = resolve(container, name);
            container.write_file(&path, &rest)
        }
        ("append", Some(name)) => {
            let path = resolve(container, name);
            container.append_file(&path, &rest)
        }
        ("cat", Some(name)) => {
            let path = resolve(container, name);
            container.read_file(&path).map(|content| {
                println!("{}", content);
            })
        }
        _ => {
            println!("Unknown command. Type 'help' for a list.");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        println!("{}", e);
    }
    Ok(true)
}

/// Interactive command loop.
fn shell(container: &mut MountedContainer) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} > ", container.current_path());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        if !dispatch(container, &line?)? {
            break;
        }
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "zsr", version = "1.0.0", about = "Single-file, read-optimized archive format")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a .zsr archive from a directory tree
    Create { src_dir: PathBuf, out_file: PathBuf },

    /// Extract an archive's contents, or a single inner file
    Extract {
        archive: PathBuf,
        /// Destination directory for a whole-archive extract, or the
        /// output file path when `inner_path` is given
        dest: PathBuf,
        /// When given, extract only this inner path to `dest` as a file
        inner_path: Option<String>,
    },

    /// Extract a subtree of the archive into a destination directory
    ExtractDir {
        archive: PathBuf,
        inner_path: String,
        dest_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let result = match Cli::parse().command {
        Commands::Create { src_dir, out_file } => zsr::create(&src_dir, &out_file).map_err(Into::into),
        Commands::Extract { archive, dest, inner_path } => match inner_path {
            Some(path) => extract_single(&archive, &dest, &path),
            None => extract_all(&archive, &dest),
        },
        Commands::ExtractDir { archive, inner_path, dest_dir } => {
            extract_dir(&archive, &inner_path, &dest_dir)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn extract_all(archive: &Path, dest: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = zsr::ZsrReader::open(archive)?;
    reader.extract_all(dest)?;
    Ok(())
}

fn extract_single(
    archive: &Path,
    out_file: &Path,
    inner_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = zsr::ZsrReader::open(archive)?;
    let data = reader.get_file(inner_path)?;
    std::fs::write(out_file, data)?;
    Ok(())
}

fn extract_dir(
    archive: &Path,
    inner_path: &str,
    dest_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = zsr::ZsrReader::open(archive)?;
    reader.extract_subtree(inner_path, dest_dir)?;
    Ok(())
}

//! Command dispatch: one function per subcommand

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{parse_batch, DecodeService};
use crate::cli::args::{Cli, Commands, ConfigCommands, SequenceArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{local_config_path, ConfigSources, OutputFormat, Settings};
use crate::domain::{encode, DecoderKind, Edge, LabeledTree, PrueferSequence, TreeArena};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    execute_command_with(cli, &ConfigSources::system())
}

/// Runs `cli` with settings read from `sources` instead of the system locations.
pub fn execute_command_with(cli: &Cli, sources: &ConfigSources) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| CliError::io("current directory", e))?,
    };

    match &cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => execute_config(command, sources, &config_dir),
        command => {
            let settings = Settings::load_from(sources, Some(&config_dir))?;
            debug!("settings: {:?}", settings);
            match command {
                Commands::Decode {
                    input,
                    algorithm,
                    format,
                    root,
                    verify,
                } => cmd_decode(
                    input,
                    algorithm.unwrap_or(settings.algorithm),
                    format.unwrap_or(settings.format),
                    root.unwrap_or(settings.root),
                    *verify || settings.verify,
                ),
                Commands::Check { input } => cmd_check(input),
                Commands::Encode { edges } => cmd_encode(edges),
                Commands::Batch { file, algorithm } => {
                    cmd_batch(file, algorithm.unwrap_or(settings.algorithm))
                }
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

/// Formats `tree` for stdout.
pub fn render(tree: &LabeledTree, format: OutputFormat, root: usize) -> CliResult<String> {
    let text = match format {
        OutputFormat::Edges => tree.to_string(),
        OutputFormat::Tree => TreeArena::from_tree(tree, root)?
            .to_tree_string()
            .to_string()
            .trim_end()
            .to_string(),
        OutputFormat::Plain => tree
            .edges()
            .iter()
            .map(|e| format!("{} {}", e.low(), e.high()))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(text)
}

#[instrument]
fn cmd_decode(
    input: &SequenceArgs,
    algorithm: DecoderKind,
    format: OutputFormat,
    root: usize,
    verify: bool,
) -> CliResult<()> {
    let sequence = input.to_sequence()?;
    let service = DecodeService::new(algorithm);
    let tree = service.decode(&sequence)?;
    output::info(&render(&tree, format, root)?);

    if verify {
        let check = service.cross_check(&sequence)?;
        if !check.passed() {
            return Err(CliError::Verification(format!(
                "{}: {} vs {}",
                sequence, check.degree_counting, check.exclusion_set
            )));
        }
        output::success(&format!("{} verified", sequence));
    }
    Ok(())
}

#[instrument]
fn cmd_check(input: &SequenceArgs) -> CliResult<()> {
    let sequence = input.to_sequence()?;
    let check = DecodeService::default().cross_check(&sequence)?;

    output::header(&format!("{} (n = {})", sequence, sequence.vertex_count()));
    output::action(DecoderKind::DegreeCounting.as_str(), &check.degree_counting);
    output::action(DecoderKind::ExclusionSet.as_str(), &check.exclusion_set);

    let results = [
        ("decoders agree", check.agree()),
        ("spanning tree", check.valid()),
        ("encodes back to input", check.round_trips()),
    ];
    for (label, ok) in results {
        if ok {
            output::success(label);
        } else {
            output::failure(label);
        }
    }

    if check.passed() {
        Ok(())
    } else {
        Err(CliError::Verification(sequence.to_string()))
    }
}

#[instrument]
fn cmd_encode(edges: &[String]) -> CliResult<()> {
    if edges.is_empty() {
        return Err(CliError::InvalidArgs("at least one edge is required".into()));
    }
    let edges = edges
        .iter()
        .map(|e| e.parse::<Edge>())
        .collect::<Result<Vec<_>, _>>()?;
    let tree = LabeledTree::from_edges(edges.len() + 1, edges);
    let sequence = encode(&tree)?;
    output::info(&sequence);
    Ok(())
}

#[instrument]
fn cmd_batch(file: &Path, algorithm: DecoderKind) -> CliResult<()> {
    let text = if file == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::io("read stdin", e))?;
        text
    } else {
        std::fs::read_to_string(file)
            .map_err(|e| CliError::io(format!("read {}", file.display()), e))?
    };

    let entries = parse_batch(&text)?;
    let sequences: Vec<PrueferSequence> = entries.iter().map(|e| e.sequence.clone()).collect();
    let results = DecodeService::new(algorithm).decode_batch(&sequences);

    let mut failed = 0;
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(tree) => output::info(&format!("{} -> {}", entry.sequence, tree)),
            Err(e) => {
                failed += 1;
                output::error(&format!("line {}: {}", entry.line, e));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Verification(format!(
            "{} of {} sequences failed",
            failed,
            entries.len()
        )));
    }
    Ok(())
}

fn execute_config(
    command: &ConfigCommands,
    sources: &ConfigSources,
    config_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load_from(sources, Some(config_dir))?;
            output::info(&settings.to_toml()?.trim_end());
            Ok(())
        }
        ConfigCommands::Path => {
            let local = local_config_path(config_dir);
            match &sources.global {
                Some(global) => print_path("global", global),
                None => output::warning("no global config directory on this platform"),
            }
            print_path("local", &local);
            Ok(())
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                sources.global.clone().ok_or_else(|| {
                    CliError::InvalidArgs("no global config directory on this platform".into())
                })?
            } else {
                local_config_path(config_dir)
            };
            init_config(&path, *force)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn print_path(label: &str, path: &Path) {
    let state = if path.exists() { "" } else { " (missing)" };
    output::action(label, &format!("{}{}", path.display(), state));
}

/// Writes the config template to `path`, creating parent directories.
pub fn init_config(path: &Path, force: bool) -> CliResult<PathBuf> {
    if path.exists() && !force {
        return Err(CliError::InvalidArgs(format!(
            "{} exists, use --force to overwrite",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, Settings::template()).map_err(|source| CliError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LabeledTree {
        LabeledTree::from_edges(4, [(1, 2), (2, 3), (2, 4)])
    }

    #[test]
    fn test_render_edges() {
        assert_eq!(
            render(&sample(), OutputFormat::Edges, 1).unwrap(),
            "{(1, 2), (2, 3), (2, 4)}"
        );
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(
            render(&sample(), OutputFormat::Plain, 1).unwrap(),
            "1 2\n2 3\n2 4"
        );
    }

    #[test]
    fn test_render_tree_invalid_root() {
        let err = render(&sample(), OutputFormat::Tree, 9).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested").join(".pruefer.toml");
        init_config(&path, false).unwrap();
        assert!(path.exists());
        assert!(init_config(&path, false).is_err());
        assert!(init_config(&path, true).is_ok());
        assert_eq!(Settings::load_file(&path).unwrap(), Settings::default());
    }
}

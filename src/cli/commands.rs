//! Command dispatch: one handler per subcommand

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::block::check_size;
use crate::application::services::ForestInput;
use crate::application::{
    json, render, ApplicationError, JsonResultExt, NoCounts, ReferenceCounter, StaticCounts, TotalPolicy,
};
use crate::application::error_ext::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{serialize, Forest, OutlineParser, TreeNodeConvert};
use crate::infrastructure::{InfraError, ServiceContainer};

/// Load settings for a command line: global, local (`--config` or
/// `./.reftree.toml`) and environment.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let local = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(CliError::InvalidArgs(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => path.clone(),
        None => local_config_path(Path::new(".")),
    };
    Ok(Settings::load(Some(&local))?)
}

/// Execute the selected subcommand.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Parse { input } => cmd_parse(container, input),
        Commands::Build { input, branch } => cmd_build(container, input, *branch),
        Commands::Outline { input } => cmd_outline(container, input),
        Commands::Tree { input } => cmd_tree(container, input),
        Commands::Flatten { input } => cmd_flatten(container, input),
        Commands::Render {
            input,
            counts,
            expanded,
            total,
        } => cmd_render(container, input, counts.as_deref(), *expanded, *total),
        Commands::Hydrate { file } => cmd_hydrate(container, file),
        Commands::Edit { file } => cmd_edit(container, file),
        Commands::Config { command } => cmd_config(container, cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Read a named file, or stdin for `-`.
fn read_input(container: &ServiceContainer, input: &Path) -> CliResult<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| InfraError::io("read stdin", e))?;
        return Ok(text);
    }
    Ok(container
        .fs
        .read_to_string(input)
        .with_path_context("read input", input)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T, what: &str) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).with_json_context(what)?;
    output::info(&json);
    Ok(())
}

fn read_forest(container: &ServiceContainer, input: &Path) -> CliResult<ForestInput> {
    let text = read_input(container, input)?;
    let parsed = container.block_service().forest_from_text(&text)?;
    output::outline_warnings(&parsed.warnings);
    Ok(parsed)
}

#[instrument(level = "debug", skip(container))]
fn cmd_parse(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let text = read_input(container, input)?;
    check_size(&text, container.settings.block.max_lines)?;
    let parsed = OutlineParser::new().parse(&text);
    output::outline_warnings(&parsed.warnings);
    print_json(&parsed.entries, "entries")
}

#[instrument(level = "debug", skip(container))]
fn cmd_build(container: &ServiceContainer, input: &Path, branch: bool) -> CliResult<()> {
    let text = read_input(container, input)?;
    let service = container.block_service();
    let service = if branch { service.with_branch(true) } else { service };
    let (forest, warnings) = service.build_outline(&text)?;
    output::outline_warnings(&warnings);
    debug!(roots = forest.root_count(), nodes = forest.node_count(), "built");
    print_json(&forest, "forest")
}

#[instrument(level = "debug", skip(container))]
fn cmd_outline(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let text = read_input(container, input)?;
    let forest: Forest = json::from_str(&text, "forest")?;
    output::info(&serialize(&forest));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let forest = read_forest(container, input)?.forest;
    for tree in forest.to_tree_string() {
        print!("{tree}");
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_flatten(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let forest = read_forest(container, input)?.forest;
    print_json(&forest.flatten(), "flattened forest")
}

#[instrument(level = "debug", skip(container))]
fn cmd_render(
    container: &ServiceContainer,
    input: &Path,
    counts: Option<&Path>,
    expanded: bool,
    total: Option<TotalPolicy>,
) -> CliResult<()> {
    let input = read_forest(container, input)?;

    let counter: Box<dyn ReferenceCounter> = match counts {
        Some(path) => {
            let text = read_input(container, path)?;
            Box::new(StaticCounts::from_json(&text)?)
        }
        None => Box::new(NoCounts),
    };
    let options = container
        .settings
        .render_options(counts.is_some(), expanded.then_some(true).or(input.expanded), total);

    let rendered = render(&input.forest, counter.as_ref(), options);
    print_json(&rendered, "rendered tree")
}

#[instrument(level = "debug", skip(container))]
fn cmd_hydrate(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let hydrated = container.block_service().hydrate_file(file)?;
    output::outline_warnings(&hydrated.warnings);
    let nodes = hydrated.data.forest().map(Forest::node_count).unwrap_or(0);
    output::action("Hydrated", &format!("{} ({} nodes)", file.display(), nodes));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_edit(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let hydrated = container.block_service().edit(file)?;
    output::outline_warnings(&hydrated.warnings);
    output::action("Saved", &file.display());
    Ok(())
}

fn cmd_config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            output::header("Config files");
            let global = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".into(),
            })?;
            output::detail(&format!("global: {}", describe(&global)));
            let local = cli
                .config
                .clone()
                .unwrap_or_else(|| local_config_path(Path::new(".")));
            output::detail(&format!("local:  {}", describe(&local)));
        }
    }
    Ok(())
}

fn describe(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

//! Command dispatch

use std::io;
use std::sync::Arc;

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::application::services::{ClickOutcome, Session};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, Page, PathCommands};
use crate::cli::output;
use crate::cli::tree_view::FrameConvert;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DecisionTree, Mode, NodeId, RecommendationView, RenderFrame, TraversalPath};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::navigator::PrintNavigator;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { page }) => cmd_show(cli, *page),
        Some(Commands::Walk { no_open }) => cmd_walk(cli, *no_open),
        Some(Commands::Click { ids, no_open }) => cmd_click(cli, ids, *no_open),
        Some(Commands::Replay { ids, json }) => cmd_replay(cli, ids, *json),
        Some(Commands::Path { command }) => cmd_path(cli, command),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn container(cli: &Cli, no_open: bool) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.data_dir.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);
    Ok(if no_open {
        container.with_navigator(Arc::new(PrintNavigator))
    } else {
        container
    })
}

fn print_frame(frame: &RenderFrame) {
    output::info(&frame.to_tree_string());
}

fn report_outcome(outcome: &ClickOutcome) {
    match outcome {
        ClickOutcome::Toggled { node, expanded } => {
            let state = if *expanded { "expanded" } else { "collapsed" };
            output::action("Toggled", &format!("[{node}] {state}"));
        }
        ClickOutcome::Navigated { url, path } => {
            output::success(&format!("Recorded path {path}"));
            output::action("Destination", url);
        }
    }
}

#[instrument(skip(cli))]
fn cmd_show(cli: &Cli, page: Page) -> CliResult<()> {
    let container = container(cli, true)?;
    let session = container.guide_service().open(page.into())?;
    print_frame(&session.frame(None));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_walk(cli: &Cli, no_open: bool) -> CliResult<()> {
    let container = container(cli, no_open)?;
    let mut session = container.guide_service().open(Mode::Entry)?;
    let mut focus = None;

    loop {
        let items = session.frame(focus).to_selection_items();
        let selected = container
            .selector
            .select_one(&items, "click> ")
            .map_err(|message| InfraError::Selector { message })?;
        let Some(item) = selected else {
            output::warning("walk aborted, no path recorded");
            return Ok(());
        };
        let id = item.value.parse::<usize>().map_err(|e| InfraError::Selector {
            message: format!("unexpected selection {:?}: {e}", item.value),
        })?;

        let outcome = session.click(NodeId(id))?;
        report_outcome(&outcome);
        match outcome {
            ClickOutcome::Toggled { node, .. } => focus = Some(node),
            ClickOutcome::Navigated { .. } => return Ok(()),
        }
    }
}

#[instrument(skip(cli))]
fn cmd_click(cli: &Cli, ids: &[usize], no_open: bool) -> CliResult<()> {
    let container = container(cli, no_open)?;
    let mut session = container.guide_service().open(Mode::Entry)?;
    let mut focus = None;

    for (n, &id) in ids.iter().enumerate() {
        let outcome = session.click(NodeId(id))?;
        report_outcome(&outcome);
        match outcome {
            ClickOutcome::Toggled { node, .. } => focus = Some(node),
            ClickOutcome::Navigated { .. } => {
                if n + 1 < ids.len() {
                    warn!("click: page left, ignoring {} remaining clicks", ids.len() - n - 1);
                }
                return Ok(());
            }
        }
    }
    print_frame(&session.frame(focus));
    Ok(())
}

/// Replay page content, as emitted with `--json`.
#[derive(Serialize)]
struct ReplayReport<'a> {
    path: &'a TraversalPath,
    frame: RenderFrame,
    recommendations: Vec<RecommendationView>,
}

#[instrument(skip(cli))]
fn cmd_replay(cli: &Cli, ids: &[usize], json: bool) -> CliResult<()> {
    let container = container(cli, true)?;
    let mut session = container.guide_service().open(Mode::Replay)?;

    let mut focus = None;
    for &id in ids {
        match session.click(NodeId(id))? {
            ClickOutcome::Toggled { node, .. } => focus = Some(node),
            ClickOutcome::Navigated { url, .. } => {
                // replay clicks never navigate
                warn!("replay: unexpected navigation to {}", url);
            }
        }
    }

    if json {
        let report = ReplayReport {
            path: &session.replayed().path,
            frame: session.frame(focus),
            recommendations: session.recommendations(),
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize replay report".to_string(),
                source: Box::new(e),
            }
        })?;
        output::info(&text);
        return Ok(());
    }

    print_replay(&session, focus);
    Ok(())
}

fn print_replay(session: &Session, focus: Option<NodeId>) {
    if session.replayed().path.is_empty() {
        output::warning("no path recorded yet, walk the guide first");
    }
    print_frame(&session.frame(focus));

    let recommendations = session.recommendations();
    if recommendations.is_empty() {
        return;
    }
    output::info("");
    output::header("Based on your answers, here are some recommended actions:");
    for rec in &recommendations {
        output::info("");
        output::header(&rec.title);
        output::info(&rec.description);
        for action in rec.actions.iter().flatten() {
            output::bullet(action);
        }
        if let Some(summary) = &rec.summary {
            output::info(summary);
        }
        if let Some(link) = &rec.link {
            output::detail(link);
        }
    }
}

#[instrument(skip(cli))]
fn cmd_path(cli: &Cli, command: &PathCommands) -> CliResult<()> {
    let container = container(cli, true)?;
    match command {
        PathCommands::Show => match container.path_replayer().stored()? {
            Some(path) => {
                output::info(&path);
                match container.guide_service().open(Mode::Replay) {
                    Ok(session) => {
                        for line in describe_path(&path, session.tree()) {
                            match line {
                                Ok(text) => output::detail(&text),
                                Err(text) => output::failure(&text),
                            }
                        }
                    }
                    Err(e) => {
                        warn!("path show: cannot load tree: {}", e);
                        output::warning(&format!("cannot name path nodes: {e}"));
                    }
                }
            }
            None => output::warning("no path recorded"),
        },
        PathCommands::Clear => {
            container.path_recorder().clear()?;
            output::success("Recorded path cleared");
        }
    }
    Ok(())
}

/// One line per path id: `Ok` with the node name, `Err` for ids the tree lacks.
pub fn describe_path(path: &TraversalPath, tree: &DecisionTree) -> Vec<Result<String, String>> {
    path.ids()
        .iter()
        .map(|id| match tree.node_by_id(*id) {
            Some(node) => Ok(format!("[{}] {}", id, node.data)),
            None => Err(format!("[{id}] not in current tree")),
        })
        .collect()
}

#[instrument(skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.data_dir.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let settings = Settings::load(cli.data_dir.as_deref())?;
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::failure("no global config directory"),
            }
            output::action("Local", &local_config_path(&settings.data_dir).display());
            output::action("State", &settings.state_dir.display());
        }
    }
    Ok(())
}

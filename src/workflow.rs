use crate::api::{ApiClient, ListingBackend, decode_rows};
use crate::cli::{self, Resource};
use crate::config::ApiConfig;
use crate::model::{Image, Label, Selectable, SelectionMode, Skill, SkillSon, Video};
use crate::selector::{
    ImageSelector, LabelSelector, ResourceSelector, SelectorOptions, SkillSelector,
    SkillSonSelector, VideoSelector,
};
use crate::source::fetch_all_pages;
use crate::tui::{self, CommittedSelection, HostApp};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};
use tracing::{info, warn};

fn selection_mode(cli_args: &cli::Cli) -> SelectionMode {
    if cli_args.single {
        SelectionMode::Single
    } else {
        SelectionMode::Multiple
    }
}

// Ids the selector starts out with. Single mode keeps the first one only.
fn seed_ids(cli_args: &cli::Cli) -> Vec<i64> {
    let mut ids = cli_args.preselect.clone();
    if cli_args.single {
        ids.truncate(1);
    }
    ids
}

// Options whose confirm callback writes into the host's committed selection.
fn options_for<T: Selectable>(
    cli_args: &cli::Cli,
    committed: &Rc<RefCell<CommittedSelection>>,
) -> SelectorOptions<T> {
    let sink = Rc::clone(committed);
    SelectorOptions::new(move |ids, rows: Vec<T>| sink.borrow_mut().record(ids, rows))
        .mode(selection_mode(cli_args))
        .button_label(cli_args.button_label.clone())
        .title(cli_args.title.clone())
        .initial_selected_ids(seed_ids(cli_args))
}

fn build_selector(
    cli_args: &cli::Cli,
    config: &ApiConfig,
    backend: Arc<dyn ListingBackend>,
    runtime: Handle,
    committed: &Rc<RefCell<CommittedSelection>>,
) -> Box<dyn ResourceSelector> {
    match cli_args.resource {
        Resource::Images => Box::new(ImageSelector::new(
            options_for::<Image>(cli_args, committed),
            backend,
            runtime,
            config.page_size,
        )),
        Resource::Videos => Box::new(VideoSelector::new(
            options_for::<Video>(cli_args, committed),
            backend,
            runtime,
            config.page_size,
        )),
        Resource::Labels => Box::new(LabelSelector::new(
            options_for::<Label>(cli_args, committed),
            backend,
            runtime,
            config.page_size,
        )),
        Resource::Skills => Box::new(SkillSelector::new(
            options_for::<Skill>(cli_args, committed),
            backend,
            runtime,
        )),
        Resource::SkillSons => Box::new(SkillSonSelector::new(
            options_for::<SkillSon>(cli_args, committed),
            backend,
            runtime,
        )),
    }
}

// Handles interactive TUI mode. Returns the committed selection when the user
// accepted it, None when they backed out.
fn run_interactive_mode(
    cli_args: &cli::Cli,
    config: &ApiConfig,
    backend: Arc<dyn ListingBackend>,
    runtime: &Runtime,
) -> Result<Option<CommittedSelection>> {
    // Preselected ids count as committed before the dialog is ever opened.
    let committed = Rc::new(RefCell::new(CommittedSelection::seeded(seed_ids(cli_args))));
    let selector = build_selector(
        cli_args,
        config,
        backend,
        runtime.handle().clone(),
        &committed,
    );
    let app = HostApp::new(selector, Rc::clone(&committed), cli_args.resource.heading());

    if !tui::run_host(app)? {
        return Ok(None);
    }
    let selection = committed.borrow().clone();
    Ok(Some(selection))
}

/// Keep the rows whose id was asked for, in the order the ids were given.
/// Ids with no matching row are reported and dropped.
fn pick_preselected<T: Selectable>(rows: &[T], wanted: &[i64]) -> CommittedSelection {
    let mut picked_ids = Vec::new();
    let mut picked_rows = Vec::new();
    for id in wanted {
        if picked_ids.contains(id) {
            continue;
        }
        match rows.iter().find(|row| row.id() == *id) {
            Some(row) => {
                picked_ids.push(*id);
                picked_rows.push(row.clone());
            }
            None => warn!(id, "preselected id not found in listing"),
        }
    }
    let mut selection = CommittedSelection::default();
    selection.record(picked_ids, picked_rows);
    selection
}

async fn resolve_preselect<T: Selectable>(
    backend: &dyn ListingBackend,
    resource: Resource,
    page_size: usize,
    wanted: &[i64],
) -> Result<CommittedSelection> {
    let path = resource.path();
    let rows: Vec<T> = if resource.is_paginated() {
        fetch_all_pages(backend, path, page_size).await?
    } else {
        decode_rows(path, backend.list_all(path).await?)?
    };
    info!(resource = path, fetched = rows.len(), "resolving preselected ids");
    Ok(pick_preselected(&rows, wanted))
}

// Handles headless mode: resolves --preselect against the backend, no TUI.
async fn run_headless_mode(
    backend: &dyn ListingBackend,
    resource: Resource,
    page_size: usize,
    wanted: &[i64],
) -> Result<CommittedSelection> {
    match resource {
        Resource::Images => resolve_preselect::<Image>(backend, resource, page_size, wanted).await,
        Resource::Videos => resolve_preselect::<Video>(backend, resource, page_size, wanted).await,
        Resource::Labels => resolve_preselect::<Label>(backend, resource, page_size, wanted).await,
        Resource::Skills => resolve_preselect::<Skill>(backend, resource, page_size, wanted).await,
        Resource::SkillSons => {
            resolve_preselect::<SkillSon>(backend, resource, page_size, wanted).await
        }
    }
}

fn print_selection(selection: &CommittedSelection) -> Result<()> {
    let json = serde_json::to_string_pretty(selection).context("serializing selection")?;
    println!("{json}");
    Ok(())
}

// Main orchestrator for the portfolio-admin application logic.
pub fn run_admin(cli_args: cli::Cli) -> Result<()> {
    // Step 1: Validate the backend configuration and build the client.
    let config = ApiConfig::from_cli(&cli_args)?;
    let backend: Arc<dyn ListingBackend> = Arc::new(ApiClient::new(&config)?);
    info!(base_url = %config.base_url, resource = cli_args.resource.path(), "starting");

    // Step 2: Fetches run on a tokio runtime; the UI loop itself stays synchronous.
    let runtime = Runtime::new().context("starting async runtime")?;

    // Step 3: Dispatch to headless or interactive TUI mode.
    if cli_args.headless {
        let selection = runtime.block_on(run_headless_mode(
            backend.as_ref(),
            cli_args.resource,
            config.page_size,
            &seed_ids(&cli_args),
        ))?;
        return print_selection(&selection);
    }

    match run_interactive_mode(&cli_args, &config, backend, &runtime)? {
        Some(selection) => {
            info!(count = selection.ids.len(), "selection accepted");
            print_selection(&selection)
        }
        None => {
            // User cancellation is a graceful exit.
            info!("selection cancelled");
            Ok(())
        }
    }
}

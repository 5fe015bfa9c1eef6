//! sushisync-client CLI entry point.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sushisync::{
    CommitOptions, InMemoryTransport, MemoryLocation, Notification, SushiTransport, SyncConfig,
    SyncContext,
};
use sushisync_client::cli::sushi::{Commands, CreateArgs, ListArgs};
use sushisync_client::cli::{Cli, OutputFormat};
use sushisync_client::output::{format_output, json, pretty};
use sushisync_client::{prompt, OverlayRenderer, SushiClient};
use sushisync_core::cache::EntrySnapshot;
use sushisync_core::filters::FilterPatch;
use sushisync_core::overlay::{OverlayContent, OverlayKind, OverlayPayload};
use sushisync_core::sushi::{messages, ListView, Sushi, SushiData};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sushisync=info,sushisync_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let transport: Arc<dyn SushiTransport> = if cli.demo {
        Arc::new(InMemoryTransport::with_demo_data())
    } else {
        Arc::new(SushiClient::new(&cli.base_url, &cli.api_version))
    };
    let initial_location = match &cli.command {
        Commands::List(args) => args.initial_location(),
        _ => String::new(),
    };
    let context = SyncContext::new(
        SyncConfig::from_env(),
        transport,
        Arc::new(MemoryLocation::new(initial_location)),
    );
    let background = context.spawn_background();

    let format = cli.format;
    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::List(args) => list(&context, &args, format).await,
        Commands::Get { id } => get(&context, &id, format).await,
        Commands::Create(args) => create(&context, args, format, quiet).await,
        Commands::Delete { id, yes } => delete(&context, &id, yes, quiet).await,
    };

    context.shutdown();
    for handle in background {
        let _ = handle.await;
    }
    result
}

async fn list(context: &Arc<SyncContext>, args: &ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut observer = context.list_observer();
    let view = observer.settled().await.context("list subscription closed")?;
    print_view(&view, format);

    if !args.watch {
        if matches!(view, ListView::Error { .. }) {
            bail!(messages::LOAD_ERROR_TITLE);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(search) => context
                    .filters()
                    .commit(FilterPatch::search(search.trim()), CommitOptions::debounced()),
                None => {
                    stdin_open = false;
                    if is_idle(context, &observer.view()) {
                        break;
                    }
                }
            },
            view = observer.next() => match view {
                Some(view) => {
                    print_view(&view, format);
                    if !stdin_open && is_idle(context, &view) {
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

fn is_idle(context: &SyncContext, view: &ListView) -> bool {
    !context.filters().is_search_pending() && !view.is_loading()
}

async fn get(context: &SyncContext, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let sushi = load_detail(context, id).await?;
    print_sushi(&sushi, format);
    Ok(())
}

async fn create(
    context: &SyncContext,
    args: CreateArgs,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let overlays = context.overlays();
    overlays.open(
        OverlayKind::Sheet,
        OverlayPayload::new(messages::CREATE_SHEET_TITLE, OverlayContent::CreateSushiForm)
            .with_description(messages::CREATE_SHEET_DESCRIPTION),
    );
    if !quiet {
        render(OverlayKind::Sheet, context);
    }

    let request = tokio::task::spawn_blocking(move || prompt::create_request(args)).await??;

    let mut notifications = context.notifications();
    let outcome = context.create_sushi(request).await;
    report(&mut notifications, quiet);
    let created = outcome?;
    overlays.close(OverlayKind::Sheet);

    print_sushi(&created, format);
    Ok(())
}

async fn delete(context: &SyncContext, id: &str, yes: bool, quiet: bool) -> anyhow::Result<()> {
    let name = load_detail(context, id).await?.name;

    let overlays = context.overlays();
    overlays.open(
        OverlayKind::Dialog,
        OverlayPayload::new(
            messages::CONFIRM_DELETE_TITLE,
            OverlayContent::ConfirmDelete {
                id: id.to_string(),
                name: name.clone(),
            },
        ),
    );

    let confirmed = if yes {
        true
    } else {
        render(OverlayKind::Dialog, context);
        tokio::task::spawn_blocking(move || prompt::confirm_delete(&name)).await??
    };
    overlays.close(OverlayKind::Dialog);

    if !confirmed {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    let mut notifications = context.notifications();
    let outcome = context.delete_sushi(id).await;
    report(&mut notifications, quiet);
    outcome?;

    if !quiet {
        println!("Deleted sushi {}", id);
    }
    Ok(())
}

async fn load_detail(context: &SyncContext, id: &str) -> anyhow::Result<Sushi> {
    let mut subscription = context.watch_detail(id);
    let snapshot = subscription
        .wait_for(EntrySnapshot::is_settled)
        .await
        .context("detail subscription closed")?;

    if let Some(error) = snapshot.error {
        bail!(error);
    }
    snapshot
        .data
        .as_ref()
        .and_then(SushiData::as_detail)
        .cloned()
        .context("server returned no sushi")
}

fn render(kind: OverlayKind, context: &SyncContext) {
    let renderer = OverlayRenderer::new();
    if let Some(text) = renderer.render(&context.overlays().slot(kind)) {
        eprintln!("{}", text);
    }
}

fn report(notifications: &mut broadcast::Receiver<Notification>, quiet: bool) {
    while let Ok(notification) = notifications.try_recv() {
        if !quiet {
            eprintln!("{}", pretty::format_notification(&notification));
        }
    }
}

fn print_view(view: &ListView, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", json::format_view(view)),
        OutputFormat::Pretty => println!("{}", pretty::format_view(view)),
    }
}

fn print_sushi(sushi: &Sushi, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_output(sushi, format)),
        OutputFormat::Pretty => println!("{}", pretty::format_sushi(sushi)),
    }
}

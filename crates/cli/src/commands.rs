//! Subcommand implementations.

use std::path::Path;

use anyhow::{bail, Context};
use guestlist_db::{DbConfig, Mirror};
use guestlist_messaging::{
    BatchSummary, MessagingConfig, NotificationSender, StdinGate, WebDriverClient,
};
use guestlist_sheets::{DataPaths, GuestList, OutboundList, RecordSource};
use tokio_util::sync::CancellationToken;

/// Open (and thereby reconcile) the guest list.
pub fn reconcile(paths: &DataPaths) -> anyhow::Result<GuestList> {
    let path = paths.guest_list();
    let list = GuestList::load(&path)
        .with_context(|| format!("Failed to reconcile {}", path.display()))?;

    let report = list.report();
    println!(
        "{}: {} guests, {} ids generated, {} rows without last name dropped",
        path.display(),
        list.table().len(),
        report.generated_ids,
        report.dropped_rows,
    );
    if !report.duplicate_ids.is_empty() {
        println!("duplicate ids: {}", report.duplicate_ids.join(", "));
    }
    Ok(list)
}

/// Reconcile the guest list and rebuild the mirror table from it.
pub async fn sync(paths: &DataPaths, db: &DbConfig) -> anyhow::Result<()> {
    let list = reconcile(paths)?;

    let mut mirror = Mirror::connect(db)
        .await
        .context("Failed to connect to the mirror database")?;
    let result = mirror.create_from_table(&db.table, list.table()).await;
    let closed = mirror.close().await;

    let rows = result.with_context(|| format!("Failed to rebuild table {}", db.table))?;
    closed.context("Failed to close the mirror connection")?;
    println!("{} rows mirrored into {}", rows, db.table);
    Ok(())
}

/// Send invitations to the outbound list (or the guest list) and save the
/// delivery snapshot.
pub async fn notify(paths: &DataPaths, from_guests: bool, headless: bool) -> anyhow::Result<()> {
    let config = MessagingConfig::from_env()?;
    if from_guests {
        deliver(GuestList::load(&paths.guest_list())?, &config, headless).await
    } else {
        deliver(OutboundList::load(&paths.outbound())?, &config, headless).await
    }
}

async fn deliver<S: RecordSource>(
    mut source: S,
    config: &MessagingConfig,
    headless: bool,
) -> anyhow::Result<()> {
    let template = config.template()?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, remaining rows will not be sent");
            on_interrupt.cancel();
        }
    });

    let browser_args: &[&str] = if headless { &["--headless=new"] } else { &[] };
    let driver = WebDriverClient::start(
        &config.webdriver_url,
        WebDriverClient::chrome_capabilities(browser_args),
    )
    .await
    .with_context(|| format!("Failed to start a browser via {}", config.webdriver_url))?;

    let mut sender = NotificationSender::new(driver, StdinGate::default(), template, config, cancel);
    let summary = sender.run_batch(source.table_mut()).await?;
    let written = source.save()?;

    report(&summary, &written);
    Ok(())
}

fn report(summary: &BatchSummary, written: &Path) {
    println!(
        "{} sent, {} without phone, {} failed; statuses saved to {}",
        summary.sent,
        summary.no_phone,
        summary.failed,
        written.display()
    );
}

/// Print the mirrored record for `id` as JSON.
pub async fn lookup(db: &DbConfig, id: &str) -> anyhow::Result<()> {
    let mut mirror = Mirror::connect(db)
        .await
        .context("Failed to connect to the mirror database")?;
    let result = mirror.fetch_by_id(&db.table, id).await;
    let closed = mirror.close().await;

    let guest = result?;
    closed?;
    match guest {
        Some(guest) => {
            println!("{}", serde_json::to_string_pretty(&guest)?);
            Ok(())
        }
        None => bail!("No guest with id {id} in {}", db.table),
    }
}

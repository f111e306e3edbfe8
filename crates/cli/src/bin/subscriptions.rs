use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand};
use models::{BillingCadence, SubscriptionStatus};
use rust_decimal::Decimal;
use std::path::PathBuf;
use subscription_cli::{
    display::{render_subscription_row, render_summary},
    init_tracing,
};
use subscription_service::{
    JsonFileRepository, ListSummary, NewSubscription, SubscriptionChanges, SubscriptionFilter,
    SubscriptionRepository, SubscriptionService, is_all_label,
};

#[derive(Parser, Debug)]
#[command(name = "subscriptions", about = "List and manage tracked subscriptions.")]
struct Args {
    /// Path to the subscription snapshot; defaults to `snapshot_path` from settings
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Path to settings.json
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List subscriptions (default)
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        cadence: Option<String>,
        /// Only active subscriptions billing within the configured window
        #[arg(long, default_value_t = false)]
        upcoming: bool,
    },
    /// Add a subscription
    Add {
        /// Service name
        name: String,
        /// Cost per billing period
        cost: Decimal,
        /// Defaults to `default_category` from settings
        #[arg(long)]
        category: Option<String>,
        /// monthly, quarterly or yearly
        #[arg(long, default_value = "monthly")]
        cadence: String,
        /// Next billing date (YYYY-MM-DD), defaults to tomorrow
        #[arg(long)]
        next: Option<String>,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Edit fields of a subscription; omitted fields stay unchanged
    Edit {
        id: u32,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Change the status of a subscription (active, suspended, cancelled)
    SetStatus { id: u32, status: String },
    /// Delete a subscription
    Remove { id: u32 },
}

#[derive(ClapArgs, Debug)]
struct EditFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    cost: Option<Decimal>,
    #[arg(long)]
    cadence: Option<String>,
    /// Next billing date (YYYY-MM-DD)
    #[arg(long)]
    next: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    status: Option<String>,
}

fn parse_status(s: &str) -> Result<SubscriptionStatus> {
    SubscriptionStatus::from_label(s).ok_or_else(|| anyhow!("unknown status '{}'", s))
}

fn parse_cadence(s: &str) -> Result<BillingCadence> {
    match BillingCadence::from_label(s) {
        BillingCadence::Unrecognized => Err(anyhow!("unknown cadence '{}'", s)),
        known => Ok(known),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

fn build_changes(fields: EditFields) -> Result<SubscriptionChanges> {
    Ok(SubscriptionChanges {
        service_name: fields.name,
        category: fields.category,
        cost: fields.cost,
        cadence: fields.cadence.as_deref().map(parse_cadence).transpose()?,
        next_billing_date: fields.next.as_deref().map(parse_date).transpose()?,
        management_url: fields.url,
        notes: fields.notes,
        status: fields.status.as_deref().map(parse_status).transpose()?,
    })
}

fn build_filter(
    status: Option<String>,
    category: Option<String>,
    cadence: Option<String>,
) -> Result<SubscriptionFilter> {
    let status = match status.as_deref() {
        Some(s) if !is_all_label(s) => Some(parse_status(s)?),
        _ => None,
    };
    let cadence = match cadence.as_deref() {
        Some(c) if !is_all_label(c) => Some(parse_cadence(c)?),
        _ => None,
    };
    Ok(SubscriptionFilter {
        status,
        category: category.filter(|c| !is_all_label(c)),
        cadence,
    })
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = settings_loader::load_or_default(args.settings.as_ref())?;
    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| PathBuf::from(&settings.snapshot_path));
    let repo = JsonFileRepository::open(&snapshot_path)
        .with_context(|| format!("opening snapshot {}", snapshot_path.display()))?;
    let mut service = SubscriptionService::new(repo);

    let command = args.command.unwrap_or(Command::List {
        status: None,
        category: None,
        cadence: None,
        upcoming: false,
    });

    match command {
        Command::List {
            status,
            category,
            cadence,
            upcoming,
        } => {
            let filter = build_filter(status, category, cadence)?;
            let listed = if upcoming {
                let today = Local::now().date_naive();
                service
                    .upcoming(today, settings.upcoming_window_days)
                    .into_iter()
                    .filter(|s| filter.matches(s))
                    .collect()
            } else {
                service.filtered(&filter)
            };
            for sub in &listed {
                println!("{}", render_subscription_row(sub, &settings.currency));
            }
            println!("{}", render_summary(&ListSummary::of(&listed), &settings.currency));
        }
        Command::Add {
            name,
            cost,
            category,
            cadence,
            next,
            url,
            notes,
        } => {
            let draft = NewSubscription {
                service_name: name,
                category,
                cost,
                cadence: parse_cadence(&cadence)?,
                next_billing_date: next.as_deref().map(parse_date).transpose()?,
                management_url: url,
                notes,
            };
            let today = Local::now().date_naive();
            let id = service.create_subscription(draft, &settings.default_category, today)?;
            if let Some(added) = service.repository().get(id) {
                println!("Added {}", render_subscription_row(added, &settings.currency));
            }
        }
        Command::Edit { id, fields } => {
            let changes = build_changes(fields)?;
            if changes.is_empty() {
                return Err(anyhow!("nothing to change for subscription {}", id));
            }
            service.apply_changes(id, &changes)?;
            if let Some(edited) = service.repository().get(id) {
                println!("Updated {}", render_subscription_row(edited, &settings.currency));
            }
        }
        Command::SetStatus { id, status } => {
            let status = parse_status(&status)?;
            service.update_status(id, status)?;
            println!("Subscription {} is now {}", id, status);
        }
        Command::Remove { id } => {
            let removed = service.remove_subscription(id)?;
            println!("Removed subscription {} ({})", id, removed.service_name);
        }
    }
    Ok(())
}

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    DraftField, FormError, GuestApi, GuestListManager, HttpGuestApi, ManagerError, Selection,
    SubmitOutcome,
};
use shared::domain::{GuestCategory, GuestId, RsvpStatus, WeddingId};
use tracing::info;

mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "guestlist", about = "Manage the guest list of a wedding")]
struct Cli {
    #[arg(long, default_value = "guestlist.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    wedding_id: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show statistics and the (filtered) guest cards.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: Selection<RsvpStatus>,
        #[arg(long, default_value = "all")]
        category: Selection<GuestCategory>,
    },
    Add(GuestFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: GuestFields,
    },
    Rsvp {
        id: i64,
        status: RsvpStatus,
    },
    Delete {
        id: i64,
    },
}

/// Raw field input; parsed and validated by the guest form.
#[derive(Args, Debug, Default)]
struct GuestFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long = "status")]
    rsvp_status: Option<String>,
    #[arg(long)]
    plus_one: Option<String>,
    #[arg(long)]
    plus_one_name: Option<String>,
    #[arg(long)]
    additional_guests: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    side: Option<String>,
    #[arg(long)]
    dietary_restrictions: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl GuestFields {
    fn assignments(&self) -> Vec<(DraftField, &str)> {
        [
            (DraftField::Name, &self.name),
            (DraftField::Email, &self.email),
            (DraftField::Phone, &self.phone),
            (DraftField::RsvpStatus, &self.rsvp_status),
            (DraftField::PlusOne, &self.plus_one),
            (DraftField::PlusOneName, &self.plus_one_name),
            (DraftField::AdditionalGuests, &self.additional_guests),
            (DraftField::Category, &self.category),
            (DraftField::Side, &self.side),
            (DraftField::DietaryRestrictions, &self.dietary_restrictions),
            (DraftField::Address, &self.address),
            (DraftField::Notes, &self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(wedding_id) = cli.wedding_id {
        settings.wedding_id = wedding_id;
    }
    config::validate(&settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let api = HttpGuestApi::with_timeout(
        &settings.server_url,
        Duration::from_secs(settings.request_timeout_secs),
    )
    .context("failed to build guest api client")?;
    let wedding_id = WeddingId(settings.wedding_id);
    info!(server_url = %settings.server_url, %wedding_id, "guest list ready");
    let mut manager = GuestListManager::new(wedding_id, api);

    match cli.command {
        Command::List {
            search,
            status,
            category,
        } => {
            manager.set_search(search);
            manager.set_status_filter(status);
            manager.set_category_filter(category);
            let view = manager.view().await.context("failed to load guests")?;
            println!("{}", render::panel(&view, &client_core::EnglishCatalog::default()));
        }
        Command::Add(fields) => {
            ensure!(wedding_id.is_set(), "no wedding selected; pass --wedding-id");
            manager.open_create();
            save(&mut manager, &fields).await?;
        }
        Command::Edit { id, fields } => {
            ensure!(wedding_id.is_set(), "no wedding selected; pass --wedding-id");
            manager
                .open_edit(GuestId(id))
                .await
                .with_context(|| format!("failed to open guest {id}"))?;
            save(&mut manager, &fields).await?;
        }
        Command::Rsvp { id, status } => {
            let guest = manager
                .update_status(GuestId(id), status)
                .await
                .with_context(|| format!("failed to update rsvp for guest {id}"))?;
            println!("{} is now {}", guest.name, guest.rsvp_status);
        }
        Command::Delete { id } => {
            manager
                .delete(GuestId(id))
                .await
                .with_context(|| format!("failed to delete guest {id}"))?;
            println!("deleted guest {id}");
        }
    }

    Ok(())
}

async fn save<A: GuestApi>(manager: &mut GuestListManager<A>, fields: &GuestFields) -> Result<()> {
    let mut rejected = false;
    for (field, raw) in fields.assignments() {
        rejected |= manager.form_mut().set_field(field, raw).is_err();
    }
    if rejected {
        eprintln!("{}", render::field_errors(manager.form().errors()));
        bail!("guest was not saved");
    }

    match manager.submit().await {
        Ok(SubmitOutcome::Created(guest)) => {
            println!("added guest #{} {}", guest.id, guest.name);
            Ok(())
        }
        Ok(SubmitOutcome::Updated(guest)) => {
            println!("updated guest #{} {}", guest.id, guest.name);
            Ok(())
        }
        Err(ManagerError::Form(FormError::Validation(errors))) => {
            eprintln!("{}", render::field_errors(&errors));
            bail!("guest was not saved");
        }
        Err(err) => Err(err).context("guest was not saved"),
    }
}

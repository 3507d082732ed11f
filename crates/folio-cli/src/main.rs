// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Folio operator command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use folio_server_auth::{Actor, WikiId, WikiWithCollaborators};
use folio_server_config::{LogFormat, ServerConfig};
use folio_server_db::{create_pool, run_migrations, UserRepository, WikiRepository};
use folio_server_wiki::{MembershipService, WikiError, WikiService};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::SqlitePool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod seed;
mod version;

/// Folio - membership-gated wiki administration.
#[derive(Parser, Debug)]
#[command(name = "folio", about = "Folio wiki administration", version)]
struct Args {
	/// Config file to load instead of /etc/folio/server.toml
	#[arg(long, global = true, env = "FOLIO_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create or update the database schema
	Migrate,
	/// Fill the database with sample users and wikis
	Seed {
		#[arg(long, default_value_t = 10)]
		users: usize,
		#[arg(long, default_value_t = 50)]
		wikis: usize,
	},
	/// List the wikis a user can see
	List {
		/// Act as this user. Omit to list as a guest.
		#[arg(long = "as", value_name = "EMAIL")]
		as_user: Option<String>,
		/// Print JSON instead of a table
		#[arg(long)]
		json: bool,
	},
	/// Show one wiki if the user may view it
	Show {
		wiki_id: WikiId,
		#[arg(long = "as", value_name = "EMAIL")]
		as_user: Option<String>,
		#[arg(long)]
		json: bool,
	},
	/// Return a premium user to the standard role
	Downgrade { email: String },
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => folio_server_config::load_config_with_file(path)?,
		None => folio_server_config::load_config()?,
	};
	init_tracing(&config);

	tracing::debug!(database = %config.database.url, "starting folio");

	let pool = create_pool(&config.database.url)
		.await
		.with_context(|| format!("opening database {}", config.database.url))?;
	run_migrations(&pool).await?;

	match args.command {
		// Printed above without touching the database.
		Command::Version => {}
		Command::Migrate => {
			println!("Database schema is up to date.");
		}
		Command::Seed { users, wikis } => {
			let mut rng = StdRng::from_entropy();
			let summary = seed::seed(
				&UserRepository::new(pool.clone()),
				&WikiRepository::new(pool.clone()),
				users,
				wikis,
				&mut rng,
			)
			.await?;
			println!("Seed finished");
			println!("{} users created", summary.users_created);
			println!("{} wikis created", summary.wikis_created);
		}
		Command::List { as_user, json } => {
			let service = wiki_service(&pool);
			let actor = actor_for(&pool, &service, as_user.as_deref()).await?;
			let visible = service.index(&actor).await?;
			if json {
				println!("{}", serde_json::to_string_pretty(&visible)?);
			} else {
				print_table(&visible);
			}
		}
		Command::Show {
			wiki_id,
			as_user,
			json,
		} => {
			let service = wiki_service(&pool);
			let actor = actor_for(&pool, &service, as_user.as_deref()).await?;
			match service.show(&actor, wiki_id).await {
				Ok(wiki) if json => println!("{}", serde_json::to_string_pretty(&wiki)?),
				Ok(wiki) => print_wiki(&wiki),
				Err(WikiError::Denied) => bail!("{}", WikiError::Denied),
				Err(e) => return Err(e.into()),
			}
		}
		Command::Downgrade { email } => {
			let users = Arc::new(UserRepository::new(pool.clone()));
			let user = users
				.get_user_by_email(&email)
				.await?
				.with_context(|| format!("no user with email {email}"))?;
			let membership = MembershipService::new(users, config.membership.clone());
			let change = membership.downgrade(user.id).await?;
			if change.is_changed() {
				println!("{} is now {}", user.email, change.current());
			} else {
				println!("{} is {}; nothing to do", user.email, change.current());
			}
		}
	}

	Ok(())
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());

	match config.logging.format {
		LogFormat::Json => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
			.init(),
		LogFormat::Pretty => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init(),
	}
}

fn wiki_service(pool: &SqlitePool) -> WikiService {
	WikiService::new(
		Arc::new(WikiRepository::new(pool.clone())),
		Arc::new(UserRepository::new(pool.clone())),
	)
}

async fn actor_for(
	pool: &SqlitePool,
	service: &WikiService,
	email: Option<&str>,
) -> anyhow::Result<Actor> {
	let Some(email) = email else {
		return Ok(Actor::Anonymous);
	};

	let user = UserRepository::new(pool.clone())
		.get_user_by_email(email)
		.await?
		.with_context(|| format!("no user with email {email}"))?;
	Ok(service.resolve_actor(Some(user.id)).await?)
}

fn print_table(wikis: &[WikiWithCollaborators]) {
	if wikis.is_empty() {
		println!("No wikis.");
		return;
	}

	println!("{:<36}  {:<7}  {:>6}  TITLE", "ID", "PRIVATE", "COLLAB");
	for entry in wikis {
		println!(
			"{:<36}  {:<7}  {:>6}  {}",
			entry.wiki.id,
			if entry.wiki.private { "yes" } else { "no" },
			entry.collaborators.len(),
			entry.wiki.title
		);
	}
}

fn print_wiki(entry: &WikiWithCollaborators) {
	let wiki = &entry.wiki;
	println!("{}", wiki.title);
	println!("{}", "=".repeat(wiki.title.chars().count()));
	println!();
	println!("{}", wiki.body);
	println!();
	println!("id:      {}", wiki.id);
	println!("author:  {}", wiki.user_id);
	println!("private: {}", wiki.private);
	if !entry.collaborators.is_empty() {
		let ids: Vec<String> = entry.collaborators.iter().map(|id| id.to_string()).collect();
		println!("collaborators: {}", ids.join(", "));
	}
}

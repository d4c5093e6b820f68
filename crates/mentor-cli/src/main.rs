//! `mentor`: command-line client for the mentorship roster server.
//!
//! # Usage
//!
//! ```
//! mentor --url http://localhost:3000 list
//! mentor assign Moe Sally
//! mentor peers moe
//! ```

mod client;
mod resolve;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use mentor_core::person::{Person, Role};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mentor", about = "Manage the mentorship roster")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the roster server (default: http://localhost:3000).
  #[arg(long, env = "MENTOR_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

/// People are named by id, exact name, or a fuzzy fragment of their name.
#[derive(Subcommand, Debug)]
enum Command {
  /// List everyone on the roster.
  List,
  /// Show one person.
  Show { who: String },
  /// Add a new student.
  Add { name: String },
  /// Remove a person; their mentees become unassigned.
  Remove { who: String },
  /// Make a student a teacher.
  Promote { who: String },
  /// Make a teacher a student.
  Demote { who: String },
  /// Change a person's name.
  Rename { who: String, name: String },
  /// Set a student's mentor.
  Assign { student: String, teacher: String },
  /// Clear a student's mentor.
  Unassign { student: String },
  /// Students without a mentor.
  Unassigned,
  /// Every teacher with their mentees.
  Teachers,
  /// Other mentees of the same teacher.
  Peers { who: String },
  /// Case-insensitive name search.
  Search { needle: String },
  /// List the subject catalog.
  Subjects,
  /// Add a subject to the catalog.
  AddSubject { name: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn line(p: &Person, people: &[Person]) -> String {
  let mentor = p
    .mentor_id
    .and_then(|id| people.iter().find(|m| m.id == id))
    .map(|m| format!("  (mentor: {})", m.name))
    .unwrap_or_default();
  format!("{:<8} {}  {}{}", p.role.to_string(), p.name, p.id, mentor)
}

fn print_people(people: &[Person], all: &[Person]) {
  if people.is_empty() {
    println!("(nobody)");
  }
  for p in people {
    println!("{}", line(p, all));
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
  };
  tracing::debug!(url = %api_config.base_url, "using roster server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::List => {
      let all = client.list().await?;
      print_people(&all, &all);
    }
    Command::Show { who } => {
      let p = find(client, &who).await?;
      let all = client.list().await?;
      println!("{}", line(&p, &all));
      if p.is_teacher() {
        let mentees: Vec<Person> =
          all.iter().filter(|m| m.is_mentee_of(p.id)).cloned().collect();
        println!("mentees:");
        print_people(&mentees, &all);
      }
    }
    Command::Add { name } => {
      let p = client.create(&name).await?;
      println!("added {} ({})", p.name, p.id);
    }
    Command::Remove { who } => {
      let p = find(client, &who).await?;
      client.delete(p.id).await?;
      println!("removed {}", p.name);
    }
    Command::Promote { who } => {
      let id = find(client, &who).await?.id;
      let p = client.set_role(id, Role::Teacher).await?;
      println!("{} is now a teacher", p.name);
    }
    Command::Demote { who } => {
      let id = find(client, &who).await?.id;
      let p = client.set_role(id, Role::Student).await?;
      println!("{} is now a student", p.name);
    }
    Command::Rename { who, name } => {
      let id = find(client, &who).await?.id;
      let p = client.rename(id, &name).await?;
      println!("renamed to {}", p.name);
    }
    Command::Assign { student, teacher } => {
      let s = find(client, &student).await?;
      let t = find(client, &teacher).await?;
      let p = client.set_mentor(s.id, Some(t.id)).await?;
      println!("{} is now mentored by {}", p.name, t.name);
    }
    Command::Unassign { student } => {
      let id = find(client, &student).await?.id;
      let p = client.set_mentor(id, None).await?;
      println!("{} has no mentor", p.name);
    }
    Command::Unassigned => {
      let people = client.unassigned().await?;
      print_people(&people, &[]);
    }
    Command::Teachers => {
      let teachers = client.teachers().await?;
      if teachers.is_empty() {
        println!("(no teachers)");
      }
      for entry in teachers {
        println!("{} ({} mentees)", entry.teacher.name, entry.mentees.len());
        for m in &entry.mentees {
          println!("  - {}", m.name);
        }
      }
    }
    Command::Peers { who } => {
      let id = find(client, &who).await?.id;
      let peers = client.peers(id).await?;
      print_people(&peers, &[]);
    }
    Command::Search { needle } => {
      let found = client.search(&needle).await?;
      print_people(&found, &[]);
    }
    Command::Subjects => {
      let subjects = client.subjects().await?;
      if subjects.is_empty() {
        println!("(no subjects)");
      }
      for s in subjects {
        println!("{}  {}", s.name, s.id);
      }
    }
    Command::AddSubject { name } => {
      let s = client.create_subject(&name).await?;
      println!("added subject {} ({})", s.name, s.id);
    }
  }
  Ok(())
}

/// Resolve `who` to a person.
///
/// Names go through the search endpoint first; the full roster is only
/// fetched for fuzzy matching when the search finds nothing.
async fn find(client: &ApiClient, who: &str) -> Result<Person> {
  let mut candidates = Vec::new();
  if who.trim().parse::<uuid::Uuid>().is_err() {
    candidates = client.search(who.trim()).await?;
  }
  if candidates.is_empty() {
    candidates = client.list().await?;
  }
  let p = resolve::resolve(&candidates, who)?.clone();
  tracing::debug!(%who, id = %p.id, "resolved");
  Ok(p)
}

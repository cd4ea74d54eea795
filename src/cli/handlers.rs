use std::io;

use chrono::NaiveDate;

use crate::config::Config;
use crate::entity::Action;
use crate::error::{RegTrackerError, Result};
use crate::filter::{FacetFilter, FilterSpec};
use crate::projection::{action_headline, link_label, selection_label};
use crate::storage::{seed_if_empty, Gateway, SqliteStore};
use crate::tracker::Tracker;
use crate::workflow::{EditActionFields, NewActionFields};

fn open_tracker(config: &Config) -> Result<Tracker<SqliteStore>> {
    Ok(Tracker::new(SqliteStore::open(&config.database)?))
}

fn parse_due(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RegTrackerError::InvalidDate(value.to_string()))
}

fn describe_action(action: &Action) -> String {
    let due = action
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "no due date".to_string());
    let assignee = action.assignee.as_deref().unwrap_or("unassigned");
    format!("[{}] {} ({}, {})", action.id, action_headline(action), assignee, due)
}

pub fn handle_init(config: &Config, no_seed: bool) -> Result<()> {
    let mut store = SqliteStore::init(&config.database)?;
    let seeded = if no_seed {
        false
    } else {
        match store.in_transaction(|s| seed_if_empty(s)) {
            Ok(seeded) => seeded,
            Err(e) => {
                // A half-initialized file would block the next `init`
                let path = store.path().to_path_buf();
                drop(store);
                std::fs::remove_file(&path)?;
                return Err(e);
            }
        }
    };

    println!("Initialized regulation tracker at {}", config.database.display());
    if seeded {
        println!("  Loaded sample regulations");
    }

    Ok(())
}

pub fn handle_list(
    config: &Config,
    query: Option<String>,
    source: Option<String>,
    status: Option<String>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let tracker = open_tracker(config)?;

    let spec = FilterSpec {
        query,
        source: FacetFilter::from(source),
        status: FacetFilter::from(status),
        category: FacetFilter::from(category),
    };
    let regulations = tracker.list_regulations(&spec)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&regulations)?);
    } else if regulations.is_empty() {
        println!("No regulations found.");
    } else {
        println!("Regulations:\n");
        for r in &regulations {
            println!("  {} [{}]", selection_label(r), r.status);
            let effective = r
                .effective_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "      {} · {} · effective {}",
                r.source.as_deref().unwrap_or("-"),
                r.category.as_deref().unwrap_or("-"),
                effective
            );
        }
    }

    Ok(())
}

pub fn handle_show(config: &Config, id: i64, json: bool) -> Result<()> {
    let tracker = open_tracker(config)?;
    let detail = tracker.get_regulation_detail(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let r = &detail.regulation;
    println!("#{} {}", r.id, r.title);
    println!("{}", detail.caption());
    println!("Status: {}", r.status);
    println!("Received: {}", r.received_at.format("%Y-%m-%d %H:%M"));
    if let Some(summary) = &r.summary {
        println!("\n{}", summary);
    }

    println!("\nRelevant Links:");
    if detail.links.is_empty() {
        println!("  No links attached.");
    } else {
        for link in &detail.links {
            match link.link_type.as_deref().filter(|_| link.has_known_type()) {
                Some(kind) => println!("  - {} <{}> [{}]", link_label(link), link.url, kind),
                None => println!("  - {} <{}>", link_label(link), link.url),
            }
        }
    }

    println!("\nActions:");
    if detail.actions.is_empty() {
        println!("  No actions yet.");
    } else {
        for action in &detail.actions {
            println!("  {}", describe_action(action));
        }
    }

    Ok(())
}

pub fn handle_status(config: &Config, id: i64, status: String, json: bool) -> Result<()> {
    let mut tracker = open_tracker(config)?;
    let regulation = tracker.set_regulation_status(id, &status)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&regulation)?);
    } else {
        println!("Regulation #{} status: {}", regulation.id, regulation.status);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_action_add(
    config: &Config,
    regulation_id: i64,
    title: String,
    description: Option<String>,
    status: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    json: bool,
) -> Result<()> {
    let mut tracker = open_tracker(config)?;

    let fields = NewActionFields {
        title,
        description,
        status,
        assignee,
        due_date: due.as_deref().map(parse_due).transpose()?,
    };
    let action = tracker.add_action(regulation_id, fields)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&action)?);
    } else {
        println!("Created action {}", describe_action(&action));
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_action_edit(
    config: &Config,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    assignee: Option<String>,
    due: Option<String>,
    clear_assignee: bool,
    clear_due: bool,
    done: bool,
    json: bool,
) -> Result<()> {
    let mut tracker = open_tracker(config)?;
    let current = tracker.gateway().load_action(id)?;

    let mut fields = EditActionFields::from_action(&current);
    if let Some(title) = title {
        fields.title = title;
    }
    if let Some(description) = description {
        fields.description = Some(description);
    }
    if let Some(status) = status {
        fields.status = status;
    }
    if let Some(assignee) = assignee {
        fields.assignee = Some(assignee);
    } else if clear_assignee {
        fields.assignee = None;
    }
    if let Some(due) = due {
        fields.due_date = Some(parse_due(&due)?);
    } else if clear_due {
        fields.due_date = None;
    }
    fields.mark_done = done;

    let updated = tracker.edit_action(id, fields)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("Updated action {}", describe_action(&updated));
    }

    Ok(())
}

pub fn handle_action_delete(config: &Config, id: i64, force: bool) -> Result<()> {
    let mut tracker = open_tracker(config)?;
    let action = tracker.gateway().load_action(id)?;

    // Confirm deletion unless --force is used
    if !force {
        eprintln!("Delete action {}? [y/N] ", describe_action(&action));

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(RegTrackerError::Usage(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    tracker.delete_action(id)?;
    println!("Deleted action [{}] {}", action.id, action.title);

    Ok(())
}

pub fn handle_choices(config: &Config, json: bool) -> Result<()> {
    let tracker = open_tracker(config)?;
    let choices = tracker.filter_choices()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&choices)?);
    } else {
        println!("Sources: {}", choices.sources.join(", "));
        println!("Statuses: {}", choices.statuses.join(", "));
        println!("Categories: {}", choices.categories.join(", "));
    }

    Ok(())
}

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use itihas::environment::Settings;
use itihas::explorer::{Dashboard, Explorer, FeaturedPanel, Timeline};
use itihas::logging;
use itihas::lookup::Lookup;
use prettytable::{Cell, Row as PrettyRow, Table};

#[derive(Parser)]
#[clap(
    name = "itihas",
    about = "Explore regional history from Wikidata and Wikipedia"
)]
struct Cli {
    /// Language name or code (defaults to the first configured language)
    #[clap(short, long, global = true)]
    language: Option<String>,

    /// Region name or Wikidata id (defaults to the first configured region)
    #[clap(short, long, global = true)]
    region: Option<String>,

    /// Print the view as JSON instead of formatted text
    #[clap(long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Featured figure, featured monument and "on this day" events
    Dashboard {
        /// Calendar day to use instead of today, as MM-DD
        #[clap(long, value_parser = parse_month_day)]
        date: Option<(u32, u32)>,
    },

    /// Dated historical events of the region, oldest first
    Timeline {
        /// Show each event's description
        #[clap(short, long)]
        expand: bool,
    },

    /// List configured languages
    Languages,

    /// List configured regions and their featured entities
    Regions,
}

fn parse_month_day(raw: &str) -> Result<(u32, u32), String> {
    let parsed = NaiveDate::parse_from_str(&format!("2000-{}", raw.trim()), "%Y-%m-%d")
        .map_err(|_| format!("expected MM-DD, got {:?}", raw))?;
    Ok((parsed.month(), parsed.day()))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let args = Cli::parse();
    let settings = Settings::from_env();
    let explorer = Explorer::from_settings(&settings)?;

    match args.command {
        Commands::Languages => list_languages(&explorer),
        Commands::Regions => list_regions(&explorer),
        Commands::Dashboard { date } => {
            let selection = explorer.select(args.language.as_deref(), args.region.as_deref())?;
            let dashboard = match date {
                Some((month, day)) => explorer.dashboard(&selection, month, day).await,
                None => explorer.dashboard_today(&selection).await,
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print_dashboard(&dashboard);
            }
        }
        Commands::Timeline { expand } => {
            let selection = explorer.select(args.language.as_deref(), args.region.as_deref())?;
            let timeline = explorer.timeline(&selection).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                print_timeline(&timeline, expand);
            }
        }
    }

    Ok(())
}

fn list_languages(explorer: &Explorer) {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![Cell::new("Language"), Cell::new("Code")]));
    for language in explorer.registry().languages() {
        table.add_row(PrettyRow::new(vec![
            Cell::new(&language.name),
            Cell::new(language.code.as_str()),
        ]));
    }
    table.printstd();
}

fn list_regions(explorer: &Explorer) {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Region"),
        Cell::new("Wikidata"),
        Cell::new("Featured figure"),
        Cell::new("Featured monument"),
    ]));
    for region in explorer.registry().regions() {
        table.add_row(PrettyRow::new(vec![
            Cell::new(&region.name),
            Cell::new(region.region_id.as_str()),
            Cell::new(region.featured_figure.as_str()),
            Cell::new(region.featured_monument.as_str()),
        ]));
    }
    table.printstd();
}

fn print_heading(title: &str) {
    println!("\n{}", "═".repeat(80).bright_blue());
    println!("{}", title.bright_yellow().bold());
    println!("{}", "═".repeat(80).bright_blue());
}

fn print_network_notice(message: &str) {
    println!(
        "{} {}",
        "Network error:".bright_red().bold(),
        message.bright_red()
    );
}

fn print_panel(heading: &str, panel: &FeaturedPanel, language_name: &str) {
    println!("\n{}", heading.bright_blue().bold());
    println!("{}", "─".repeat(80).dimmed());

    let details = match &panel.details {
        Lookup::Found(details) => details,
        Lookup::Empty(_) => {
            println!(
                "{}",
                format!("Could not load details for {}.", panel.entity_id).bright_yellow()
            );
            return;
        }
        Lookup::Unavailable(message) => {
            print_network_notice(message);
            return;
        }
    };

    println!("{}", details.label.bold());
    if let Some(description) = &details.description {
        println!("{}", description.italic());
    }

    match &panel.article {
        Some(Lookup::Found(content)) => {
            if let Some(image_url) = &content.image_url {
                println!("{} {}", "Image:".dimmed(), image_url.cyan());
            }
            println!("\n{}", content.summary);
        }
        Some(Lookup::Empty(itihas::EmptyReason::NoArticle)) => {
            println!(
                "{}",
                format!(
                    "Details for '{}' found on Wikidata, but no Wikipedia article is available in {}.",
                    details.label, language_name
                )
                .dimmed()
            );
        }
        Some(Lookup::Empty(reason)) => println!("{}", reason.placeholder().dimmed()),
        Some(Lookup::Unavailable(message)) => print_network_notice(message),
        None => {}
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    let selection = &dashboard.selection;
    print_heading(&format!(
        "Itihas Explorer: A Journey Through {}",
        selection.region.name
    ));

    print_panel(
        "Featured Historical Figure",
        &dashboard.featured_figure,
        &selection.language.name,
    );
    print_panel(
        "Featured Monument",
        &dashboard.featured_monument,
        &selection.language.name,
    );

    println!(
        "\n{}",
        format!(
            "On This Day in History ({:02}-{:02})",
            dashboard.month, dashboard.day
        )
        .bright_blue()
        .bold()
    );
    println!("{}", "─".repeat(80).dimmed());
    match &dashboard.on_this_day {
        Lookup::Found(events) if !events.is_empty() => {
            for event in events {
                println!("{} {}", format!("{}:", event.year).bold(), event.label);
            }
        }
        Lookup::Unavailable(message) => print_network_notice(message),
        _ => println!("{}", no_events_message(dashboard.month, dashboard.day).dimmed()),
    }
}

fn no_events_message(month: u32, day: u32) -> String {
    let today = Local::now().date_naive();
    if (today.month(), today.day()) == (month, day) {
        "No specific events found for today in this region's recorded history.".to_string()
    } else {
        format!(
            "No specific events found for {:02}-{:02} in this region's recorded history.",
            month, day
        )
    }
}

fn print_timeline(timeline: &Timeline, expand: bool) {
    print_heading(&format!(
        "Historical Timeline of {}",
        timeline.selection.region.name
    ));

    let events = match &timeline.events {
        Lookup::Found(events) if !events.is_empty() => events,
        Lookup::Unavailable(message) => {
            print_network_notice(message);
            return;
        }
        _ => {
            println!(
                "{}",
                "Could not retrieve timeline events for this region. The data may not be available on Wikidata yet."
                    .bright_yellow()
            );
            return;
        }
    };

    let mut table = Table::new();
    let mut header = vec![Cell::new("Date"), Cell::new("Event")];
    if expand {
        header.push(Cell::new("Description"));
    }
    table.add_row(PrettyRow::new(header));

    for event in events {
        let mut row = vec![
            Cell::new(&event.formatted_date()),
            Cell::new(&event.label),
        ];
        if expand {
            row.push(Cell::new(
                event.description.as_deref().unwrap_or("No description."),
            ));
        }
        table.add_row(PrettyRow::new(row));
    }
    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_day() {
        assert_eq!(parse_month_day("10-16"), Ok((10, 16)));
        assert_eq!(parse_month_day("02-29"), Ok((2, 29)));
        assert!(parse_month_day("13-01").is_err());
        assert!(parse_month_day("october").is_err());
    }

    #[test]
    fn test_cli_parses_global_selection() {
        let cli = Cli::try_parse_from([
            "itihas",
            "timeline",
            "--region",
            "Karnataka",
            "--language",
            "kn",
            "--expand",
        ])
        .unwrap();
        assert_eq!(cli.region.as_deref(), Some("Karnataka"));
        assert_eq!(cli.language.as_deref(), Some("kn"));
        assert!(matches!(cli.command, Commands::Timeline { expand: true }));
    }

    #[test]
    fn test_no_events_message_names_the_day() {
        let today = Local::now().date_naive();
        assert!(no_events_message(today.month(), today.day()).contains("for today"));

        let other = today + chrono::Duration::days(40);
        let message = no_events_message(other.month(), other.day());
        assert!(!message.contains("today"));
        assert!(message.contains(&format!("{:02}-{:02}", other.month(), other.day())));
    }
}

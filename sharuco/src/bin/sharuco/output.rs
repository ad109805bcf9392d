use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Table};
use serde::Serialize;

use sharuco::{FollowControl, ProfileView, Snippet};

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.paint(ICONS.success, message, THEME.success));
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(ICONS.error, message, THEME.error));
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.paint(ICONS.warning, message, THEME.warning));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.paint(ICONS.info, message, THEME.info));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.paint(ICONS.arrow, message, THEME.muted));
        }
    }

    fn paint(&self, icon: &str, message: &str, color: colored::Color) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }
}

fn key_cell(key: &str, options: &GlobalOptions) -> Cell {
    if options.no_color {
        Cell::new(key)
    } else {
        Cell::new(key.color(THEME.key).to_string()).add_attribute(Attribute::Bold)
    }
}

fn handles(list: &[String]) -> String {
    if list.is_empty() { "-".to_string() } else { list.join(", ") }
}

fn snippet_line(snippet: &Snippet) -> String {
    let lock = if snippet.is_private { format!(" {}", ICONS.lock) } else { String::new() };
    let stars = if snippet.favoris.is_empty() {
        String::new()
    } else {
        format!(" {} {}", ICONS.star, snippet.favoris.len())
    };
    format!("{} [{}] {}{lock}{stars}", snippet.id, snippet.language, snippet.description)
}

impl TableDisplay for ProfileView {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = Table::new();
        let Some(profile) = self.profile() else {
            if let ProfileView::NotFound { handle } = self {
                table.add_row(vec![key_cell("User not found", options), Cell::new(handle)]);
            }
            return table;
        };

        let heading = if profile.premium {
            format!("{} {}", profile.heading, ICONS.verified)
        } else {
            profile.heading.clone()
        };
        let control = match profile.follow_control {
            FollowControl::SignInRequired => "sign in to follow",
            FollowControl::Hidden => "-",
            FollowControl::Follow => "follow",
            FollowControl::Unfollow => "unfollow",
        };

        table.set_header(vec![
            key_cell(&profile.handle, options),
            Cell::new(heading.as_str()).add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            key_cell("Followers", options),
            Cell::new(format!("{} ({})", profile.follower_count(), handles(&profile.followers))),
        ]);
        table.add_row(vec![
            key_cell("Following", options),
            Cell::new(format!("{} ({})", profile.following_count(), handles(&profile.following))),
        ]);
        table.add_row(vec![key_cell("Joined", options), Cell::new(&profile.joined)]);
        table.add_row(vec![key_cell("Action", options), Cell::new(control)]);

        let public: Vec<String> = profile.public_snippets.iter().map(snippet_line).collect();
        table.add_row(vec![
            key_cell("Public code", options),
            Cell::new(if public.is_empty() {
                "This user has not shared any code yet".to_string()
            } else {
                public.join("\n")
            }),
        ]);
        let favorites: Vec<String> = profile.favorite_snippets.iter().map(snippet_line).collect();
        table.add_row(vec![
            key_cell("Favorite code", options),
            Cell::new(if favorites.is_empty() {
                "This user has not favorite any code yet".to_string()
            } else {
                favorites.join("\n")
            }),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        match self {
            ProfileView::Found(profile) => format!(
                "{} followers={} following={} public={} favorites={} action={:?}",
                profile.handle,
                profile.follower_count(),
                profile.following_count(),
                profile.public_snippets.len(),
                profile.favorite_snippets.len(),
                profile.follow_control,
            ),
            ProfileView::NotFound { handle } => format!("{handle} not-found"),
        }
    }
}

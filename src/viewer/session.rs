//! Interactive viewer session
//!
//! A session owns the loaded table and the current filters. Every
//! [`FilterEvent`] is applied and the view recomputed before `handle`
//! returns; the table itself is only re-read on [`FilterEvent::Reload`].

use crate::config::OutputConfig;
use crate::viewer::filter::{filter, BookFilter, Choice};
use crate::viewer::render::{render, render_results, BookCard};
use crate::viewer::table::{BookTable, PriceBounds, TableStats};
use crate::viewer::{ViewerError, ViewerResult};

/// A change requested by the user
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEvent {
    SetCategory(Choice),
    SetRating(Choice),
    SetMinPrice(f64),
    SetMaxPrice(f64),
    SetQuery(String),
    /// Back to every criterion at its default
    Reset,
    /// Re-read the collection from disk
    Reload,
}

/// The recomputed view after an event
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub cards: Vec<BookCard>,
    pub stats: TableStats,
    /// Set when there is nothing to browse
    pub warning: Option<String>,
}

impl ViewUpdate {
    /// Terminal text for this view
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        if let Some(warning) = &self.warning {
            text.push_str("Warning: ");
            text.push_str(warning);
            text.push('\n');
        }
        text.push_str(&render_results(&self.cards));
        text
    }
}

/// Loaded table plus the filters currently applied to it
#[derive(Debug)]
pub struct ViewerSession {
    output: OutputConfig,
    currency_symbol: String,
    table: BookTable,
    bounds: Option<PriceBounds>,
    filters: BookFilter,
    warning: Option<String>,
}

impl ViewerSession {
    /// Loads the collection and seeds the price filter with its bounds
    ///
    /// A missing or empty collection is not an error here: the session
    /// starts empty and carries a warning.
    pub fn open(output: &OutputConfig, currency_symbol: &str) -> ViewerResult<Self> {
        let mut session = Self {
            output: output.clone(),
            currency_symbol: currency_symbol.to_string(),
            table: BookTable::new(Vec::new(), currency_symbol),
            bounds: None,
            filters: BookFilter::default(),
            warning: None,
        };
        session.reload()?;
        session.filters = session.default_filters();
        Ok(session)
    }

    /// Builds a session over an already loaded table
    pub fn from_table(table: BookTable) -> Self {
        let mut session = Self {
            output: OutputConfig::default(),
            currency_symbol: table.currency_symbol().to_string(),
            bounds: table.price_bounds(),
            table,
            filters: BookFilter::default(),
            warning: None,
        };
        session.filters = session.default_filters();
        session
    }

    pub fn table(&self) -> &BookTable {
        &self.table
    }

    pub fn filters(&self) -> &BookFilter {
        &self.filters
    }

    pub fn bounds(&self) -> Option<PriceBounds> {
        self.bounds
    }

    /// Applies an event and recomputes the view
    pub fn handle(&mut self, event: FilterEvent) -> ViewerResult<ViewUpdate> {
        tracing::debug!("Viewer event: {:?}", event);

        match event {
            FilterEvent::SetCategory(choice) => self.filters.category = choice,
            FilterEvent::SetRating(choice) => self.filters.rating = choice,
            FilterEvent::SetMinPrice(value) => self.filters.min_price = self.clamp(value),
            FilterEvent::SetMaxPrice(value) => self.filters.max_price = self.clamp(value),
            FilterEvent::SetQuery(query) => self.filters.query = query,
            FilterEvent::Reset => self.filters = self.default_filters(),
            FilterEvent::Reload => {
                let old = self.bounds;
                let min_untouched = self.filters.min_price == old.map(|b| b.min);
                let max_untouched = self.filters.max_price == old.map(|b| b.max);

                self.reload()?;

                // Untouched edges follow the new table, moved ones snap into it
                let defaults = self.default_filters();
                self.filters.min_price = if min_untouched {
                    defaults.min_price
                } else {
                    self.filters
                        .min_price
                        .and_then(|v| self.clamp(v))
                        .or(defaults.min_price)
                };
                self.filters.max_price = if max_untouched {
                    defaults.max_price
                } else {
                    self.filters
                        .max_price
                        .and_then(|v| self.clamp(v))
                        .or(defaults.max_price)
                };
            }
        }

        Ok(self.view())
    }

    /// The view for the current filters
    pub fn view(&self) -> ViewUpdate {
        ViewUpdate {
            cards: render(filter(&self.table, &self.filters)),
            stats: self.table.stats(),
            warning: self.warning.clone(),
        }
    }

    fn reload(&mut self) -> ViewerResult<()> {
        match BookTable::load(&self.output, &self.currency_symbol) {
            Ok(table) => {
                self.table = table;
                self.warning = None;
            }
            Err(e @ ViewerError::SourceMissing { .. }) => {
                tracing::warn!("{}", e);
                self.table = BookTable::new(Vec::new(), self.currency_symbol.as_str());
                self.warning = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }
        self.bounds = self.table.price_bounds();
        Ok(())
    }

    /// Slider semantics: a price outside the table's range snaps to its edge
    fn clamp(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        self.bounds.map(|bounds| bounds.clamp(value))
    }

    fn default_filters(&self) -> BookFilter {
        BookFilter {
            min_price: self.bounds.map(|b| b.min),
            max_price: self.bounds.map(|b| b.max),
            ..BookFilter::default()
        }
    }
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(FilterEvent),
    /// Show the current view again
    Show,
    Stats,
    Help,
    Quit,
}

/// Help text for the interactive syntax
pub const HELP: &str = "\
Commands:
  category <name|All>   filter by category
  rating <word|All>     filter by star rating
  min <price>           minimum price
  max <price>           maximum price
  search [text]         search titles and descriptions (empty clears)
  reset                 clear all filters
  reload                re-read the records from disk
  stats                 collection statistics
  help                  this text
  quit                  leave the viewer";

/// Parses one line of interactive input
///
/// ```
/// use book_scout::viewer::{parse_command, Command, FilterEvent};
///
/// assert_eq!(
///     parse_command("min 12.5").unwrap(),
///     Command::Event(FilterEvent::SetMinPrice(12.5))
/// );
/// assert_eq!(parse_command("quit").unwrap(), Command::Quit);
/// assert!(parse_command("min cheap").is_err());
/// ```
pub fn parse_command(line: &str) -> ViewerResult<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Show,
        "category" | "cat" => Command::Event(FilterEvent::SetCategory(Choice::from_label(rest))),
        "rating" => Command::Event(FilterEvent::SetRating(Choice::from_label(rest))),
        "min" => Command::Event(FilterEvent::SetMinPrice(parse_amount(rest)?)),
        "max" => Command::Event(FilterEvent::SetMaxPrice(parse_amount(rest)?)),
        "search" | "find" => Command::Event(FilterEvent::SetQuery(rest.to_string())),
        "reset" => Command::Event(FilterEvent::Reset),
        "reload" => Command::Event(FilterEvent::Reload),
        "show" | "list" => Command::Show,
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(ViewerError::InvalidCommand(format!(
                "unknown command '{}', try 'help'",
                other
            )))
        }
    };

    Ok(command)
}

fn parse_amount(text: &str) -> ViewerResult<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ViewerError::InvalidCommand(format!("'{}' is not a price", text)))
}

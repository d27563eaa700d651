//! Line-oriented request loop served against the live gateway while the
//! scheduled refresher keeps its cache current.

use super::rates::{details_table, rates_table};
use super::ui;
use crate::core::ExchangeResult;
use crate::exchange::ExchangeService;
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};
use uuid::Uuid;

const HELP: &str = "\
Commands:
  rates <YYYY-MM-DD> <Country-Currency>
  convert <amount> <YYYY-MM-DD> <Country-Currency>
  buy <amount> [description]
  exchange <transaction id> <Country-Currency>
  list [page] [size]
  refresh
  help
  quit";

#[derive(Debug, PartialEq)]
pub enum Request {
    Rates {
        date: NaiveDate,
        currency: String,
    },
    Convert {
        amount: Decimal,
        date: NaiveDate,
        currency: String,
    },
    Buy {
        amount: Decimal,
        description: Option<String>,
    },
    Exchange {
        id: Uuid,
        currency: String,
    },
    List {
        page: i64,
        size: i64,
    },
    Refresh,
    Help,
    Quit,
}

fn parse_arg<T>(value: Option<&str>, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| anyhow!("Missing {name}. Type 'help' for usage."))?;
    value
        .parse()
        .map_err(|e| anyhow!("Invalid {name} '{value}': {e}"))
}

/// Remaining words joined back together, so currencies may contain spaces.
fn rest(words: std::str::SplitWhitespace<'_>) -> Option<String> {
    let joined = words.collect::<Vec<_>>().join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_request(line: &str) -> Result<Option<Request>> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let request = match command.to_lowercase().as_str() {
        "rates" => Request::Rates {
            date: parse_arg(words.next(), "date")?,
            currency: rest(words).context("Missing currency. Type 'help' for usage.")?,
        },
        "convert" => Request::Convert {
            amount: parse_arg(words.next(), "amount")?,
            date: parse_arg(words.next(), "date")?,
            currency: rest(words).context("Missing currency. Type 'help' for usage.")?,
        },
        "buy" => Request::Buy {
            amount: parse_arg(words.next(), "amount")?,
            description: rest(words),
        },
        "exchange" => Request::Exchange {
            id: parse_arg(words.next(), "transaction id")?,
            currency: rest(words).context("Missing currency. Type 'help' for usage.")?,
        },
        "list" => Request::List {
            page: words.next().map_or(Ok(0), |p| parse_arg(Some(p), "page"))?,
            size: words.next().map_or(Ok(10), |s| parse_arg(Some(s), "size"))?,
        },
        "refresh" => Request::Refresh,
        "help" => Request::Help,
        "quit" | "exit" => Request::Quit,
        other => bail!("Unknown command '{other}'. Type 'help' for usage."),
    };
    Ok(Some(request))
}

/// How a request loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Requests answered successfully.
    pub answered: usize,
    /// `quit` was requested, as opposed to input running out.
    pub quit: bool,
}

pub struct ServeSession {
    service: ExchangeService,
}

impl ServeSession {
    pub fn new(service: ExchangeService) -> Self {
        Self { service }
    }

    /// Executes one request and renders the reply.
    pub async fn handle(&self, request: Request) -> Result<String> {
        let reply = match request {
            Request::Rates { date, currency } => {
                let mut records = self.service.gateway().lookup(&currency, date).await?;
                if records.is_empty() {
                    format!("No exchange rates found for {currency} on or before {date}.")
                } else {
                    records.sort_by(|a, b| b.record_date.cmp(&a.record_date));
                    rates_table(&records).to_string()
                }
            }
            Request::Convert {
                amount,
                date,
                currency,
            } => {
                let details = self.service.gateway().quote(amount, &currency, date).await?;
                details_table(amount, date, &details).to_string()
            }
            Request::Buy {
                amount,
                description,
            } => {
                let transaction = self.service.create(description, amount).await?;
                format!(
                    "Recorded transaction {} for {} USD",
                    transaction.id, transaction.purchase_amount
                )
            }
            Request::Exchange { id, currency } => {
                let ExchangeResult {
                    transaction,
                    exchange_details,
                } = self.service.exchange(id, &currency).await?;
                details_table(
                    transaction.purchase_amount,
                    transaction.transaction_date.date(),
                    &exchange_details,
                )
                .to_string()
            }
            Request::List { page, size } => {
                let listing = self.service.list(page, size).await?;
                let mut lines = vec![format!(
                    "Page {} of {} ({} transactions)",
                    listing.page + 1,
                    listing.total_pages,
                    listing.total_elements
                )];
                lines.extend(listing.content.iter().map(|t| {
                    format!(
                        "{}  {}  {} USD  {}",
                        t.id,
                        t.transaction_date.format("%Y-%m-%d %H:%M:%S"),
                        t.purchase_amount,
                        t.description.as_deref().unwrap_or("")
                    )
                }));
                lines.join("\n")
            }
            Request::Refresh => {
                let size = self.service.refresh_cache().await?;
                format!("Cached exchange entries: {size}")
            }
            Request::Help => HELP.to_string(),
            Request::Quit => String::new(),
        };
        Ok(reply)
    }

    /// Answers requests line by line until `quit` or end of input.
    ///
    /// A failed request is reported and the loop carries on.
    pub async fn run<R, W>(&self, reader: R, out: &mut W) -> Result<SessionSummary>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = reader.lines();
        let mut summary = SessionSummary {
            answered: 0,
            quit: false,
        };

        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read request")?
        {
            let request = match parse_request(&line) {
                Ok(Some(request)) => request,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                    continue;
                }
            };
            if request == Request::Quit {
                summary.quit = true;
                break;
            }

            debug!(?request, "Handling request");
            match self.handle(request).await {
                Ok(reply) => {
                    writeln!(out, "{reply}")?;
                    summary.answered += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Request failed");
                    writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                }
            }
            out.flush()?;
        }
        Ok(summary)
    }
}

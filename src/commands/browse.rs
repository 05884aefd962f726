//! Interactive browsing over stdin and stdout.

use crate::args::BrowseArgs;
use crate::commands::Out;
use crate::model::TransactionFilter;
use crate::screen::{filter_bar, Screen, LOADING_MESSAGE};
use crate::view_model::{TransactionViewModel, ViewState};
use crate::{source, Config, Result};
use anyhow::{anyhow, Context};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Filter(TransactionFilter),
    Refresh,
    Quit,
    /// Replace the search text.
    Search(String),
}

impl FromStr for BrowseCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Ok(BrowseCommand::Search(line.to_string()));
        };
        let mut words = command.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("filter"), Some(filter), None) => TransactionFilter::from_str(filter)
                .map(BrowseCommand::Filter)
                .map_err(|_| anyhow!("Unknown filter '{filter}', use all, income or expense")),
            (Some("refresh"), None, None) => Ok(BrowseCommand::Refresh),
            (Some("quit"), None, None) => Ok(BrowseCommand::Quit),
            _ => Err(anyhow!(
                "Unknown command ':{command}', use :filter, :refresh or :quit"
            )),
        }
    }
}

/// Runs the interactive browser on stdin and stdout until `:quit` or the end of input.
pub async fn browse(config: Config, args: &BrowseArgs) -> Result<Out<()>> {
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    let view_model = TransactionViewModel::new(source::from_config(&config)?, config.view_settings());
    view_model.set_filter(args.filter());
    let commands = run(view_model, input, &mut output).await?;
    Ok(format!("Processed {commands} commands").into())
}

/// Renders the settled state after every command read from `input`. Returns how many commands
/// were processed.
async fn run<R, W>(mut view_model: TransactionViewModel, input: R, output: &mut W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut processed = 0;
    write_screen(output, &view_model).await?;

    while let Some(line) = lines.next_line().await.context("Unable to read input")? {
        let command = match BrowseCommand::from_str(&line) {
            Ok(command) => command,
            Err(e) => {
                write(output, &format!("{e}\n")).await?;
                continue;
            }
        };
        debug!("Browse command {command:?}");
        processed += 1;
        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Filter(filter) => view_model.set_filter(filter),
            BrowseCommand::Search(text) => view_model.set_search_query(text),
            BrowseCommand::Refresh => {
                if !view_model.refresh() {
                    write(output, "Already refreshing\n").await?;
                }
            }
        }
        write_screen(output, &view_model).await?;
    }
    output.flush().await.context("Unable to flush output")?;
    Ok(processed)
}

/// Writes the loading screen if a fetch is in flight, then waits for the view to settle and writes
/// the result.
async fn write_screen<W>(output: &mut W, view_model: &TransactionViewModel) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if view_model.is_loading() {
        write(output, &format!("{LOADING_MESSAGE}\n")).await?;
    }
    let state = view_model.settled().await?;
    write(output, &render(&state)).await
}

fn render(state: &ViewState) -> String {
    format!(
        "\n{}\nSearch: {}\n\n{}\n",
        filter_bar(state.filter()),
        state.search_query(),
        Screen::from(state)
    )
}

async fn write<W>(output: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output
        .write_all(text.as_bytes())
        .await
        .context("Unable to write output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::ScriptedSource;
    use crate::view_model::ViewSettings;
    use std::sync::Arc;
    use std::time::Duration;

    async fn browse_script(script: &str) -> (usize, String, Arc<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(1000)));
        let view_model = TransactionViewModel::new(source.clone(), ViewSettings::default());
        let mut output = Vec::new();
        let processed = run(view_model, script.as_bytes(), &mut output)
            .await
            .unwrap();
        (processed, String::from_utf8(output).unwrap(), source)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            BrowseCommand::from_str(":filter income").unwrap(),
            BrowseCommand::Filter(TransactionFilter::Income)
        );
        assert_eq!(
            BrowseCommand::from_str("  :refresh ").unwrap(),
            BrowseCommand::Refresh
        );
        assert_eq!(BrowseCommand::from_str(":quit").unwrap(), BrowseCommand::Quit);
        assert_eq!(
            BrowseCommand::from_str("Blue Bottle").unwrap(),
            BrowseCommand::Search("Blue Bottle".into())
        );
        assert_eq!(
            BrowseCommand::from_str("").unwrap(),
            BrowseCommand::Search(String::new())
        );
        assert!(BrowseCommand::from_str(":filter transfers").is_err());
        assert!(BrowseCommand::from_str(":filter").is_err());
        assert!(BrowseCommand::from_str(":launch").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_browse_session() {
        let (processed, output, source) =
            browse_script("coffee\n:filter expense\n:bogus\n\n:refresh\n:quit\nnever read\n")
                .await;
        assert_eq!(processed, 5);
        assert_eq!(source.calls(), 2);

        assert!(output.starts_with("Loading transactions...\n"), "{output}");
        assert!(output.contains("Search: coffee\n\nBlue Bottle Coffee"), "{output}");
        assert!(output.contains("Coffee Co-op Dividend"), "{output}");
        assert!(output.contains("All Income [Expenses]\nSearch: coffee"), "{output}");
        assert!(output.contains("Unknown command ':bogus'"), "{output}");
        // the empty line cleared the search, so the expense list is back in full
        assert!(output.contains("All Income [Expenses]\nSearch: \n\nBlue Bottle Coffee"), "{output}");
        assert!(output.contains("Whole Foods"), "{output}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_browse_shows_error_then_recovers() {
        let source = Arc::new(ScriptedSource::new(Duration::from_millis(10)));
        source.push(Err(crate::error::FetchError::Simulated));
        let view_model = TransactionViewModel::new(source.clone(), ViewSettings::default());
        let mut output = Vec::new();
        run(view_model, ":refresh\n".as_bytes(), &mut output)
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        let error_at = output.find("Error: Failed to fetch transactions").unwrap();
        let list_at = output.find("Acme Payroll").unwrap();
        assert!(error_at < list_at, "{output}");
    }
}

use crate::args::ListArgs;
use crate::commands::Out;
use crate::screen::{filter_bar, Screen};
use crate::view_model::{FetchStatus, TransactionViewModel};
use crate::{source, Config, Result};
use anyhow::{bail, Context};
use tracing::{debug, info};

/// Fetches, filters and searches once, refreshing after failures up to `args.retries()` times, and
/// returns the screen that results.
pub async fn list(config: Config, args: &ListArgs) -> Result<Out<Screen>> {
    let source = source::from_config(&config)?;
    let mut view_model = TransactionViewModel::new(source, config.view_settings());
    view_model.set_filter(args.filter());
    view_model.set_search_query(args.search());

    let mut state = view_model.settled().await?;
    let mut retries_left = args.retries();
    while state.status() == FetchStatus::Failure && retries_left > 0 {
        retries_left -= 1;
        info!(
            "Fetch failed ({}), refreshing, {retries_left} retries left",
            state.error().unwrap_or_default()
        );
        if !view_model.refresh() {
            bail!("Unable to refresh, a fetch is already in flight");
        }
        state = view_model.settled().await?;
    }
    debug!(
        "{} of {} transactions shown",
        state.filtered_transactions().len(),
        state.transactions().len()
    );

    let screen = Screen::from(&state);
    let message = if args.json() {
        serde_json::to_string_pretty(&screen).context("Unable to serialize the screen")?
    } else {
        format!("{}\n\n{screen}", filter_bar(state.filter()))
    };
    Ok(Out::new(message, screen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use crate::model::TransactionFilter;
    use tempfile::TempDir;

    fn config(failure_rate: f64, data_path: Option<std::path::PathBuf>) -> Config {
        Config::default()
            .with_overrides(Overrides {
                latency_ms: Some(20),
                failure_rate: Some(failure_rate),
                debounce_ms: None,
                data_path,
            })
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_income() {
        let args = ListArgs::new(TransactionFilter::Income, "", 0);
        let out = list(config(0.0, None), &args).await.unwrap();
        let Some(Screen::List(rows)) = out.structure() else {
            panic!("expected a list, got {:?}", out.structure());
        };
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.amount.starts_with('+')));
        assert!(out.message().starts_with("All [Income] Expenses\n\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_search() {
        let args = ListArgs::new(TransactionFilter::All, "bottle", 0);
        let out = list(config(0.0, None), &args).await.unwrap();
        let Some(Screen::List(rows)) = out.structure() else {
            panic!("expected a list, got {:?}", out.structure());
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].merchant, "Blue Bottle Coffee");
        assert!(out.message().contains("-$6.75"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_no_match_is_empty_screen() {
        let args = ListArgs::new(TransactionFilter::All, "no such merchant", 0);
        let out = list(config(0.0, None), &args).await.unwrap();
        assert_eq!(out.structure(), Some(&Screen::Empty));
        assert!(out.message().ends_with("No transactions available"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_error_after_retries() {
        let args = ListArgs::new(TransactionFilter::All, "", 2);
        let out = list(config(1.0, None), &args).await.unwrap();
        assert_eq!(
            out.structure(),
            Some(&Screen::Error("Failed to fetch transactions".into()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_from_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mine.csv");
        std::fs::write(
            &path,
            "id,merchant,amount,date,category,type\n\
             a,Corner Bakery,3.25,2024-05-02,Food,expense\n\
             b,Tax Refund,310.00,2024-05-01,Taxes,income\n",
        )
        .unwrap();
        let args = ListArgs::new(TransactionFilter::All, "", 0);
        let out = list(config(0.0, Some(path)), &args).await.unwrap();
        let Some(Screen::List(rows)) = out.structure() else {
            panic!("expected a list, got {:?}", out.structure());
        };
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(rows[1].subtitle, "Taxes • May 1, 2024");
    }
}

//! Argument parsing and subcommands run end to end against local CSV files.

mod common;

use chrono::NaiveDate;
use clap::Parser;

use equity_lens::analysis::ChartPeriod;
use equity_lens::commands::{Report, execute};
use equity_lens::output::render;
use equity_lens::utils::time_utils::today_local;
use equity_lens::{Cli, Command, Ticker};

fn tickers(list: &[&str]) -> Vec<Ticker> {
    list.iter().map(|t| Ticker::new(t)).collect()
}

#[test]
fn defaults_come_from_config() {
    let cli = Cli::try_parse_from(["equity-lens", "capm"]).unwrap();
    assert!(!cli.prefer_api && !cli.json);
    assert_eq!(cli.data_dir, None);
    match cli.command {
        Command::Capm {
            tickers: list,
            years,
            risk_free,
            market,
        } => {
            assert_eq!(list, tickers(&["TSLA", "AAPL", "AMZN", "GOOGL"]));
            assert_eq!(years, 1);
            assert_eq!(risk_free, 5.0);
            assert_eq!(market, Ticker::new("^GSPC"));
        }
        other => panic!("parsed {:?}", other),
    }

    let cli = Cli::try_parse_from(["equity-lens", "beta"]).unwrap();
    match cli.command {
        Command::Beta {
            ticker,
            rolling_window,
            risk_free,
            sector,
            start,
            ..
        } => {
            assert_eq!(ticker, Ticker::new("TSLA"));
            assert_eq!(rolling_window, 180);
            assert_eq!(risk_free, 2.0);
            assert_eq!(sector.len(), 5);
            assert_eq!(start, None);
        }
        other => panic!("parsed {:?}", other),
    }
}

#[test]
fn parses_lists_dates_and_periods() {
    let cli = Cli::try_parse_from([
        "equity-lens",
        "--json",
        "analyze",
        "msft",
        "--start",
        " 2023-01-01 ",
        "--period",
        "6mo",
        "--window",
        "60",
    ])
    .unwrap();
    assert!(cli.json);
    match cli.command {
        Command::Analyze {
            ticker,
            start,
            end,
            window,
            period,
        } => {
            assert_eq!(ticker, Ticker::new("MSFT"));
            assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1));
            assert_eq!(end, None);
            assert_eq!(window, 60);
            assert_eq!(period, ChartPeriod::SixMonths);
        }
        other => panic!("parsed {:?}", other),
    }

    let cli = Cli::try_parse_from(["equity-lens", "capm", "--tickers", "nvda,amd"]).unwrap();
    let Command::Capm { tickers: list, .. } = cli.command else {
        panic!("expected capm");
    };
    assert_eq!(list, tickers(&["NVDA", "AMD"]));
}

#[test]
fn rejects_out_of_range_arguments() {
    for argv in [
        vec!["equity-lens", "capm", "--years", "11"],
        vec!["equity-lens", "capm", "--risk-free", "12.5"],
        vec!["equity-lens", "capm", "--risk-free", "NaN"],
        vec!["equity-lens", "beta", "--rolling-window", "10"],
        vec!["equity-lens", "analyze", "--window", "500"],
        vec!["equity-lens", "analyze", "--period", "2w"],
        vec!["equity-lens", "analyze", "--start", "01/02/2024"],
        vec!["equity-lens", "forecast", ""],
    ] {
        assert!(Cli::try_parse_from(argv.clone()).is_err(), "accepted {:?}", argv);
    }
}

/// Writes a year and a bit of daily history ending today for each ticker.
fn csv_dir(stems: &[(&str, u64)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let dates = common::days_ending(today_local(), 420);
    for (stem, seed) in stems {
        let closes = common::price_path(dates.len(), 100.0, *seed);
        common::write_csv(dir.path(), stem, &dates, &closes);
    }
    dir
}

fn cli_for(dir: &tempfile::TempDir, args: &[&str]) -> Cli {
    let data_dir = dir.path().to_str().unwrap();
    let argv = ["equity-lens", "--data-dir", data_dir]
        .into_iter()
        .chain(args.iter().copied());
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn capm_runs_on_local_files() {
    let dir = csv_dir(&[("TSLA", 1), ("AAPL", 2), ("GSPC", 3)]);
    let cli = cli_for(&dir, &["capm", "--tickers", "TSLA,AAPL"]);

    let Report::Capm(summary) = execute(&cli).await.unwrap() else {
        panic!("expected a CAPM report");
    };
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.market, Ticker::new("^GSPC"));
    assert_eq!(summary.correlation.labels, vec!["TSLA", "AAPL", "^GSPC"]);
    assert!(summary.observations > 200);

    let text = render(&Report::Capm(summary), false).unwrap();
    assert!(text.contains("AAPL"));
}

#[tokio::test]
async fn beta_runs_with_a_local_sector_peer() {
    let dir = csv_dir(&[("TSLA", 4), ("GSPC", 5), ("AAPL", 6)]);
    let cli = cli_for(
        &dir,
        &["beta", "TSLA", "--sector", "AAPL", "--rolling-window", "60"],
    );

    let Report::Beta(report) = execute(&cli).await.unwrap() else {
        panic!("expected a beta report");
    };
    assert_eq!(report.stock, Ticker::new("TSLA"));
    assert_eq!(report.sector_betas.len(), 1);
    assert_eq!(report.rolling_window, 60);
    assert!(!report.rolling_beta.is_empty());
    assert!(report.regression.nobs > 300);
}

#[tokio::test]
async fn analyze_and_forecast_run_on_local_files() {
    let dir = csv_dir(&[("MSFT", 8)]);

    let cli = cli_for(&dir, &["analyze", "MSFT", "--period", "1mo"]);
    let Report::Analysis(analysis) = execute(&cli).await.unwrap() else {
        panic!("expected a stock analysis");
    };
    assert_eq!(analysis.recent.len(), 10);
    assert_eq!(analysis.chart.period, ChartPeriod::OneMonth);
    assert!(!analysis.chart.candles.is_empty());
    // Warm-up rows make the moving average defined across the whole window
    assert!(analysis.chart.moving_average.iter().all(|v| v.is_finite()));
    let text = render(&Report::Analysis(analysis), false).unwrap();
    assert!(text.contains("Range"));

    let cli = cli_for(&dir, &["--json", "forecast", "MSFT"]);
    let report = execute(&cli).await.unwrap();
    let json = render(&report, cli.json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["ticker"], "MSFT");
    assert_eq!(value["table"]["rows"].as_array().unwrap().len(), 30);
    assert_eq!(
        value["table"]["rows"][0]["date"],
        today_local().format("%Y-%m-%d").to_string()
    );
}

//! Single-stock snapshot: latest move, trailing returns, volatility, and the
//! series a price chart with indicators would draw.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::analysis::capm::pct_change;
use crate::analysis::indicators::{Macd, macd, rsi, sma};
use crate::config::analysis::StockSettings;
use crate::domain::{Candle, PricePoint, Ticker};
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::OhlcvTimeSeries;
use crate::transform::rolling_std;
use crate::utils::time_utils::years_before;

/// Rows shown in the recent-history table.
const RECENT_ROWS: usize = 10;

// Extra calendar days fetched ahead of a chart window so the slowest
// indicator (the 50-day average) is defined on its first row
const INDICATOR_WARM_UP_DAYS: u64 = 120;

/// Trailing return horizons, measured in trading rows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::Display,
)]
pub enum ReturnsPeriod {
    #[strum(serialize = "1D")]
    #[serde(rename = "1D")]
    OneDay,
    #[strum(serialize = "1W")]
    #[serde(rename = "1W")]
    OneWeek,
    #[strum(serialize = "1M")]
    #[serde(rename = "1M")]
    OneMonth,
    #[strum(serialize = "3M")]
    #[serde(rename = "3M")]
    ThreeMonths,
    #[strum(serialize = "1Y")]
    #[serde(rename = "1Y")]
    OneYear,
}

impl ReturnsPeriod {
    /// Rows between the two closes compared (1D compares the last two rows).
    pub fn rows(&self) -> usize {
        match self {
            ReturnsPeriod::OneDay => 2,
            ReturnsPeriod::OneWeek => 5,
            ReturnsPeriod::OneMonth => 21,
            ReturnsPeriod::ThreeMonths => 63,
            ReturnsPeriod::OneYear => 252,
        }
    }
}

/// Chart window, counted back from the last available row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum ChartPeriod {
    #[strum(serialize = "5d")]
    #[serde(rename = "5d")]
    FiveDays,
    #[strum(serialize = "1mo")]
    #[serde(rename = "1mo")]
    OneMonth,
    #[strum(serialize = "6mo")]
    #[serde(rename = "6mo")]
    SixMonths,
    #[strum(serialize = "ytd")]
    #[serde(rename = "ytd")]
    YearToDate,
    #[default]
    #[strum(serialize = "1y")]
    #[serde(rename = "1y")]
    OneYear,
    #[strum(serialize = "5y")]
    #[serde(rename = "5y")]
    FiveYears,
    #[strum(serialize = "max")]
    #[serde(rename = "max")]
    Max,
}

impl ChartPeriod {
    /// First calendar date inside the window ending at `last`. `None` for
    /// row-counted (5d) and unbounded (max) windows.
    pub fn start_date(&self, last: NaiveDate) -> Option<NaiveDate> {
        match self {
            ChartPeriod::FiveDays | ChartPeriod::Max => None,
            ChartPeriod::OneMonth => last.checked_sub_months(Months::new(1)),
            ChartPeriod::SixMonths => last.checked_sub_months(Months::new(6)),
            ChartPeriod::YearToDate => NaiveDate::from_ymd_opt(last.year(), 1, 1),
            ChartPeriod::OneYear => Some(years_before(last, 1)),
            ChartPeriod::FiveYears => Some(years_before(last, 5)),
        }
    }

    /// Earliest date to fetch for a chart window ending `today`, warm-up included.
    pub fn history_start(&self, today: NaiveDate) -> NaiveDate {
        let epoch = DateTime::UNIX_EPOCH.date_naive();
        let window_start = match self {
            ChartPeriod::Max => return epoch,
            ChartPeriod::FiveDays => today,
            period => period.start_date(today).unwrap_or(today),
        };
        window_start
            .checked_sub_days(Days::new(INDICATOR_WARM_UP_DAYS))
            .map_or(epoch, |d| d.max(epoch))
    }

    /// Index range of `data` covered by this window.
    pub fn range(&self, data: &OhlcvTimeSeries) -> (usize, usize) {
        let n = data.klines();
        match (self, data.last_date()) {
            (_, None) => (0, 0),
            (ChartPeriod::FiveDays, _) => (n.saturating_sub(5), n),
            (ChartPeriod::Max, _) => (0, n),
            (period, Some(last)) => match period.start_date(last) {
                Some(start) => data.get_indices_by_date_range(start, None).unwrap_or((n, n)),
                None => (0, n),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyChange {
    pub last_close: f64,
    /// Last close minus the previous close.
    pub change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodReturn {
    pub period: ReturnsPeriod,
    /// Percent; `None` when there are too few rows.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub period: ChartPeriod,
    pub candles: Vec<Candle>,
    pub rsi: Vec<f64>,
    pub macd: Macd,
    pub moving_average: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAnalysis {
    pub ticker: Ticker,
    pub daily_change: DailyChange,
    pub returns: Vec<PeriodReturn>,
    /// Most recent rows first.
    pub recent: Vec<Candle>,
    pub volatility_window: usize,
    /// Rolling std of closes, dated at the end of each window.
    pub volatility: Vec<PricePoint>,
    /// Fractional close-to-close returns.
    pub daily_returns: Vec<PricePoint>,
    pub chart: ChartData,
}

pub fn daily_change(closes: &[f64]) -> AnalysisResult<DailyChange> {
    match closes {
        [.., prev, last] => Ok(DailyChange {
            last_close: *last,
            change: last - prev,
        }),
        _ => Err(AnalysisError::InsufficientData {
            needed: 2,
            got: closes.len(),
        }),
    }
}

/// `(close[-1] / close[-n] - 1) * 100` for the period's row count `n`.
pub fn period_return(closes: &[f64], period: ReturnsPeriod) -> Option<f64> {
    let n = period.rows();
    if closes.len() < n {
        return None;
    }
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - n];
    Some((last / base - 1.0) * 100.0)
}

fn chart_data(
    history: &OhlcvTimeSeries,
    period: ChartPeriod,
    settings: &StockSettings,
) -> AnalysisResult<ChartData> {
    let closes = &history.close_prices;
    let rsi_all = rsi(closes, settings.rsi_period)?;
    let macd_all = macd(
        closes,
        settings.macd_fast,
        settings.macd_slow,
        settings.macd_signal,
    )?;
    let ma_all = sma(closes, settings.moving_average_window)?;

    // Indicators warm up on the full history and are cut to the window after
    let (lo, hi) = period.range(history);
    Ok(ChartData {
        period,
        candles: history.slice((lo, hi)).candles(),
        rsi: rsi_all[lo..hi].to_vec(),
        macd: Macd {
            macd: macd_all.macd[lo..hi].to_vec(),
            signal: macd_all.signal[lo..hi].to_vec(),
            histogram: macd_all.histogram[lo..hi].to_vec(),
        },
        moving_average: ma_all[lo..hi].to_vec(),
    })
}

/// Snapshot of `data` (the analysis range) plus chart series cut from
/// `chart_history` (a longer history so indicators are warmed up).
pub fn analyze_stock(
    data: &OhlcvTimeSeries,
    chart_history: &OhlcvTimeSeries,
    period: ChartPeriod,
    volatility_window: usize,
    settings: &StockSettings,
) -> AnalysisResult<StockAnalysis> {
    if data.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    let closes = &data.close_prices;

    let returns = ReturnsPeriod::iter()
        .map(|period| PeriodReturn {
            period,
            value: period_return(closes, period),
        })
        .collect();

    let recent = (data.klines().saturating_sub(RECENT_ROWS)..data.klines())
        .rev()
        .map(|i| data.get_candle(i))
        .collect();

    let volatility = data
        .dates
        .iter()
        .skip(volatility_window.saturating_sub(1))
        .zip(rolling_std(closes, volatility_window)?)
        .map(|(&date, price)| PricePoint { date, price })
        .collect();

    let daily_returns = data
        .dates
        .iter()
        .skip(1)
        .zip(pct_change(closes))
        .map(|(&date, price)| PricePoint { date, price })
        .collect();

    Ok(StockAnalysis {
        ticker: data.ticker.clone(),
        daily_change: daily_change(closes)?,
        returns,
        recent,
        volatility_window,
        volatility,
        daily_returns,
        chart: chart_data(chart_history, period, settings)?,
    })
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ticker::Ticker;
use crate::error::{AnalysisError, AnalysisResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Ordered daily prices of one ticker.
///
/// Dates are strictly increasing and every price is finite; both are checked
/// on construction so downstream maths can index freely.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: Ticker,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

/// Several series restricted to the dates they all share.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub dates: Vec<NaiveDate>,
    /// One column per input series, in input order.
    pub columns: Vec<Vec<f64>>,
}

impl PriceSeries {
    pub fn new(ticker: Ticker, dates: Vec<NaiveDate>, prices: Vec<f64>) -> AnalysisResult<Self> {
        if dates.len() != prices.len() {
            return Err(AnalysisError::InvalidSeries(format!(
                "{}: {} dates but {} prices",
                ticker,
                dates.len(),
                prices.len()
            )));
        }
        if let Some(w) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AnalysisError::InvalidSeries(format!(
                "{}: dates not strictly increasing at {} -> {}",
                ticker, w[0], w[1]
            )));
        }
        if let Some(idx) = prices.iter().position(|p| !p.is_finite()) {
            return Err(AnalysisError::InvalidSeries(format!(
                "{}: non-finite price on {}",
                ticker, dates[idx]
            )));
        }
        Ok(Self {
            ticker,
            dates,
            prices,
        })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.prices
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.prices[idx])
    }

    /// Keep only the dates present in every series (SQL inner join on date).
    pub fn inner_join(series: &[&PriceSeries]) -> AnalysisResult<AlignedSeries> {
        let Some((first, rest)) = series.split_first() else {
            return Err(AnalysisError::EmptyData);
        };

        let dates: Vec<NaiveDate> = first
            .dates
            .iter()
            .filter(|d| rest.iter().all(|s| s.dates.binary_search(d).is_ok()))
            .copied()
            .collect();

        let columns = series
            .iter()
            .map(|s| {
                dates
                    .iter()
                    .filter_map(|d| s.price_on(*d))
                    .collect::<Vec<f64>>()
            })
            .collect();

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.print_alignment {
            for s in series {
                log::info!(
                    "Alignment: {} kept {} of {} rows",
                    s.ticker,
                    dates.len(),
                    s.len()
                );
            }
        }

        Ok(AlignedSeries { dates, columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(name: &str, days: &[u32], prices: &[f64]) -> PriceSeries {
        PriceSeries::new(
            Ticker::new(name),
            days.iter().map(|&x| d(x)).collect(),
            prices.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_unordered_duplicate_and_nan() {
        let t = Ticker::new("X");
        assert!(PriceSeries::new(t.clone(), vec![d(2), d(1)], vec![1.0, 2.0]).is_err());
        assert!(PriceSeries::new(t.clone(), vec![d(1), d(1)], vec![1.0, 2.0]).is_err());
        assert!(PriceSeries::new(t.clone(), vec![d(1), d(2)], vec![1.0, f64::NAN]).is_err());
        assert!(PriceSeries::new(t, vec![d(1)], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn inner_join_keeps_shared_dates_only() {
        let a = series("A", &[1, 2, 3, 5], &[10.0, 11.0, 12.0, 13.0]);
        let b = series("B", &[2, 3, 4, 5], &[20.0, 21.0, 22.0, 23.0]);
        let joined = PriceSeries::inner_join(&[&a, &b]).unwrap();
        assert_eq!(joined.dates, vec![d(2), d(3), d(5)]);
        assert_eq!(joined.columns[0], vec![11.0, 12.0, 13.0]);
        assert_eq!(joined.columns[1], vec![20.0, 21.0, 23.0]);
        assert_eq!(PriceSeries::inner_join(&[]), Err(AnalysisError::EmptyData));
    }
}

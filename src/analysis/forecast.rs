//! Price forecasting pipeline: smooth, pick `d`, scale, score on a held-out
//! tail, refit on everything, forecast forward.

use chrono::NaiveDate;

use crate::analysis::stationarity::differencing_order;
use crate::config::ForecastConfig;
use crate::domain::{PricePoint, PriceSeries};
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Arima, ArimaOrder, ForecastReport, ForecastTable};
use crate::transform::{StandardScaler, rolling_mean};
use crate::utils::maths_utils::{rmse, round_to};

fn fit_and_forecast(train: &[f64], order: ArimaOrder, horizon: usize) -> AnalysisResult<Vec<f64>> {
    let mut model = Arima::new(order.p, order.d, order.q);
    model.fit(train)?;
    model.forecast(horizon)
}

/// Hold out the last `horizon` points, fit on the rest, and score the
/// forecast against the held-out tail. RMSE is in the units of `values`.
pub fn evaluate_model(
    values: &[f64],
    order: ArimaOrder,
    horizon: usize,
    decimals: i32,
) -> AnalysisResult<f64> {
    let needed = horizon + order.min_observations();
    if values.len() < needed {
        return Err(AnalysisError::InsufficientData {
            needed,
            got: values.len(),
        });
    }

    let (train, test) = values.split_at(values.len() - horizon);

    #[cfg(debug_assertions)]
    if crate::config::DEBUG_FLAGS.print_evaluation_split {
        log::info!("Evaluation split: {} train / {} test", train.len(), test.len());
    }

    let predicted = fit_and_forecast(train, order, horizon)?;
    Ok(round_to(rmse(test, &predicted)?, decimals))
}

/// Run the full pipeline on `series` and lay the forecast out on consecutive
/// days beginning at `forecast_start`.
pub fn run_forecast(
    series: &PriceSeries,
    forecast_start: NaiveDate,
    config: &ForecastConfig,
) -> AnalysisResult<ForecastReport> {
    if series.is_empty() {
        return Err(AnalysisError::EmptyData);
    }

    let smoothed = rolling_mean(series.values(), config.rolling_window)?;
    if smoothed.is_empty() {
        return Err(AnalysisError::InsufficientData {
            needed: config.rolling_window,
            got: series.len(),
        });
    }
    let smoothed_dates = &series.dates()[config.rolling_window - 1..];

    let differencing = differencing_order(&smoothed, &config.stationarity)?;
    let order = ArimaOrder {
        p: config.orders.ar_order,
        d: differencing.d,
        q: config.orders.ma_order,
    };

    let (scaler, scaled) = StandardScaler::fit_transform(&smoothed)?;
    let rmse = evaluate_model(&scaled, order, config.horizon, config.rmse_decimals)?;

    let scaled_forecast = fit_and_forecast(&scaled, order, config.horizon)?;
    let forecast = scaler.inverse_transform(&scaled_forecast);
    if forecast.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::Computation(format!(
            "{} produced a non-finite forecast",
            order
        )));
    }
    let table = ForecastTable::from_start(forecast_start, &forecast)?;

    log::info!(
        "Forecast {}: {} on {} smoothed closes, RMSE {:.2}",
        series.ticker,
        order,
        smoothed.len(),
        rmse
    );

    let history = smoothed_dates
        .iter()
        .zip(&smoothed)
        .map(|(&date, &price)| PricePoint { date, price })
        .collect();

    Ok(ForecastReport {
        ticker: series.ticker.clone(),
        table,
        rmse,
        order,
        p_value: differencing.p_value,
        scaler,
        history,
    })
}

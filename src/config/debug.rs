//! Debugging feature flags.
//!
//! Toggle individual diagnostics here. Call sites are further gated by
//! `cfg(debug_assertions)`, so release builds stay quiet.

pub struct DebugFlags {
    /// Emit which provider served a series and how many rows came back.
    pub print_fetch: bool,
    /// Emit every ADF p-value visited during the differencing-order search.
    pub print_differencing_search: bool,
    /// Emit fitted ARIMA coefficients and information criteria.
    pub print_arima_fit: bool,
    /// Emit the train/test split sizes used for RMSE evaluation.
    pub print_evaluation_split: bool,
    /// Emit ticker alignment diagnostics (rows dropped by date joins).
    pub print_alignment: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_fetch: true,
    print_differencing_search: false,
    print_arima_fit: false,
    print_evaluation_split: false,
    print_alignment: false,
};

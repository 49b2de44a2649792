/// Every user-facing string in one place
pub struct UiText {
    pub app_title: &'static str,
    pub brand: &'static str,
    pub brand_subtitle: &'static str,

    // Search
    pub search_hint: &'static str,
    pub search_no_results: &'static str,

    // Home
    pub home_heading: &'static str,
    pub home_subheading: &'static str,
    pub stat_avg_return: &'static str,
    pub stat_universe: &'static str,
    pub stat_universe_sub: &'static str,
    pub stat_verification: &'static str,
    pub stat_verification_sub: &'static str,
    pub stat_system: &'static str,
    pub top_strategies_heading: &'static str,
    pub top_strategies_empty: &'static str,
    pub system_events_heading: &'static str,
    pub system_events_empty: &'static str,

    // Stock detail
    pub loading_market_data: &'static str,
    pub no_price_data: &'static str,
    pub no_price_data_hint: &'static str,
    pub key_statistics: &'static str,
    pub about_heading: &'static str,
    pub no_description: &'static str,
    pub refetch: &'static str,
    pub candle_toggle: &'static str,
    pub volume_toggle: &'static str,
    pub today: &'static str,

    // Simulator
    pub simulator_heading: &'static str,
    pub parameters_heading: &'static str,
    pub run_backtest: &'static str,
    pub running_backtest: &'static str,
    pub waiting_for_result: &'static str,
    pub final_value: &'static str,
    pub portfolio_value_heading: &'static str,
    pub holdings_heading: &'static str,
    pub no_holdings: &'static str,

    // Compare
    pub compare_heading: &'static str,
    pub compare_subheading: &'static str,
    pub compare_ids_hint: &'static str,
    pub compare_button: &'static str,
    pub normalized_curves_heading: &'static str,
    pub optimize_heading: &'static str,
    pub optimize_button: &'static str,

    // Settings
    pub settings_heading: &'static str,
    pub settings_subheading: &'static str,
    pub appearance_heading: &'static str,
    pub system_status_heading: &'static str,
    pub batch_heading: &'static str,
    pub strategy_defaults_heading: &'static str,

    // Generic states
    pub not_found: &'static str,
    pub failed_to_load: &'static str,
    pub loading: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Stock MSA Quant Dashboard",
    brand: "QUANT",
    brand_subtitle: "Stock MSA",

    search_hint: "Search stocks (e.g. 005930, Samsung)",
    search_no_results: "No results found.",

    home_heading: "Portfolio Overview",
    home_subheading: "System status and recent backtest performance.",
    stat_avg_return: "Avg Strategy Return (YTD)",
    stat_universe: "Total Universe",
    stat_universe_sub: "KOSPI, KOSDAQ, KONEX",
    stat_verification: "Data Verification",
    stat_verification_sub: "DART Financials Verified",
    stat_system: "System Status",
    top_strategies_heading: "Top Strategies",
    top_strategies_empty: "No backtest results yet.",
    system_events_heading: "System Events",
    system_events_empty: "No batch jobs triggered in this session.",

    loading_market_data: "Loading market data...",
    no_price_data: "No Price Data Found",
    no_price_data_hint: "Please run the Price Batch in Settings for",
    key_statistics: "Key Statistics",
    about_heading: "About",
    no_description: "No description available for this company.",
    refetch: "⟳ Refresh",
    candle_toggle: "Candles",
    volume_toggle: "Volume",
    today: "TODAY",

    simulator_heading: "Strategy Lab",
    parameters_heading: "Parameters",
    run_backtest: "▶ Run Backtest",
    running_backtest: "Running Simulation...",
    waiting_for_result: "Waiting for the simulation result...",
    final_value: "Final Portfolio Value",
    portfolio_value_heading: "Portfolio Value",
    holdings_heading: "Latest Holdings",
    no_holdings: "No holdings in the latest snapshot.",

    compare_heading: "Strategy Compare",
    compare_subheading: "Compare multiple backtest results and grid search optimization rankings.",
    compare_ids_hint: "Result ids, e.g. 1, 2, 3",
    compare_button: "Compare",
    normalized_curves_heading: "Normalized Equity (start = 100)",
    optimize_heading: "Grid Search Optimization (Top 5)",
    optimize_button: "Run Optimization",

    settings_heading: "Settings",
    settings_subheading: "System configuration and infrastructure control.",
    appearance_heading: "Appearance",
    system_status_heading: "System Status",
    batch_heading: "Batch Control Center",
    strategy_defaults_heading: "Strategy Defaults",

    not_found: "Not found.",
    failed_to_load: "Failed to load.",
    loading: "Loading...",
};

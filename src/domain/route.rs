use serde::{Deserialize, Serialize};

use crate::config::API;

/// Pages reachable from the navigation shell, addressed by URL-style paths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Home,
    Stock(String),
    Simulator,
    Compare,
    Settings,
}

impl Route {
    /// Unknown paths, and `/stock/` without a symbol, land on Home.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/simulator" => Route::Simulator,
            "/compare" => Route::Compare,
            "/settings" => Route::Settings,
            _ => match trimmed.strip_prefix("/stock/") {
                Some(symbol) if !symbol.is_empty() && !symbol.contains('/') => {
                    Route::Stock(symbol.to_string())
                }
                _ => Route::Home,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Stock(symbol) => format!("/stock/{}", symbol),
            Route::Simulator => "/simulator".to_string(),
            Route::Compare => "/compare".to_string(),
            Route::Settings => "/settings".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Overview",
            Route::Stock(_) => "Market",
            Route::Simulator => "Strategy Lab",
            Route::Compare => "Strategy Comparison",
            Route::Settings => "Settings",
        }
    }
}

/// A sidebar entry. Active when the current path equals `route.path()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

impl NavItem {
    pub fn is_active(&self, current: &Route) -> bool {
        self.route.path() == current.path()
    }
}

pub fn nav_items() -> Vec<NavItem> {
    vec![
        NavItem {
            label: "Home",
            route: Route::Home,
        },
        NavItem {
            label: "Charts",
            route: Route::Stock(API.query.default_symbol.to_string()),
        },
        NavItem {
            label: "Simulator",
            route: Route::Simulator,
        },
        NavItem {
            label: "Compare",
            route: Route::Compare,
        },
        NavItem {
            label: "Settings",
            route: Route::Settings,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/simulator"), Route::Simulator);
        assert_eq!(Route::parse("/compare"), Route::Compare);
        assert_eq!(Route::parse("/settings"), Route::Settings);
        assert_eq!(Route::parse("/stock/000660"), Route::Stock("000660".into()));
    }

    #[test]
    fn test_unknown_and_empty_symbol_fall_back_to_home() {
        assert_eq!(Route::parse("/nowhere"), Route::Home);
        assert_eq!(Route::parse("/stock/"), Route::Home);
        assert_eq!(Route::parse("/stock"), Route::Home);
        assert_eq!(Route::parse("/stock/1/2"), Route::Home);
    }

    #[test]
    fn test_path_is_inverse_of_parse() {
        for route in [
            Route::Home,
            Route::Stock("005930".into()),
            Route::Simulator,
            Route::Compare,
            Route::Settings,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_charts_item_active_only_for_its_symbol() {
        let items = nav_items();
        let charts = items.iter().find(|i| i.label == "Charts").unwrap();
        assert!(charts.is_active(&Route::Stock("005930".into())));
        assert!(!charts.is_active(&Route::Stock("000660".into())));
        let active: Vec<_> = items.iter().filter(|i| i.is_active(&Route::Home)).collect();
        assert_eq!(active.len(), 1);
    }
}

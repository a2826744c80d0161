//! Two-page router
//!
//! The UI has a home page (recent entries) and a full list. The page is picked
//! from a URL fragment (`#home`, `#all`); anything unrecognised is home.

use std::fmt;

/// Which page is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    All,
}

impl Route {
    /// Resolve a fragment such as `#all` (the leading `#` is optional)
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        let name = fragment
            .map(|f| f.trim().trim_start_matches('#').to_lowercase())
            .unwrap_or_default();

        match name.as_str() {
            "all" => Route::All,
            _ => Route::Home,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::All => "all",
        }
    }

    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Home => "#home",
            Route::All => "#all",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the current page
#[derive(Debug, Clone, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the page named by `fragment`
    pub fn go(&mut self, fragment: Option<&str>) -> Route {
        let route = Route::from_fragment(fragment);
        if route != self.current {
            tracing::debug!(from = %self.current, to = %route, "Navigating");
        }
        self.current = route;
        route
    }

    pub fn current(&self) -> Route {
        self.current
    }
}

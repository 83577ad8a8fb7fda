use super::BusRoute;

/// Which routes the full-screen map shows. Owned by the map page; filtering
/// derives a view and never mutates the catalogue itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Ridden,
    Photos,
}

impl FilterMode {
    pub const ALL_MODES: [Self; 3] = [Self::All, Self::Ridden, Self::Photos];

    #[must_use]
    pub fn matches(self, route: &BusRoute) -> bool {
        match self {
            Self::All => true,
            Self::Ridden => route.ridden,
            Self::Photos => route.has_photo,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Ridden => "Ridden",
            Self::Photos => "With Photos",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(ridden: bool, has_photo: bool) -> BusRoute {
        BusRoute {
            dataset_id: "1".to_string(),
            bus_number: "12".to_string(),
            service_code: "PB0001:12".to_string(),
            operator_name: "Test Operator".to_string(),
            line_name: "12".to_string(),
            geometry: Vec::new(),
            images: Vec::new(),
            has_photo,
            ridden,
            ride_count: None,
        }
    }

    #[test]
    fn test_filter_matches() {
        assert!(FilterMode::All.matches(&route(false, false)));
        assert!(FilterMode::Ridden.matches(&route(true, false)));
        assert!(!FilterMode::Ridden.matches(&route(false, true)));
        assert!(FilterMode::Photos.matches(&route(false, true)));
        assert!(!FilterMode::Photos.matches(&route(true, false)));
    }
}

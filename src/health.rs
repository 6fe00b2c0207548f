use std::fmt::{Display, Formatter};

/// The service is stateless, so there is only one state to report; richer
/// variants can return here once a health check has something to degrade on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HealthState {
    Healthy,
}

impl Display for HealthState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "Healthy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_renders_compact_text() {
        assert_eq!(HealthState::Healthy.to_string(), "Healthy");
    }
}

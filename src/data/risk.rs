//! Weather risk scoring
//!
//! Risk is a bounded [0, 1] heuristic built from additive threshold rules.
//! Rules are independent: crossing a higher threshold adds on top of the
//! lower ones, and the sum saturates at 1.0.
//!
//! Two scorers exist for two data fidelity tiers. [`risk_score`] is used for
//! live data that carries pressure and precipitation amounts;
//! [`simulated_risk_score`] is the lighter variant used by the simulation
//! generator.

use serde::{Deserialize, Serialize};

/// Physical conditions the full scorer looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Surface pressure in hPa
    pub pressure: f64,
    /// Relative humidity percentage
    pub humidity: f64,
}

impl Default for RiskInputs {
    /// Nominal conditions: nothing fires
    fn default() -> Self {
        Self {
            temperature: 15.0,
            wind_speed: 0.0,
            precipitation: 0.0,
            pressure: 1013.25,
            humidity: 50.0,
        }
    }
}

/// Scores a bundle of conditions. Always returns a value in [0, 1].
pub fn risk_score(inputs: &RiskInputs) -> f64 {
    let mut risk = 0.0;

    // Temperature extremes
    if inputs.temperature > 35.0 {
        risk += 0.2;
    }
    if inputs.temperature < -10.0 {
        risk += 0.2;
    }
    if inputs.temperature > 40.0 || inputs.temperature < -20.0 {
        risk += 0.2;
    }

    // Wind: gale, strong gale, hurricane force (km/h)
    if inputs.wind_speed > 50.0 {
        risk += 0.3;
    }
    if inputs.wind_speed > 75.0 {
        risk += 0.2;
    }
    if inputs.wind_speed > 100.0 {
        risk += 0.2;
    }

    // Precipitation (mm)
    if inputs.precipitation > 10.0 {
        risk += 0.2;
    }
    if inputs.precipitation > 25.0 {
        risk += 0.2;
    }
    if inputs.precipitation > 50.0 {
        risk += 0.2;
    }

    // Low pressure systems (hPa)
    if inputs.pressure < 1000.0 {
        risk += 0.1;
    }
    if inputs.pressure < 980.0 {
        risk += 0.2;
    }

    // Heat index
    if inputs.humidity > 80.0 && inputs.temperature > 30.0 {
        risk += 0.1;
    }

    clamp_risk(risk)
}

/// Conditions available to the simulation generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedRiskInputs {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Precipitation amount, same scale the generator produces
    pub precipitation: f64,
    /// Generator volatility sample in [0, 1)
    pub volatility: f64,
}

/// Simplified scorer for data without pressure or humidity. Always in [0, 1].
pub fn simulated_risk_score(inputs: &SimulatedRiskInputs) -> f64 {
    let mut risk = 0.0;
    if inputs.wind_speed > 40.0 {
        risk += 0.3;
    }
    if inputs.precipitation > 50.0 {
        risk += 0.3;
    }
    if inputs.temperature > 35.0 || inputs.temperature < -10.0 {
        risk += 0.2;
    }
    if inputs.volatility > 0.9 {
        risk += 0.2;
    }
    clamp_risk(risk)
}

/// Clamps any risk value into [0, 1]. NaN maps to 0.
pub fn clamp_risk(risk: f64) -> f64 {
    if risk.is_nan() {
        return 0.0;
    }
    risk.clamp(0.0, 1.0)
}

/// Coarse band used for labels and colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    /// Band for a score: above 0.7 is extreme, above 0.4 high, above 0.2 moderate
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            RiskLevel::Extreme
        } else if score > 0.4 {
            RiskLevel::High
        } else if score > 0.2 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Extreme => "EXTREME",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_conditions_score_zero() {
        assert_eq!(risk_score(&RiskInputs::default()), 0.0);
    }

    #[test]
    fn test_first_temperature_threshold_only() {
        let inputs = RiskInputs {
            temperature: 36.0,
            ..Default::default()
        };
        assert_eq!(risk_score(&inputs), 0.2);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let inputs = RiskInputs {
            temperature: 35.0,
            wind_speed: 50.0,
            precipitation: 10.0,
            pressure: 1000.0,
            humidity: 80.0,
        };
        assert_eq!(risk_score(&inputs), 0.0);
    }

    #[test]
    fn test_extreme_cold_stacks() {
        let inputs = RiskInputs {
            temperature: -25.0,
            ..Default::default()
        };
        assert!((risk_score(&inputs) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_wind_tiers_stack() {
        let at = |wind_speed| {
            risk_score(&RiskInputs {
                wind_speed,
                ..Default::default()
            })
        };
        assert!((at(60.0) - 0.3).abs() < 1e-9);
        assert!((at(80.0) - 0.5).abs() < 1e-9);
        assert!((at(101.0) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_tiers_stack() {
        let inputs = RiskInputs {
            pressure: 975.0,
            ..Default::default()
        };
        assert!((risk_score(&inputs) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_heat_index_needs_both_conditions() {
        let humid_hot = RiskInputs {
            temperature: 31.0,
            humidity: 85.0,
            ..Default::default()
        };
        let humid_mild = RiskInputs {
            temperature: 25.0,
            humidity: 85.0,
            ..Default::default()
        };
        assert!((risk_score(&humid_hot) - 0.1).abs() < 1e-9);
        assert_eq!(risk_score(&humid_mild), 0.0);
    }

    #[test]
    fn test_accumulation_saturates_at_one() {
        let inputs = RiskInputs {
            temperature: 45.0,
            wind_speed: 110.0,
            precipitation: 60.0,
            pressure: 970.0,
            humidity: 90.0,
        };
        assert_eq!(risk_score(&inputs), 1.0);
    }

    #[test]
    fn test_simulated_scorer() {
        let calm = SimulatedRiskInputs {
            temperature: 20.0,
            wind_speed: 10.0,
            precipitation: 0.0,
            volatility: 0.1,
        };
        assert_eq!(simulated_risk_score(&calm), 0.0);

        let stormy = SimulatedRiskInputs {
            temperature: 20.0,
            wind_speed: 41.0,
            precipitation: 95.0,
            volatility: 0.95,
        };
        assert!((simulated_risk_score(&stormy) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_scorers_differ_for_same_conditions() {
        // 45 km/h is windy enough for the simulation tier but not the live one
        let live = risk_score(&RiskInputs {
            wind_speed: 45.0,
            ..Default::default()
        });
        let simulated = simulated_risk_score(&SimulatedRiskInputs {
            temperature: 15.0,
            wind_speed: 45.0,
            precipitation: 0.0,
            volatility: 0.0,
        });
        assert_eq!(live, 0.0);
        assert!((simulated - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_risk() {
        assert_eq!(clamp_risk(1.7), 1.0);
        assert_eq!(clamp_risk(-0.3), 0.0);
        assert_eq!(clamp_risk(f64::NAN), 0.0);
        assert_eq!(clamp_risk(0.45), 0.45);
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.2), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.5), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.71), RiskLevel::Extreme);
        assert_eq!(RiskLevel::Extreme.label(), "EXTREME");
    }
}

use serde::Serialize;

use crate::data::model::VehicleRecord;

/// Headline figures shown under the charts. Each is `None` when there is
/// nothing to divide by.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    /// Share of alternative-fuel vehicles that are pedicabs.
    pub pedicab_share_of_alternative: Option<f64>,
    /// Mean model year of electric vehicles.
    pub electric_mean_year: Option<f64>,
    /// Mean model year of gasoline vehicles.
    pub gasoline_mean_year: Option<f64>,
    /// Share of wheelchair-accessible vehicles on alternative fuels.
    pub alternative_share_of_accessible: Option<f64>,
}

pub fn is_alternative_fuel(fuel: &str) -> bool {
    !(fuel.eq_ignore_ascii_case("gasoline") || fuel.eq_ignore_ascii_case("diesel"))
}

pub fn is_accessible(flag: &str) -> bool {
    ["y", "yes", "true", "1"]
        .iter()
        .any(|t| flag.eq_ignore_ascii_case(t))
}

fn ratio(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

fn mean(sum: i64, n: usize) -> Option<f64> {
    (n > 0).then(|| sum as f64 / n as f64)
}

impl Insights {
    pub fn compute<'a>(records: impl IntoIterator<Item = &'a VehicleRecord>) -> Self {
        let mut alternative = 0;
        let mut alternative_pedicabs = 0;
        let mut accessible = 0;
        let mut accessible_alternative = 0;
        let (mut electric_sum, mut electric_n) = (0i64, 0usize);
        let (mut gasoline_sum, mut gasoline_n) = (0i64, 0usize);

        for r in records {
            let alt = r.fuel_source.as_deref().is_some_and(is_alternative_fuel);
            if alt {
                alternative += 1;
                if r
                    .vehicle_type
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case("pedicab"))
                {
                    alternative_pedicabs += 1;
                }
            }
            if r.wheelchair_accessible.as_deref().is_some_and(is_accessible) {
                accessible += 1;
                if alt {
                    accessible_alternative += 1;
                }
            }
            if let (Some(fuel), Some(year)) = (r.fuel_source.as_deref(), r.model_year) {
                if fuel.eq_ignore_ascii_case("electric") {
                    electric_sum += i64::from(year);
                    electric_n += 1;
                } else if fuel.eq_ignore_ascii_case("gasoline") {
                    gasoline_sum += i64::from(year);
                    gasoline_n += 1;
                }
            }
        }

        Insights {
            pedicab_share_of_alternative: ratio(alternative_pedicabs, alternative),
            electric_mean_year: mean(electric_sum, electric_n),
            gasoline_mean_year: mean(gasoline_sum, gasoline_n),
            alternative_share_of_accessible: ratio(accessible_alternative, accessible),
        }
    }

    /// Bullet lines for the insights panel.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(share) = self.pedicab_share_of_alternative {
            lines.push(format!(
                "{:.0}% of eco-friendly vehicles are pedicabs",
                share * 100.0
            ));
        }
        match (self.electric_mean_year, self.gasoline_mean_year) {
            (Some(e), Some(g)) => lines.push(format!(
                "Electric vehicles have {e:.0} avg. model year vs {g:.0} for gasoline"
            )),
            (Some(e), None) => lines.push(format!("Electric vehicles have {e:.0} avg. model year")),
            (None, Some(g)) => lines.push(format!("Gasoline vehicles have {g:.0} avg. model year")),
            (None, None) => {}
        }
        if let Some(share) = self.alternative_share_of_accessible {
            lines.push(format!(
                "{:.0}% of wheelchair accessible vehicles use alternative fuels",
                share * 100.0
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(vehicle_type: &str, fuel: &str, year: i32, accessible: &str) -> VehicleRecord {
        VehicleRecord {
            vehicle_type: Some(vehicle_type.into()),
            fuel_source: Some(fuel.into()),
            model_year: Some(year),
            wheelchair_accessible: Some(accessible.into()),
            ..Default::default()
        }
    }

    #[test]
    fn figures_from_small_fleet() {
        let records = vec![
            rec("Pedicab", "Human Powered", 2020, "N"),
            rec("Taxi", "Electric", 2022, "Y"),
            rec("Taxi", "Electric", 2020, "N"),
            rec("Taxi", "Gasoline", 2010, "Y"),
            rec("Livery", "Gasoline", 2016, "N"),
        ];
        let insights = Insights::compute(&records);

        assert_eq!(insights.pedicab_share_of_alternative, Some(1.0 / 3.0));
        assert_eq!(insights.electric_mean_year, Some(2021.0));
        assert_eq!(insights.gasoline_mean_year, Some(2013.0));
        assert_eq!(insights.alternative_share_of_accessible, Some(0.5));

        let lines = insights.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "33% of eco-friendly vehicles are pedicabs");
        assert_eq!(lines[1], "Electric vehicles have 2021 avg. model year vs 2013 for gasoline");
    }

    #[test]
    fn empty_input_has_no_figures() {
        let insights = Insights::compute(std::iter::empty());
        assert_eq!(insights, Insights::default());
        assert!(insights.lines().is_empty());
    }

    #[test]
    fn classification() {
        assert!(is_alternative_fuel("Hybrid"));
        assert!(!is_alternative_fuel("DIESEL"));
        assert!(is_accessible("Yes"));
        assert!(!is_accessible("N"));
    }
}

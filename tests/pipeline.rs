use std::collections::BTreeSet;
use std::io::Write;

use fleetboard::charts::{ChartId, ChartKind, ChartSpec};
use fleetboard::config::ChartLimits;
use fleetboard::dashboard::{render, Dashboard};
use fleetboard::data::filter::{filtered_indices, FilterSelection, FilteredView};
use fleetboard::data::loader::load_file;
use fleetboard::data::model::{FleetDataset, YearRange};

const FIXTURE: &str = "\
Vehicle Type,Vehicle Fuel Source,Vehicle Model Year,Status,Company Name,Wheelchair Accessible,Vehicle Make,Vehicle Model
Taxi,Gasoline,2012,ACTIVE,Yellow Cab,N,Toyota,Camry
Taxi,Gasoline,2015,ACTIVE,Yellow Cab,Y,Ford,Fusion
Taxi,Gasoline,2019,INACTIVE,Checker,N,Toyota,Camry
Pedicab,Electric,2022,ACTIVE,Pedal Power,N,Orange,Rickshaw
Pedicab,Electric,2023,ACTIVE,Pedal Power,N,Orange,Rickshaw
";

fn load_fixture() -> FleetDataset {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    file.flush().unwrap();
    load_file(file.path()).unwrap()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn chart(charts: &[ChartSpec], id: ChartId) -> &ChartSpec {
    charts.iter().find(|c| c.id == id).unwrap()
}

#[test]
fn taxi_gasoline_selection_drives_every_chart() {
    let ds = load_fixture();
    let selection = FilterSelection {
        vehicle_types: set(&["Taxi"]),
        fuel_sources: set(&["Gasoline"]),
        year_range: YearRange::new(1980, 2025),
    };

    let view = FilteredView::new(&ds, &selection);
    assert_eq!(view.len(), 3);

    let charts = render(&ds, &selection);
    assert_eq!(charts.len(), 7);

    let ChartKind::Bar(companies) = &chart(&charts, ChartId::TopCompanies).kind else {
        panic!("top companies should be a bar chart");
    };
    let counts: Vec<(&str, usize)> = companies
        .bars
        .iter()
        .map(|b| (b.label.as_str(), b.count))
        .collect();
    assert_eq!(counts, vec![("Yellow Cab", 2), ("Checker", 1)]);

    let ChartKind::Treemap(tree) = &chart(&charts, ChartId::TypeFuelComposition).kind else {
        panic!("composition should be a treemap");
    };
    assert_eq!(tree.total(), 3);
    assert_eq!(tree.nodes[1].id, "Taxi/Gasoline");

    let ChartKind::Histogram(hist) = &chart(&charts, ChartId::AgeDistribution).kind else {
        panic!("age distribution should be a histogram");
    };
    assert_eq!(hist.bins.len(), 20);
    assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 3);
}

#[test]
fn filtered_view_is_exact_subset() {
    let ds = load_fixture();
    let selections = [
        FilterSelection::all(&ds),
        FilterSelection {
            vehicle_types: set(&["Pedicab", "Taxi"]),
            fuel_sources: set(&["Electric"]),
            year_range: YearRange::new(2010, 2022),
        },
        FilterSelection {
            vehicle_types: set(&["Taxi"]),
            fuel_sources: set(&["Gasoline", "Electric"]),
            year_range: YearRange::new(2015, 2015),
        },
    ];

    for selection in &selections {
        let indices = filtered_indices(&ds, selection);
        for (i, record) in ds.records().iter().enumerate() {
            assert_eq!(indices.contains(&i), selection.matches(record));
        }
        assert_eq!(indices, filtered_indices(&ds, selection));
    }
}

#[test]
fn single_year_keeps_only_that_year() {
    let ds = load_fixture();
    let mut selection = FilterSelection::all(&ds);
    selection.year_range = YearRange::new(2022, 2022);
    let view = FilteredView::new(&ds, &selection);
    assert_eq!(view.len(), 1);
    assert!(view.iter().all(|r| r.model_year == Some(2022)));
}

#[test]
fn empty_selection_renders_seven_empty_charts() {
    let ds = load_fixture();
    let mut selection = FilterSelection::all(&ds);
    selection.vehicle_types.clear();

    let dashboard = Dashboard::build(&ds, &selection, &ChartLimits::default());
    assert_eq!(dashboard.visible, 0);
    assert_eq!(dashboard.total, 5);
    assert_eq!(dashboard.charts.len(), 7);
    assert!(dashboard.charts.iter().all(|c| c.point_count() == 0));
    assert!(dashboard.insights.lines().is_empty());
}

#[test]
fn option_lists_and_year_bounds() {
    let ds = load_fixture();
    assert_eq!(ds.vehicle_types(), ["Taxi", "Pedicab"]);
    assert_eq!(ds.fuel_sources(), ["Gasoline", "Electric"]);
    assert_eq!(ds.year_bounds(), Some(YearRange::new(2012, 2023)));
}

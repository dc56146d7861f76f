use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use fleetboard::data::model::Column;

#[derive(Parser, Debug)]
#[command(about = "Write a synthetic combined_vehicles table (.csv and .parquet)")]
struct Args {
    /// Number of vehicles to generate.
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for &(item, w) in items {
            if roll < w {
                return item;
            }
            roll -= w;
        }
        items[items.len() - 1].0
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i32
    }
}

const VEHICLE_TYPES: [(&str, f64); 5] = [
    ("Taxi", 0.55),
    ("Livery", 0.2),
    ("Pedicab", 0.1),
    ("Charter Sightseeing", 0.1),
    ("Medical Carrier", 0.05),
];

const STATUSES: [(&str, f64); 4] = [
    ("ACTIVE", 0.7),
    ("INACTIVE", 0.15),
    ("RESERVED", 0.1),
    ("SURRENDERED", 0.05),
];

const MOTOR_VEHICLES: [(&str, &str); 10] = [
    ("Toyota", "Camry"),
    ("Toyota", "Prius"),
    ("Toyota", "Sienna"),
    ("Ford", "Fusion"),
    ("Ford", "Transit"),
    ("Chevrolet", "Suburban"),
    ("Tesla", "Model 3"),
    ("Lincoln", "Navigator"),
    ("Dodge", "Grand Caravan"),
    ("Hyundai", "Ioniq"),
];

const PEDICABS: [(&str, &str); 2] = [("Main Street", "Pedicab"), ("Orange", "Rickshaw")];

struct Row {
    vehicle_type: String,
    fuel: String,
    year: i32,
    status: String,
    company: String,
    accessible: String,
    make: String,
    model: String,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let companies: Vec<String> = (1..=40).map(|i| format!("Fleet Operator {i:02}")).collect();

    (0..rows)
        .map(|_| {
            let vehicle_type = rng.weighted(&VEHICLE_TYPES);
            let (fuel, year, (make, model)) = if vehicle_type == "Pedicab" {
                let pick = PEDICABS[rng.range(0, PEDICABS.len() as i32 - 1) as usize];
                let fuel = rng.weighted(&[("Human Powered", 0.6), ("Electric", 0.4)]);
                (fuel, rng.range(2016, 2025), pick)
            } else {
                let pick = MOTOR_VEHICLES[rng.range(0, MOTOR_VEHICLES.len() as i32 - 1) as usize];
                let fuel = rng.weighted(&[
                    ("Gasoline", 0.6),
                    ("Hybrid", 0.25),
                    ("Electric", 0.08),
                    ("Flex Fuel", 0.05),
                    ("Diesel", 0.02),
                ]);
                let year = match fuel {
                    "Electric" => rng.range(2017, 2025),
                    "Hybrid" => rng.range(2008, 2025),
                    _ => rng.range(1980, 2024),
                };
                (fuel, year, pick)
            };
            let accessible = if rng.next_f64() < 0.12 { "Y" } else { "N" };
            // Skew toward the first operators so the top-10 chart has a shape.
            let company_idx = ((rng.next_f64().powi(2)) * companies.len() as f64) as usize;

            Row {
                vehicle_type: vehicle_type.to_string(),
                fuel: fuel.to_string(),
                year,
                status: rng.weighted(&STATUSES).to_string(),
                company: companies[company_idx.min(companies.len() - 1)].clone(),
                accessible: accessible.to_string(),
                make: make.to_string(),
                model: model.to_string(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(Column::ALL.map(Column::header))?;
    for r in rows {
        writer.write_record([
            r.vehicle_type.as_str(),
            r.fuel.as_str(),
            r.year.to_string().as_str(),
            r.status.as_str(),
            r.company.as_str(),
            r.accessible.as_str(),
            r.make.as_str(),
            r.model.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let fields: Vec<Field> = Column::ALL
        .iter()
        .map(|c| {
            let dtype = if *c == Column::ModelYear { DataType::Int32 } else { DataType::Utf8 };
            Field::new(c.header(), dtype, false)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.vehicle_type.as_str()),
            text(|r| r.fuel.as_str()),
            Arc::new(Int32Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            text(|r| r.status.as_str()),
            text(|r| r.company.as_str()),
            text(|r| r.accessible.as_str()),
            text(|r| r.make.as_str()),
            text(|r| r.model.as_str()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);
    let rows = generate(args.rows, &mut rng);

    let csv_path = args.out_dir.join("combined_vehicles.csv");
    let parquet_path = args.out_dir.join("combined_vehicles.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} vehicles to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

const CLASSES: [&str; 8] = ["L6", "H5", "L5", "H6", "LL6", "l6", "EH4", "Iron, IIIAB"];
const PREFIXES: [&str; 6] = ["Ab", "Kor", "Mur", "Sik", "Tal", "Zel"];
const SUFFIXES: [&str; 5] = ["ee", "ington", "avka", "oro", "hal"];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct SampleRecord {
    name: String,
    id: String,
    recclass: Option<String>,
    mass: Option<f64>,
    fall: String,
    year: Option<String>,
    reclat: Option<f64>,
    reclong: Option<f64>,
}

fn generate(rng: &mut SimpleRng, count: usize) -> Vec<SampleRecord> {
    (0..count)
        .map(|i| {
            let name = format!("{}{} {:03}", rng.pick(&PREFIXES), rng.pick(&SUFFIXES), i);
            // Masses span several orders of magnitude; about a fifth are unknown.
            let mass = (!rng.chance(0.2))
                .then(|| (10f64.powf(rng.next_f64() * 6.0) * 100.0).round() / 100.0);
            let year = (!rng.chance(0.05))
                .then(|| format!("{}-01-01T00:00:00.000", 1800 + (rng.next_f64() * 220.0) as i32));
            let located = !rng.chance(0.1);

            SampleRecord {
                name,
                id: (i + 1).to_string(),
                recclass: (!rng.chance(0.02)).then(|| rng.pick(&CLASSES).to_string()),
                mass,
                fall: if rng.chance(0.3) { "Fell" } else { "Found" }.to_string(),
                year,
                reclat: located.then(|| rng.next_f64() * 180.0 - 90.0),
                reclong: located.then(|| rng.next_f64() * 360.0 - 180.0),
            }
        })
        .collect()
}

fn write_parquet(records: &[SampleRecord], path: &str) {
    let text = |f: fn(&SampleRecord) -> Option<String>| {
        StringArray::from(records.iter().map(f).collect::<Vec<_>>())
    };
    let number = |f: fn(&SampleRecord) -> Option<f64>| {
        Float64Array::from(records.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, true),
        Field::new("id", DataType::Utf8, true),
        Field::new("nametype", DataType::Utf8, true),
        Field::new("recclass", DataType::Utf8, true),
        Field::new("mass", DataType::Float64, true),
        Field::new("fall", DataType::Utf8, true),
        Field::new("year", DataType::Utf8, true),
        Field::new("reclat", DataType::Float64, true),
        Field::new("reclong", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| Some(r.name.clone()))),
            Arc::new(text(|r| Some(r.id.clone()))),
            Arc::new(text(|_| Some("Valid".to_string()))),
            Arc::new(text(|r| r.recclass.clone())),
            Arc::new(number(|r| r.mass)),
            Arc::new(text(|r| Some(r.fall.clone()))),
            Arc::new(text(|r| r.year.clone())),
            Arc::new(number(|r| r.reclat)),
            Arc::new(number(|r| r.reclong)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

/// Same shape as the public API: every scalar is a string.
fn write_json(records: &[SampleRecord], path: &str) {
    let rows: Vec<serde_json::Value> = records
        .iter()
        .map(|r| {
            let mut row = json!({
                "name": r.name,
                "id": r.id,
                "nametype": "Valid",
                "fall": r.fall,
            });
            let obj = row.as_object_mut().expect("json! object literal");
            if let Some(class) = &r.recclass {
                obj.insert("recclass".into(), json!(class));
            }
            if let Some(mass) = r.mass {
                obj.insert("mass".into(), json!(mass.to_string()));
            }
            if let Some(year) = &r.year {
                obj.insert("year".into(), json!(year));
            }
            if let (Some(lat), Some(lon)) = (r.reclat, r.reclong) {
                obj.insert("reclat".into(), json!(format!("{lat:.6}")));
                obj.insert("reclong".into(), json!(format!("{lon:.6}")));
                obj.insert(
                    "geolocation".into(),
                    json!({ "latitude": format!("{lat}"), "longitude": format!("{lon}") }),
                );
            }
            row
        })
        .collect();

    let text = serde_json::to_string_pretty(&rows).expect("Failed to serialise JSON");
    std::fs::write(path, text).expect("Failed to write JSON");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let records = generate(&mut rng, 2_000);

    write_parquet(&records, "sample_meteorites.parquet");
    write_json(&records, "sample_meteorites.json");

    println!(
        "Wrote {} meteorites to sample_meteorites.parquet and sample_meteorites.json",
        records.len()
    );
}

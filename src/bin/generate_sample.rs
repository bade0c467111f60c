use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const FRAMES: u64 = 900;
const FRAME_PERIOD: f64 = 1.0 / 30.0;

/// Minimal deterministic PRNG (xoshiro256**), seeded with splitmix64.
struct Rng {
    state: [u64; 4],
}

impl Rng {
    fn new(seed: u64) -> Self {
        let mut x = seed;
        let mut state = [0u64; 4];
        for slot in &mut state {
            x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = x;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            *slot = z ^ (z >> 31);
        }
        Rng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Slip angle that drifts slowly through a cornering manoeuvre.
fn true_angle(frame: u64) -> f64 {
    let t = frame as f64 * FRAME_PERIOD;
    4.0 + 6.0 * (t * 0.4).sin()
}

fn main() -> Result<()> {
    let mut rng = Rng::new(7);

    let mut frames = Vec::with_capacity(FRAMES as usize);
    let mut angles = Vec::with_capacity(FRAMES as usize);
    let mut times = Vec::with_capacity(FRAMES as usize);

    let mut t = 0.0;
    for frame in 0..FRAMES {
        let angle = match rng.uniform() {
            // tracker lost the features
            p if p < 0.05 => 0.0,
            // flow vectors dominated by a passing object
            p if p < 0.07 => rng.gauss(0.0, 90.0),
            _ => true_angle(frame) + rng.gauss(0.0, 0.4),
        };

        frames.push(frame as i64);
        angles.push(angle);
        times.push(t);

        // Processing time: mostly on budget, occasionally a slow frame.
        let slow = if rng.uniform() < 0.03 { 4.0 } else { 1.0 };
        t += (FRAME_PERIOD * slow + rng.gauss(0.0, 0.002)).max(0.001);
    }

    // Write CSV
    let csv_path = "sample_stats.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV file")?;
    writer.write_record(["frame", "angle", "t_absolute"])?;
    for ((frame, angle), t) in frames.iter().zip(&angles).zip(&times) {
        writer.write_record([frame.to_string(), format!("{angle:.6}"), format!("{t:.6}")])?;
    }
    writer.flush()?;

    // Write Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("frame", DataType::Int64, false),
        Field::new("angle", DataType::Float64, false),
        Field::new("t_absolute", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(frames)),
            Arc::new(Float64Array::from(angles)),
            Arc::new(Float64Array::from(times)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_stats.parquet";
    let file = std::fs::File::create(parquet_path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    println!("Wrote {FRAMES} frames to {csv_path} and {parquet_path}");
    Ok(())
}

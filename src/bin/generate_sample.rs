use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use argh::FromArgs;
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use rusty_ribosome::config::DEFAULT_DOUBLING_TIME_HOURS;
use rusty_ribosome::data::model::ColumnMapping;

#[derive(FromArgs, Debug)]
/// Write a synthetic protein/mRNA abundance table
struct Args {
    /// output parquet file
    #[argh(option, short = 'o', default = "PathBuf::from(\"sample_data.parquet\")")]
    output: PathBuf,

    /// number of genes
    #[argh(option, short = 'n', default = "5000")]
    genes: usize,

    /// PRNG seed
    #[argh(option, default = "42")]
    seed: u64,
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn log_normal(&mut self, median: f64, sigma: f64) -> f64 {
        self.gauss(median.ln(), sigma).exp()
    }

    /// `Some(value)` except with probability `missing`.
    fn maybe(&mut self, missing: f64, value: f64) -> Option<f64> {
        (self.next_f64() >= missing).then_some(value)
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let mut rng = SimpleRng::new(args.seed);
    let columns = ColumnMapping::default();

    let mut genes = Vec::with_capacity(args.genes);
    let mut lengths = Vec::with_capacity(args.genes);
    let mut proteins = Vec::with_capacity(args.genes);
    let mut mrnas = Vec::with_capacity(args.genes);
    let mut rates = Vec::with_capacity(args.genes);

    for i in 0..args.genes {
        // Median length around 400 aa, median ksp around 40 per mRNA per hour.
        let length = rng.log_normal(400.0, 0.5).round().max(30.0);
        let rate = rng.log_normal(40.0, 1.2);
        let mrna = rng.log_normal(17.0, 1.0);
        let protein = mrna * rate * DEFAULT_DOUBLING_TIME_HOURS * rng.log_normal(1.0, 0.3);

        genes.push(format!("gene_{i:05}"));
        lengths.push(Some(length));
        proteins.push(rng.maybe(0.02, protein.round()));
        mrnas.push(rng.maybe(0.25, (mrna * 100.0).round() / 100.0));
        rates.push(rng.maybe(0.25, rate));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("gene", DataType::Utf8, false),
        Field::new(&columns.protein_length, DataType::Float64, true),
        Field::new(&columns.protein_copy_number, DataType::Float64, true),
        Field::new(&columns.mrna_copy_number, DataType::Float64, true),
        Field::new(&columns.translation_rate, DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(genes)),
            Arc::new(Float64Array::from(lengths)),
            Arc::new(Float64Array::from(proteins)),
            Arc::new(Float64Array::from(mrnas)),
            Arc::new(Float64Array::from(rates)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {} genes to {}", args.genes, args.output.display());
    Ok(())
}

use anyhow::{Context, Result};

#[rustfmt::skip]
const STATES: &[(&str, f64)] = &[
    ("AK", 19.8), ("AL", 12.4), ("AR", 10.1), ("AZ", 12.0), ("CA", 17.4),
    ("CO", 12.1), ("CT", 19.9), ("DC", 12.6), ("DE", 12.8), ("FL", 11.6),
    ("GA", 11.8), ("HI", 30.1), ("IA", 12.3), ("ID", 9.9), ("IL", 12.5),
    ("IN", 12.0), ("KS", 12.6), ("KY", 10.5), ("LA", 9.6), ("MA", 20.1),
    ("MD", 13.2), ("ME", 16.0), ("MI", 15.2), ("MN", 12.8), ("MO", 11.0),
    ("MS", 11.2), ("MT", 11.0), ("NC", 11.2), ("ND", 10.3), ("NE", 10.8),
    ("NH", 19.6), ("NJ", 15.6), ("NM", 12.6), ("NV", 11.5), ("NY", 18.0),
    ("OH", 12.3), ("OK", 10.4), ("OR", 10.9), ("PA", 13.6), ("RI", 19.6),
    ("SC", 12.6), ("SD", 11.6), ("TN", 10.7), ("TX", 11.4), ("UT", 10.2),
    ("VA", 11.9), ("VT", 17.1), ("WA", 9.6), ("WI", 14.0), ("WV", 11.2),
    ("WY", 10.8),
];

const FIRST_YEAR: i64 = 2001;
const LAST_YEAR: i64 = 2022;

/// splitmix64: enough for reproducible price noise.
struct Noise(u64);

impl Noise {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform noise in `[-amplitude, amplitude]`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

/// Price in cents/kWh for a month: base level scaled back from 2022 by a
/// yearly drift, a summer bump and noise.
fn monthly_price(rng: &mut Noise, base: f64, year: i64, month: u32, factor: f64) -> f64 {
    let years_before = (LAST_YEAR - year) as f64;
    let drift = 0.975_f64.powf(years_before);
    let season = 1.0 + 0.06 * ((month as f64 - 1.0) / 12.0 * 2.0 * std::f64::consts::PI).sin();
    let price = base * factor * drift * season + rng.jitter(0.4);
    (price.max(1.0) * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    let mut rng = Noise(42);
    let output_path = "sample_electricity.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;

    writer.write_record([
        "Year",
        "Month",
        "US_State",
        "Residential Price",
        "Commercial Price",
        "Industrial Price",
    ])?;

    let mut rows = 0usize;
    for year in FIRST_YEAR..=LAST_YEAR {
        for month in 1..=12u32 {
            for &(state, base) in STATES {
                let residential = monthly_price(&mut rng, base, year, month, 1.0);
                let commercial = monthly_price(&mut rng, base, year, month, 0.82);
                let industrial = monthly_price(&mut rng, base, year, month, 0.58);
                writer.write_record([
                    year.to_string(),
                    month.to_string(),
                    state.to_string(),
                    format!("{residential:.2}"),
                    format!("{commercial:.2}"),
                    format!("{industrial:.2}"),
                ])?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing output file")?;

    println!(
        "Wrote {rows} rows ({} states, {FIRST_YEAR}–{LAST_YEAR}) to {output_path}",
        STATES.len()
    );
    Ok(())
}

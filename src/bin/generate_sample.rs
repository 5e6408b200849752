//! Writes `sample_titles.csv` and `sample_titles.parquet`: a synthetic
//! catalogue with the same columns as `netflix_titles.csv`, for trying the
//! dashboard without the real dataset.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 8] = [
    "show_id",
    "type",
    "title",
    "country",
    "release_year",
    "rating",
    "listed_in",
    "description",
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// One generated catalogue row.
struct SampleTitle {
    show_id: String,
    kind: &'static str,
    title: String,
    country: Option<String>,
    release_year: i64,
    rating: &'static str,
    listed_in: String,
    description: String,
}

const COUNTRIES: [&str; 9] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "Canada",
    "Spain",
    "France",
    "Mexico",
];
const MOVIE_GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "International Movies",
    "Documentaries",
    "Action & Adventure",
    "Thrillers",
    "Horror Movies",
    "Romantic Movies",
];
const TV_GENRES: [&str; 6] = [
    "International TV Shows",
    "TV Dramas",
    "TV Comedies",
    "Crime TV Shows",
    "Docuseries",
    "Kids' TV",
];
const RATINGS: [&str; 5] = ["TV-MA", "TV-14", "TV-PG", "R", "PG-13"];
const ADJECTIVES: [&str; 8] = ["Silent", "Last", "Hidden", "Broken", "Golden", "Midnight", "Lost", "Wild"];
const NOUNS: [&str; 8] = ["Harbor", "Kingdom", "Signal", "Garden", "Frontier", "Letters", "Summer", "Circuit"];
const PLOTS: [&str; 6] = [
    "a detective reopens a cold case",
    "two rivals are forced to cook together",
    "a family returns to its ancestral village",
    "a hacker uncovers a corporate conspiracy",
    "friends plan one last road trip",
    "a musician loses her voice before the big tour",
];

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<SampleTitle> {
    (0..n)
        .map(|i| {
            let is_movie = rng.chance(70);
            let genres: &[&str] = if is_movie { &MOVIE_GENRES } else { &TV_GENRES };

            // Mostly single countries, some co-productions, a few unknown.
            let country = match rng.below(10) {
                0 => None,
                1 | 2 => Some(format!("{}, {}", rng.pick(&COUNTRIES), rng.pick(&COUNTRIES))),
                _ => Some(rng.pick(&COUNTRIES).to_string()),
            };

            let mut listed: Vec<&str> = Vec::new();
            for _ in 0..1 + rng.below(3) {
                let g = rng.pick(genres);
                if !listed.contains(&g) {
                    listed.push(g);
                }
            }

            // Skewed towards recent years, like the real catalogue.
            let release_year = if rng.chance(80) {
                2010 + rng.below(12) as i64
            } else {
                1960 + rng.below(50) as i64
            };

            SampleTitle {
                show_id: format!("s{}", i + 1),
                kind: if is_movie { "Movie" } else { "TV Show" },
                title: format!("The {} {}", rng.pick(&ADJECTIVES), rng.pick(&NOUNS)),
                country,
                release_year,
                rating: rng.pick(&RATINGS),
                listed_in: listed.join(", "),
                description: format!("In this story, {}.", rng.pick(&PLOTS)),
            }
        })
        .collect()
}

fn write_csv(path: &str, titles: &[SampleTitle]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(COLUMNS)?;
    for t in titles {
        let year = t.release_year.to_string();
        writer.write_record([
            t.show_id.as_str(),
            t.kind,
            t.title.as_str(),
            t.country.as_deref().unwrap_or(""),
            year.as_str(),
            t.rating,
            t.listed_in.as_str(),
            t.description.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, titles: &[SampleTitle]) -> Result<()> {
    let strings = |f: fn(&SampleTitle) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(titles.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("show_id", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, true),
        Field::new("release_year", DataType::Int64, false),
        Field::new("rating", DataType::Utf8, false),
        Field::new("listed_in", DataType::Utf8, false),
        Field::new("description", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(|t| t.show_id.as_str()),
            strings(|t| t.kind),
            strings(|t| t.title.as_str()),
            Arc::new(StringArray::from(
                titles.iter().map(|t| t.country.as_deref()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                titles.iter().map(|t| t.release_year).collect::<Vec<_>>(),
            )),
            strings(|t| t.rating),
            strings(|t| t.listed_in.as_str()),
            strings(|t| t.description.as_str()),
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
    let mut rng = SimpleRng::new(42);
    let titles = generate(&mut rng, 600);

    write_csv("sample_titles.csv", &titles)?;
    write_parquet("sample_titles.parquet", &titles)?;

    let movies = titles.iter().filter(|t| t.kind == "Movie").count();
    println!(
        "Wrote {} titles ({} movies, {} TV shows) to sample_titles.csv and sample_titles.parquet",
        titles.len(),
        movies,
        titles.len() - movies
    );
    Ok(())
}

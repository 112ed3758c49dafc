//! EcoMetrics CLI - ecological metrics for an area of interest

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use ecometrics_algorithms::aoi::{enforce_area_limit, GovernanceSummary, GovernedAoi};
use ecometrics_algorithms::biodiversity::{
    compute_biodiversity, BiodiversityReport, OccurrenceSampler,
};
use ecometrics_algorithms::landcover::{
    compute_landcover_metrics, LandCoverMetrics, LandCoverParams,
};
use ecometrics_algorithms::vegetation::{pixel_scale_for, summarize_ratings, RatingSummary};
use ecometrics_cloud::blocking::GbifClientBlocking;
use ecometrics_cloud::{parse_histogram_json, GbifClientOptions, RecordedRasterService};
use ecometrics_core::raster_service::{
    fetch_class_histogram, fetch_rating_histogram, NDVI_RATING_BAND, WORLDCOVER_BAND,
    WORLDCOVER_SCALE_M,
};
use ecometrics_core::{Aoi, ClassHistogram, EngineConfig, Rating, RatingHistogram};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ecometrics")]
#[command(author, version, about = "Ecological metrics for an area of interest", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration (TOML); missing keys keep their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the AOI area ceiling and print the AOI to analyze
    Govern {
        /// AOI as GeoJSON (FeatureCollection, Feature or Polygon)
        aoi: PathBuf,
        /// Write the governed AOI GeoJSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Land-cover diversity from a class histogram
    Landcover {
        /// Histogram JSON, e.g. {"Map": {"10": 700, "40": 300}}
        histogram: PathBuf,
        /// Rows in the ranked class table
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,
    },
    /// Forest condition summary from a rating histogram
    Ratings {
        /// Histogram JSON, e.g. {"NDVI_rating": {"1": 10, "5": 30}}
        histogram: PathBuf,
        /// AOI area; picks the pixel size from the resolution policy
        #[arg(long, conflicts_with = "scale")]
        area_km2: Option<f64>,
        /// Pixel size in meters the histogram was reduced at
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Species diversity from GBIF occurrences (network)
    Species {
        /// AOI as GeoJSON
        aoi: PathBuf,
        /// Sample cap; defaults to min(available, policy cap)
        #[arg(long)]
        max_records: Option<usize>,
        /// End of the trailing-year window (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// GBIF API root
        #[arg(long)]
        gbif_url: Option<String>,
    },
    /// All metric groups for one AOI; a failing group does not stop the others
    Analyze {
        /// AOI as GeoJSON
        aoi: PathBuf,
        /// Land-cover histogram JSON
        #[arg(long)]
        landcover: PathBuf,
        /// Rating histogram JSON, reduced at the policy scale for the governed AOI
        #[arg(long)]
        ratings: PathBuf,
        /// Skip the GBIF occurrence group
        #[arg(long)]
        no_species: bool,
        #[arg(long)]
        max_records: Option<usize>,
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        gbif_url: Option<String>,
    },
}

// ─── Report types ───────────────────────────────────────────────────────

/// Outcome of one metric group.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Group<T> {
    Ok(T),
    Error(String),
}

impl<T> Group<T> {
    fn from_result(name: &str, result: Result<T>) -> Self {
        match result {
            Ok(v) => Group::Ok(v),
            Err(e) => {
                warn!("{} failed: {:#}", name, e);
                Group::Error(format!("{:#}", e))
            }
        }
    }
}

#[derive(Serialize)]
struct RatingsReport {
    pixel_scale_m: f64,
    #[serde(flatten)]
    summary: RatingSummary,
}

#[derive(Serialize)]
struct AnalysisReport {
    aoi: GovernanceSummary,
    landcover: Group<LandCoverMetrics>,
    ratings: Group<RatingsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    species: Option<Group<BiodiversityReport>>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config {}", p.display()))?;
            EngineConfig::from_toml_str(&text).context("Invalid config")?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("Invalid config")?;
    Ok(config)
}

fn read_text(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} {}", what, path.display()))
}

fn read_aoi(path: &Path) -> Result<Aoi> {
    Aoi::from_geojson_str(&read_text(path, "AOI")?).context("Failed to parse AOI")
}

fn govern(path: &Path, config: &EngineConfig) -> Result<GovernedAoi> {
    let aoi = read_aoi(path)?;
    let governed = enforce_area_limit(&aoi, &config.area).context("Failed to govern AOI")?;
    info!(
        "AOI: {:.2} km² (analyzed {:.2} km²)",
        governed.original_area_km2,
        governed.area_km2()
    );
    Ok(governed)
}

fn read_class_histogram(path: &Path) -> Result<ClassHistogram> {
    let raw = parse_histogram_json(&read_text(path, "histogram")?, WORLDCOVER_BAND)
        .context("Failed to parse land-cover histogram")?;
    Ok(ClassHistogram::from_service_response(&raw)?)
}

fn read_rating_histogram(path: &Path) -> Result<RatingHistogram> {
    let raw = parse_histogram_json(&read_text(path, "histogram")?, NDVI_RATING_BAND)
        .context("Failed to parse rating histogram")?;
    Ok(RatingHistogram::from_service_response(&raw)?)
}

fn gbif(url: Option<String>) -> Result<GbifClientBlocking> {
    let mut options = GbifClientOptions::default();
    if let Some(url) = url {
        options.base_url = url;
    }
    GbifClientBlocking::new(options).context("Failed to create GBIF client")
}

fn sample_species(
    aoi: &Aoi,
    config: &EngineConfig,
    max_records: Option<usize>,
    today: Option<NaiveDate>,
    gbif_url: Option<String>,
) -> Result<BiodiversityReport> {
    let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let sampler = OccurrenceSampler::new(gbif(gbif_url)?, config.sampling);

    let pb = spinner("Sampling GBIF occurrences...");
    let sample = match max_records {
        Some(n) => sampler.sample(aoi, n, today),
        None => sampler.sample_capped(aoi, today),
    };
    pb.finish_and_clear();

    Ok(compute_biodiversity(&sample.context("Failed to sample occurrences")?))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_landcover(m: &LandCoverMetrics) {
    println!("Land cover");
    println!("  Richness:  {}", m.indices.richness);
    println!("  Shannon:   {:.4}", m.indices.shannon);
    println!("  Simpson:   {:.4}", m.indices.simpson);
    println!("  Evenness:  {:.4}", m.indices.evenness);
    println!("  Natural habitat:       {:.1}%", m.habitat.natural * 100.0);
    println!("  Anthropogenic habitat: {:.1}%", m.habitat.anthropogenic * 100.0);
    println!("  Top classes:");
    for (i, c) in m.top_classes.iter().enumerate() {
        println!(
            "    {}. {:<28} {:>6.2}%  {:>10.2} ha",
            i + 1,
            c.label,
            c.percent,
            c.area_ha
        );
    }
}

fn print_ratings(r: &RatingsReport) {
    let s = &r.summary;
    println!("Forest condition ({} m pixels)", r.pixel_scale_m);
    println!("  Forest area: {:.2} ha ({} pixels)", s.total_ha, s.total_pixels);
    for rating in Rating::ALL {
        println!(
            "  {} {:<10} {:>6.2}%  {:>10.2} ha",
            rating.value(),
            format!("{:?}", rating),
            s.pct(rating),
            s.ha(rating)
        );
    }
    println!("  Degraded (1-2): {:.2}% / {:.2} ha", s.degraded_pct, s.degraded_ha);
    println!("  Good (3-5):     {:.2}% / {:.2} ha", s.good_pct, s.good_ha);
}

fn print_species(r: &BiodiversityReport) {
    println!("Species (GBIF)");
    println!(
        "  Records: {} ({} with species)",
        r.raw_sample_size, r.species_bearing_records
    );
    println!("  Richness:      {}", r.indices.richness);
    println!("  Shannon:       {:.4}", r.indices.shannon);
    println!("  Simpson:       {:.4}", r.indices.simpson);
    println!("  Evenness:      {:.4}", r.indices.evenness);
    if let Some(bp) = r.indices.berger_parker {
        println!("  Berger-Parker: {:.4}", bp);
    }
}

fn print_group<T>(name: &str, group: &Group<T>, print: impl Fn(&T)) {
    match group {
        Group::Ok(v) => print(v),
        Group::Error(e) => println!("{}: unavailable ({})", name, e),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Govern { aoi, output } => {
            let governed = govern(&aoi, &config)?;
            let geojson = governed.aoi.to_geojson_string()?;
            let summary = governed.summary();

            if let Some(path) = &output {
                std::fs::write(path, &geojson)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            if cli.json {
                print_json(&summary)?;
            } else {
                println!("Input area:    {:.2} km²", summary.original_area_km2);
                println!("Analyzed area: {:.2} km²", summary.area_km2);
                if summary.substituted {
                    println!(
                        "AOI exceeds {} km²; replaced by a {:.1} km square around its centroid",
                        config.area.max_km2,
                        config.area.substitute_side_km()
                    );
                }
            }
            match output {
                Some(path) => eprintln!("Governed AOI saved to: {}", path.display()),
                None if !cli.json => println!("{}", geojson),
                None => {}
            }
        }

        Commands::Landcover { histogram, top } => {
            let hist = read_class_histogram(&histogram)?;
            let params = LandCoverParams {
                legend: config.legend.clone(),
                top_n: top,
                scale_m: WORLDCOVER_SCALE_M,
            };
            let metrics = compute_landcover_metrics(&hist, &params)
                .context("Failed to compute land-cover metrics")?;
            if cli.json {
                print_json(&metrics)?;
            } else {
                print_landcover(&metrics);
            }
        }

        Commands::Ratings { histogram, area_km2, scale } => {
            let pixel_scale_m = match (scale, area_km2) {
                (Some(s), _) => s,
                (None, Some(a)) => pixel_scale_for(a, &config.resolution),
                (None, None) => bail!("either --scale or --area-km2 is required"),
            };
            let hist = read_rating_histogram(&histogram)?;
            let summary = summarize_ratings(&hist, pixel_scale_m)
                .context("Failed to summarize ratings")?;
            let report = RatingsReport { pixel_scale_m, summary };
            if cli.json {
                print_json(&report)?;
            } else {
                print_ratings(&report);
            }
        }

        Commands::Species { aoi, max_records, today, gbif_url } => {
            let governed = govern(&aoi, &config)?;
            let start = Instant::now();
            let report = sample_species(&governed.aoi, &config, max_records, today, gbif_url)?;
            info!("Sampled in {:.2?}", start.elapsed());
            if cli.json {
                print_json(&report)?;
            } else {
                print_species(&report);
            }
        }

        Commands::Analyze {
            aoi,
            landcover,
            ratings,
            no_species,
            max_records,
            today,
            gbif_url,
        } => {
            let governed = govern(&aoi, &config)?;

            let mut raster = RecordedRasterService::new();
            let landcover_loaded = read_text(&landcover, "histogram").and_then(|text| {
                raster
                    .insert_json(WORLDCOVER_BAND, &text)
                    .context("Failed to parse land-cover histogram")
            });
            let ratings_loaded = read_text(&ratings, "histogram").and_then(|text| {
                raster
                    .insert_json(NDVI_RATING_BAND, &text)
                    .context("Failed to parse rating histogram")
            });

            let landcover = Group::from_result(
                "land cover",
                landcover_loaded.and_then(|_| {
                    let hist = fetch_class_histogram(&raster, &governed.aoi)?;
                    let params = LandCoverParams {
                        legend: config.legend.clone(),
                        ..LandCoverParams::default()
                    };
                    Ok(compute_landcover_metrics(&hist, &params)?)
                }),
            );

            let ratings = Group::from_result(
                "forest condition",
                ratings_loaded.and_then(|_| {
                    let pixel_scale_m = pixel_scale_for(governed.area_km2(), &config.resolution);
                    let hist = fetch_rating_histogram(&raster, &governed.aoi, pixel_scale_m)?;
                    let summary = summarize_ratings(&hist, pixel_scale_m)?;
                    Ok(RatingsReport { pixel_scale_m, summary })
                }),
            );

            let species = (!no_species).then(|| {
                Group::from_result(
                    "species",
                    sample_species(&governed.aoi, &config, max_records, today, gbif_url),
                )
            });

            let report = AnalysisReport {
                aoi: governed.summary(),
                landcover,
                ratings,
                species,
            };

            if cli.json {
                print_json(&report)?;
            } else {
                println!(
                    "AOI: {:.2} km²{}",
                    report.aoi.area_km2,
                    if report.aoi.substituted { " (substituted)" } else { "" }
                );
                println!();
                print_group("Land cover", &report.landcover, print_landcover);
                println!();
                print_group("Forest condition", &report.ratings, print_ratings);
                if let Some(species) = &report.species {
                    println!();
                    print_group("Species", species, print_species);
                }
            }
        }
    }

    Ok(())
}

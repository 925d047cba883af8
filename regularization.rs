use rust_regularized_networks::config::{load_config, TrainingConfig};
use rust_regularized_networks::data::{load_dataset, two_dimensional_dataset, Dataset};
use rust_regularized_networks::training::{accuracy, predict, CostRecord, Trainer};
use rust_regularized_networks::utils::seeded;
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::process;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Trains the [n_x, 20, 3, 1] classifier in the mode chosen by the config
// (plain, L2 or dropout) and reports train/test accuracy.
//
// Usage: regularization [config.json] [dataset.json]
const DEFAULT_CONFIG: &str = "config/dropout.json";
// Synthetic 2D data used when no dataset file is given.
const TRAIN_SAMPLES: usize = 211;
const TEST_SAMPLES: usize = 200;
const LABEL_NOISE: f64 = 0.05;
const DATA_SEED: u64 = 1;
const CURVE_PATH: &str = "./logs/learning_curve.csv";

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn load_data(path: Option<&str>) -> Result<Dataset, Box<dyn Error>> {
    match path {
        Some(path) => Ok(load_dataset(path)?),
        None => {
            info!(
                train = TRAIN_SAMPLES,
                test = TEST_SAMPLES,
                noise = LABEL_NOISE,
                "generating synthetic 2D dataset"
            );
            Ok(two_dimensional_dataset(
                TRAIN_SAMPLES,
                TEST_SAMPLES,
                LABEL_NOISE,
                &mut seeded(DATA_SEED),
            )?)
        }
    }
}

fn write_learning_curve(costs: &[CostRecord], learning_rate: f64) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all("./logs")?;
    let mut writer = BufWriter::new(File::create(CURVE_PATH)?);
    writeln!(writer, "# learning_rate={}", learning_rate)?;
    writeln!(writer, "iteration,cost")?;
    for record in costs {
        writeln!(writer, "{},{}", record.iteration, record.cost)?;
    }
    writer.flush()?;
    info!(path = CURVE_PATH, points = costs.len(), "learning curve written");
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG);
    let config: TrainingConfig = load_config(config_path)?;
    info!(path = config_path, ?config, "loaded configuration");

    let data = load_data(args.get(2).map(String::as_str))?;

    let mut trainer = Trainer::from_config(&config)?;
    let start = Instant::now();
    let model = trainer.fit(data.train_x.view(), data.train_y.view(), &mut seeded(config.seed))?;
    info!(
        seconds = start.elapsed().as_secs_f64(),
        mode = ?trainer.mode(),
        "training finished"
    );

    let train_predictions = predict(data.train_x.view(), &model.parameters)?;
    let test_predictions = predict(data.test_x.view(), &model.parameters)?;
    info!(
        "On the train set: accuracy {:.4}",
        accuracy(train_predictions.view(), data.train_y.view())?
    );
    info!(
        "On the test set: accuracy {:.4}",
        accuracy(test_predictions.view(), data.test_y.view())?
    );

    write_learning_curve(&model.costs, config.learning_rate)?;
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}

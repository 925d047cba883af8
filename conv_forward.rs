use ndarray::{s, Array4};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rust_regularized_networks::layers::conv2d::{conv_forward, ConvHyperparameters};
use rust_regularized_networks::utils::seeded;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Convolution forward pass on a seeded random batch (NHWC layout).
const BATCH: usize = 10;
const HEIGHT: usize = 4;
const WIDTH: usize = 4;
const IN_CHANNELS: usize = 3;
const KERNEL: usize = 2;
const FILTERS: usize = 8;
const STRIDE: usize = 2;
const PAD: usize = 2;
const SEED: u64 = 1;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut rng = seeded(SEED);
    let a_prev = Array4::<f64>::random_using((BATCH, HEIGHT, WIDTH, IN_CHANNELS), StandardNormal, &mut rng);
    let weights = Array4::<f64>::random_using((KERNEL, KERNEL, IN_CHANNELS, FILTERS), StandardNormal, &mut rng);
    let biases = Array4::<f64>::random_using((1, 1, 1, FILTERS), StandardNormal, &mut rng);
    let hparameters = ConvHyperparameters {
        stride: STRIDE,
        pad: PAD,
    };

    let (z, cache) = match conv_forward(&a_prev, &weights, &biases, hparameters) {
        Ok(result) => result,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    info!(shape = ?z.dim(), "Z shape");
    info!("Z's mean = {}", z.mean().unwrap_or(f64::NAN));
    info!("Z[3,2,1] = {}", z.slice(s![3, 2, 1, ..]));
    info!("cache a_prev[1][2][3] = {}", cache.a_prev.slice(s![1, 2, 3, ..]));
}

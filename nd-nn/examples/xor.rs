use anyhow::Result;
use clap::{Arg, Command};
use log::{LevelFilter, info};
use nd_array::NdArray;
use nd_nn::accuracy::RoundAccuracy;
use nd_nn::activation::{Sigmoid, Tanh};
use nd_nn::layer::Dense;
use nd_nn::loss::SquareLoss;
use nd_nn::optim::Sgd;
use nd_nn::{FitConfig, Network};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("ND_LOG", "info"))
        .init();

    let matches = Command::new("xor")
        .version(clap::crate_version!())
        .about("Trains a two layer network on the XOR table")
        .arg(
            Arg::new("epochs")
                .long("epochs")
                .default_value("1000")
                .value_parser(clap::value_parser!(usize))
                .help("Number of training epochs"),
        )
        .arg(
            Arg::new("lr")
                .long("lr")
                .default_value("0.1")
                .value_parser(clap::value_parser!(f64))
                .help("Learning rate"),
        )
        .arg(
            Arg::new("momentum")
                .long("momentum")
                .default_value("0.9")
                .value_parser(clap::value_parser!(f64))
                .help("SGD momentum"),
        )
        .arg(
            Arg::new("hidden")
                .long("hidden")
                .default_value("8")
                .value_parser(clap::value_parser!(usize))
                .help("Hidden layer width"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("42")
                .value_parser(clap::value_parser!(u64))
                .help("Seed of the weight initialization and shuffling"),
        )
        .get_matches();

    let epochs = *matches.get_one::<usize>("epochs").unwrap_or(&1000);
    let lr = *matches.get_one::<f64>("lr").unwrap_or(&0.1);
    let momentum = *matches.get_one::<f64>("momentum").unwrap_or(&0.9);
    let hidden = *matches.get_one::<usize>("hidden").unwrap_or(&8);
    let seed = *matches.get_one::<u64>("seed").unwrap_or(&42);

    let mut rng = StdRng::seed_from_u64(seed);

    let x = NdArray::from(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
    let y = NdArray::from(vec![[0.0], [1.0], [1.0], [0.0]]);

    let mut network =
        Network::<f64>::new(Sgd::with_momentum(lr, momentum), SquareLoss, RoundAccuracy);
    network.add_layer(Dense::with_input(2, hidden).activation(Tanh), &mut rng)?;
    network.add_layer(Dense::new(1).activation(Sigmoid), &mut rng)?;

    info!("\n{}", network.summary());

    let config = FitConfig {
        epochs,
        batch_size: 4,
        display_epochs: (epochs / 10).max(1),
        shuffle: true,
    };
    network.fit(&x, &y, &config, &mut rng)?;
    network.test(&x, &y)?;

    info!("predictions:\n{:.4}", network.predict(&x)?);

    Ok(())
}

use std::{env, process};

use anyhow::Context;
use cnn_inference::{Model, ModelConfig, Registry, Sequential, Tensor, params};
use log::info;
use ndarray::IxDyn;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <model.json> <weights.bin> [input.bin]", args[0]);
        process::exit(1);
    }

    let config = ModelConfig::from_file(&args[1])
        .with_context(|| format!("failed to read model config {}", args[1]))?;
    let mut model = Sequential::from_config(&config, &Registry::default())?;
    info!("built model with {} layers", model.layers().len());

    let weights = params::read_file(&args[2])
        .with_context(|| format!("failed to read weights {}", args[2]))?;
    let consumed = model.load(&weights)?;
    info!("loaded {consumed} of {} parameters", weights.len());

    let shape = config
        .input_shape
        .context("model config has no input_shape")?;
    let x = match args.get(3) {
        Some(path) => {
            let data = params::read_file(path)
                .with_context(|| format!("failed to read input {path}"))?;
            Tensor::from_shape_vec(IxDyn(&shape), data)?
        }
        None => Tensor::zeros(IxDyn(&shape)),
    };

    let y = model.forward(&x)?;
    println!("output shape: {:?}", y.shape());
    println!("{y}");

    Ok(())
}

//! Command line tool to train the baseline on a labeled CSV dataset

use anyhow::anyhow;
use autodl_text::{
    automl,
    datasets::{labeled, LoadableDataset as _},
    metadata::Metadata,
};
use burn::data::dataset::Dataset as _;
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [OPTIONS] TRAIN_CSV

Arguments:
  TRAIN_CSV            Path to a CSV file with `text,label` rows

Options:
  -h, --help           Print help
  -l, --language       Two-letter dataset language code (defaults to 'EN')
  -c, --classes        Number of classes (defaults to the highest label + 1)
  -o, --out-dir        Directory for the artifact bundle (defaults to 'artifacts')
";

#[derive(Debug)]
struct Args {
    train_csv: String,
    language: String,
    classes: Option<usize>,
    out_dir: String,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            language: pargs
                .opt_value_from_str(["-l", "--language"])?
                .unwrap_or_else(|| "EN".to_string()),
            classes: pargs.opt_value_from_str(["-c", "--classes"])?,
            out_dir: pargs
                .opt_value_from_str(["-o", "--out-dir"])?
                .unwrap_or_else(|| "artifacts".to_string()),
            train_csv: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => {
                    anyhow!("Missing required argument: TRAIN_CSV")
                }
                _ => anyhow!("{}", e),
            })?,
        };

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let output = Args::parse()?;

    if output.is_none() {
        print!("{}", HELP);

        return Ok(());
    }
    let args = output.unwrap();

    let dataset = labeled::Dataset::load(&args.train_csv).await?;
    let train_num = dataset.len();

    let class_num = match args.classes {
        Some(classes) => classes,
        None => dataset.class_count()?,
    };

    // The test-set size is unknown at training time; the harness supplies it
    // for real runs, and `train` never consults it.
    let metadata = Metadata::new(&args.language, train_num, 1, class_num)?;

    let train_dataset = dataset.into_training_data(class_num)?;

    let mut model = automl::Model::new(metadata, &args.out_dir, &args.out_dir);
    model.train(train_dataset, None)?;

    log::info!("trained on {train_num} examples across {class_num} classes");

    Ok(())
}

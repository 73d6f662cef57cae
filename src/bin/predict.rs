//! Command line tool to predict classes for a CSV of texts

use anyhow::anyhow;
use autodl_text::{
    automl,
    datasets::{labeled, LoadableDataset as _},
    metadata::Metadata,
    utils::classes,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: predict [OPTIONS] TEST_CSV

Arguments:
  TEST_CSV             Path to a CSV file with `text` rows (label column optional)

Options:
  -h, --help           Print help
  -l, --language       Two-letter dataset language code (defaults to 'EN')
  -c, --classes        Number of classes the model was trained with (required)
  -i, --artifact-dir   Directory holding the artifact bundle (defaults to 'artifacts')
";

#[derive(Debug)]
struct Args {
    test_csv: String,
    language: String,
    classes: usize,
    artifact_dir: String,
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
            classes: pargs
                .opt_value_from_str(["-c", "--classes"])?
                .ok_or_else(|| anyhow!("Missing required option: --classes"))?,
            artifact_dir: pargs
                .opt_value_from_str(["-i", "--artifact-dir"])?
                .unwrap_or_else(|| "artifacts".to_string()),
            test_csv: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => {
                    anyhow!("Missing required argument: TEST_CSV")
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

    let dataset = labeled::Dataset::load(&args.test_csv).await?;
    let texts = dataset.texts();

    // Training rows are declared as 1; only the test side matters here and
    // `test` never consults train_num.
    let metadata = Metadata::new(&args.language, 1, texts.len(), args.classes)?;

    let model = automl::Model::new(metadata, &args.artifact_dir, &args.artifact_dir);
    let predictions = model.test(&texts, None)?;

    for row in &predictions {
        println!("{}", classes::argmax(row));
    }

    Ok(())
}
